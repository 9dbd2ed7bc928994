//! Intent classification boundary
//!
//! Free text goes in, a structured `ActionRequest` comes out. The
//! calendar core never depends on this module, so everything below
//! the trait is testable without network access. Prompt quality and
//! date-parsing robustness are this collaborator's problem, not the
//! core's.

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::action::ActionRequest;
use crate::openai::{Message, Role, completion};

#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// Classify one user message into a structured action request.
    /// `now` anchors relative dates like "tomorrow".
    async fn classify(&self, message: &str, now: DateTime<Utc>) -> Result<ActionRequest, Error>;
}

/// Classifier backed by an OpenAI-compatible chat completion API.
pub struct OpenAiClassifier {
    api_hostname: String,
    api_key: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    fn system_prompt(now: DateTime<Utc>) -> String {
        format!(
            r#"You are a scheduling intent classifier. The current datetime is {}.
Reply with a single JSON object and nothing else, with these fields:
- "action": one of "day_summary", "range_summary", "find_free_time", "create_event", "cancel_event", "reschedule_event"
- "title": event title for create_event
- "date": "YYYY-MM-DD"
- "start_time": "HH:MM:SS"
- "duration": minutes as an integer
- "range_start", "range_end": "YYYY-MM-DD"
- "target_event": short phrase naming an existing event for cancel_event or reschedule_event
Omit fields that do not apply."#,
            now.to_rfc3339()
        )
    }
}

#[async_trait]
impl IntentClassifier for OpenAiClassifier {
    async fn classify(&self, message: &str, now: DateTime<Utc>) -> Result<ActionRequest, Error> {
        let messages = vec![
            Message::new(Role::System, &Self::system_prompt(now)),
            Message::new(Role::User, message),
        ];
        let reply = completion(&messages, &self.api_hostname, &self.api_key, &self.model).await?;
        // Models occasionally wrap the JSON in a code fence
        let reply = reply
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();
        let request: ActionRequest = serde_json::from_str(reply)
            .map_err(|e| anyhow!("Classifier returned unparseable action: {}: {}", e, reply))?;
        Ok(request)
    }
}
