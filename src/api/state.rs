use std::sync::Arc;

use tokio_rusqlite::Connection;

use crate::action::Assistant;
use crate::calendar::backend::CalendarBackend;
use crate::calendar::{GcalBackend, MultiCalendarReader};
use crate::config::AppConfig;
use crate::nlu::{IntentClassifier, OpenAiClassifier};
use crate::session::PendingChoices;

pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
    pub assistant: Arc<Assistant>,
    pub classifier: Arc<dyn IntentClassifier>,
    pub pending: Arc<PendingChoices>,
}

impl AppState {
    /// Wire up one backend per configured calendar account, in
    /// configuration order. The first account is the primary source.
    pub fn new(db: Connection, config: AppConfig) -> Self {
        let sources: Vec<Arc<dyn CalendarBackend>> = config
            .calendar_accounts
            .iter()
            .map(|account| {
                Arc::new(GcalBackend::new(
                    account,
                    &config.gcal_api_base_url,
                    db.clone(),
                    &config.google_token_url,
                    &config.google_client_id,
                    &config.google_client_secret,
                    config.timezone,
                )) as Arc<dyn CalendarBackend>
            })
            .collect();
        let reader = MultiCalendarReader::new(sources, config.timezone);
        let assistant = Arc::new(Assistant::new(reader, config.working_hours));
        let classifier: Arc<dyn IntentClassifier> = Arc::new(OpenAiClassifier::new(
            &config.openai_api_hostname,
            &config.openai_api_key,
            &config.openai_model,
        ));

        Self {
            db,
            config,
            assistant,
            classifier,
            pending: Arc::new(PendingChoices::default()),
        }
    }
}
