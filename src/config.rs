use std::env;

use chrono_tz::Tz;

use crate::calendar::WorkingHours;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: String,
    /// Calendar account ids in configuration order. The first account
    /// is the primary source that new events are written to.
    pub calendar_accounts: Vec<String>,
    /// Time zone used to anchor calendar days and all-day events.
    pub timezone: Tz,
    pub working_hours: WorkingHours,
    pub prefs_path: Option<String>,
    pub gcal_api_base_url: String,
    pub google_token_url: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub openai_model: String,
    pub openai_api_hostname: String,
    pub openai_api_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("AGENDA_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path);
        let calendar_accounts: Vec<String> = env::var("AGENDA_CALENDAR_ACCOUNTS")
            .expect("Missing AGENDA_CALENDAR_ACCOUNTS")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timezone: Tz = env::var("AGENDA_TIMEZONE")
            .unwrap_or_else(|_| "UTC".to_string())
            .parse()
            .expect("Invalid AGENDA_TIMEZONE");
        let min_hour = env::var("AGENDA_MIN_HOUR")
            .map(|v| v.parse().expect("Invalid AGENDA_MIN_HOUR"))
            .unwrap_or(8);
        let max_hour = env::var("AGENDA_MAX_HOUR")
            .map(|v| v.parse().expect("Invalid AGENDA_MAX_HOUR"))
            .unwrap_or(22);
        let prefs_path = env::var("AGENDA_PREFS_PATH").ok();
        let gcal_api_base_url = env::var("AGENDA_GCAL_API_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/calendar/v3".to_string());
        let google_token_url = env::var("AGENDA_GOOGLE_TOKEN_URL")
            .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string());
        let google_client_id =
            env::var("AGENDA_GOOGLE_CLIENT_ID").expect("Missing AGENDA_GOOGLE_CLIENT_ID");
        let google_client_secret =
            env::var("AGENDA_GOOGLE_CLIENT_SECRET").expect("Missing AGENDA_GOOGLE_CLIENT_SECRET");
        let openai_api_hostname = env::var("AGENDA_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let openai_model =
            env::var("AGENDA_LLM_MODEL").unwrap_or_else(|_| "gpt-4.1-mini".to_string());

        Self {
            db_path,
            calendar_accounts,
            timezone,
            working_hours: WorkingHours::new(min_hour, max_hour),
            prefs_path,
            gcal_api_base_url,
            google_token_url,
            google_client_id,
            google_client_secret,
            openai_model,
            openai_api_hostname,
            openai_api_key,
        }
    }
}
