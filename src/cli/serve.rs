use crate::api;
use crate::config::AppConfig;
use crate::prefs::{FilePreferences, PreferenceStore};

pub async fn run(host: String, port: String) {
    let mut config = AppConfig::default();

    // A stored preference overrides the env-configured working hours
    if let Some(path) = &config.prefs_path {
        let prefs = FilePreferences::load(path).expect("Failed to load preferences file");
        if let Some(hours) = prefs.working_hours() {
            config.working_hours = hours;
        }
    }

    api::serve(host, port, config).await;
}
