use anyhow::Result;
use chrono::Utc;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use crate::api::AppState;
use crate::config::AppConfig;
use crate::db::{async_db, initialize_db};
use crate::dialogue::handle_message;
use crate::prefs::{FilePreferences, PreferenceStore};

pub async fn run() -> Result<()> {
    let mut rl = DefaultEditor::new().expect("Editor failed");

    let mut config = AppConfig::default();
    if let Some(path) = &config.prefs_path {
        let prefs = FilePreferences::load(path)?;
        if let Some(hours) = prefs.working_hours() {
            config.working_hours = hours;
        }
    }

    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        initialize_db(conn).expect("Failed to initialize db");
        Ok(())
    })
    .await?;

    let state = AppState::new(db, config);

    // One REPL run is one conversation
    let conversation_id = Uuid::new_v4().to_string();

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let reply = handle_message(
                    &state.assistant,
                    state.classifier.as_ref(),
                    &state.pending,
                    &conversation_id,
                    &line,
                    Utc::now(),
                )
                .await?;
                println!("{}", reply);
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
