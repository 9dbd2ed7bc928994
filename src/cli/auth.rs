use std::io::{self, Write};

use anyhow::{Result, anyhow};

use crate::config::AppConfig;
use crate::db::{async_db, initialize_db, upsert_refresh_token};
use crate::google::oauth::exchange_code_for_token;

const SCOPE: &str = "https://www.googleapis.com/auth/calendar.events https://www.googleapis.com/auth/calendar.calendars.readonly";

pub async fn run(account: &str) -> Result<()> {
    let config = AppConfig::default();
    let redirect_uri = std::env::var("AGENDA_GOOGLE_REDIRECT_URI")
        .unwrap_or_else(|_| "urn:ietf:wg:oauth:2.0:oob".to_string());

    let auth_url = format!(
        "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
        urlencoding::encode(&config.google_client_id),
        urlencoding::encode(&redirect_uri),
        urlencoding::encode(SCOPE)
    );
    println!(
        "\nPlease open the following URL in your browser and authorize access for {}:\n\n{}\n",
        account, auth_url
    );
    print!("Paste the authorization code shown by Google here: ");
    io::stdout().flush().unwrap();
    let mut code = String::new();
    io::stdin().read_line(&mut code).expect("Failed to read code");
    let code = code.trim();

    let token = exchange_code_for_token(
        &config.google_token_url,
        &config.google_client_id,
        &config.google_client_secret,
        code,
        &redirect_uri,
    )
    .await?;

    // Store the refresh token in the DB and use that to fetch an
    // access token from now on.
    let refresh_token = token
        .refresh_token
        .ok_or(anyhow!("No refresh token in response"))?;

    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        initialize_db(conn).expect("Failed to initialize db");
        Ok(())
    })
    .await?;
    upsert_refresh_token(&db, account, &refresh_token).await?;
    println!("Refresh token for {} saved to DB.", account);

    Ok(())
}
