//! Sqlite storage for per-account OAuth credentials

use anyhow::{Error, Result};
use rusqlite::Connection as SyncConnection;
use tokio_rusqlite::Connection;

pub async fn async_db(db_path: &str) -> Result<Connection, Error> {
    let path = format!("{}/agenda.sqlite3", db_path);
    let conn = Connection::open(path).await?;
    Ok(conn)
}

pub fn initialize_db(conn: &SyncConnection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS auth (
            id TEXT PRIMARY KEY,
            service TEXT NOT NULL,
            refresh_token TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Look up the stored Google refresh token for a calendar account.
pub async fn find_refresh_token(db: &Connection, account_id: &str) -> Result<String, Error> {
    let id = account_id.to_owned();
    let token = db
        .call(move |conn| {
            let result = conn
                .prepare("SELECT refresh_token FROM auth WHERE id = ?1")
                .and_then(|mut stmt| stmt.query_row([&id], |row| row.get(0)))?;
            Ok(result)
        })
        .await?;
    Ok(token)
}

pub async fn upsert_refresh_token(
    db: &Connection,
    account_id: &str,
    refresh_token: &str,
) -> Result<(), Error> {
    let id = account_id.to_owned();
    let token = refresh_token.to_owned();
    db.call(move |conn| {
        conn.execute(
            "INSERT INTO auth (id, service, refresh_token) VALUES (?1, 'gcal', ?2)
             ON CONFLICT(id) DO UPDATE SET refresh_token = excluded.refresh_token",
            (&id, &token),
        )?;
        Ok(())
    })
    .await?;
    Ok(())
}
