use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::params;

pub async fn insert_attempt(
    conn: AsyncDbConnection,
    ip_address: &str,
    project_slug: &str,
    attempted_at: i64,
) -> Result<i64> {
    let conn = conn.lock().await?;

    let id: i64 = conn.query_row(
        "INSERT INTO contact_attempts (ip_address, project_slug, created_at)
         VALUES (?, ?, ?)
         RETURNING id",
        params![ip_address, project_slug, attempted_at],
        |row| row.get(0),
    )?;

    Ok(id)
}

/// Attempts from `ip_address` strictly after `since` (unix seconds)
pub async fn count_attempts_since(
    conn: AsyncDbConnection,
    ip_address: &str,
    since: i64,
) -> Result<i64> {
    let conn = conn.lock().await?;

    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM contact_attempts WHERE ip_address = ? AND created_at > ?",
        params![ip_address, since],
        |row| row.get(0),
    )?;

    Ok(count)
}
