use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::{params, Connection};

fn current_likes(conn: &Connection, slug: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT likes FROM projects WHERE slug = ?",
        [slug],
        |row| row.get(0),
    )
}

pub async fn has_liked(conn: AsyncDbConnection, slug: &str, ip_address: &str) -> Result<bool> {
    let conn = conn.lock().await?;

    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM project_likes WHERE project_slug = ? AND ip_address = ?",
        params![slug, ip_address],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// Add a ledger entry and bump the counter in one transaction.
/// Returns the counter afterwards.
pub async fn add_like(
    conn: AsyncDbConnection,
    slug: &str,
    ip_address: &str,
    now: i64,
) -> Result<i64> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let inserted = tx.execute(
        "INSERT INTO project_likes (project_slug, ip_address, created_at)
         VALUES (?, ?, ?)
         ON CONFLICT(project_slug, ip_address) DO NOTHING",
        params![slug, ip_address, now],
    )?;

    if inserted > 0 {
        tx.execute(
            "UPDATE projects SET likes = likes + 1 WHERE slug = ?",
            [slug],
        )?;
    }

    let likes = current_likes(&tx, slug)?;
    tx.commit()?;

    Ok(likes)
}

/// Remove a ledger entry and drop the counter, never below zero.
/// Returns the counter afterwards.
pub async fn remove_like(conn: AsyncDbConnection, slug: &str, ip_address: &str) -> Result<i64> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let deleted = tx.execute(
        "DELETE FROM project_likes WHERE project_slug = ? AND ip_address = ?",
        params![slug, ip_address],
    )?;

    if deleted > 0 {
        tx.execute(
            "UPDATE projects SET likes = MAX(likes - 1, 0) WHERE slug = ?",
            [slug],
        )?;
    }

    let likes = current_likes(&tx, slug)?;
    tx.commit()?;

    Ok(likes)
}
