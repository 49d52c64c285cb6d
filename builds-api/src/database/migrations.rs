use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create projects table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS projects (
            id VARCHAR NOT NULL UNIQUE,
            slug VARCHAR PRIMARY KEY,
            type VARCHAR NOT NULL CHECK (type IN ('show', 'help')),
            name VARCHAR NOT NULL,
            description TEXT NOT NULL,
            avatar VARCHAR,
            featured_image VARCHAR,
            tags VARCHAR NOT NULL DEFAULT '[]',
            category VARCHAR,
            needs TEXT,
            links VARCHAR NOT NULL DEFAULT '{}',
            email VARCHAR,
            claimed BOOLEAN NOT NULL DEFAULT 0,
            claim_token VARCHAR,
            claim_token_issued_at BIGINT,
            allow_contact BOOLEAN NOT NULL DEFAULT 1,
            likes BIGINT NOT NULL DEFAULT 0 CHECK (likes >= 0),
            date VARCHAR NOT NULL,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_projects_created
            ON projects(created_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_projects_claimed
            ON projects(claimed)",
        [],
    )?;

    // One row per (build, address) that currently likes it
    conn.execute(
        "CREATE TABLE IF NOT EXISTS project_likes (
            project_slug VARCHAR NOT NULL,
            ip_address VARCHAR NOT NULL,
            created_at BIGINT NOT NULL,
            PRIMARY KEY (project_slug, ip_address),
            FOREIGN KEY (project_slug) REFERENCES projects (slug)
        )",
        [],
    )?;

    // Append-only, read only for rate limiting
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contact_attempts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            ip_address VARCHAR NOT NULL,
            project_slug VARCHAR NOT NULL,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contact_attempts_ip_created
            ON contact_attempts(ip_address, created_at)",
        [],
    )?;

    Ok(())
}
