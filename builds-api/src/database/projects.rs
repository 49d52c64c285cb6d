use crate::database::AsyncDbConnection;
use anyhow::Result;
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use shared_types::{Project, ProjectLinks, ProjectType};

/// Full `projects` row, including the owner-only claim columns
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub id: String,
    pub slug: String,
    pub project_type: ProjectType,
    pub name: String,
    pub description: String,
    pub avatar: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub needs: Option<String>,
    pub links: ProjectLinks,
    pub email: Option<String>,
    pub claimed: bool,
    pub claim_token: Option<String>,
    pub claim_token_issued_at: Option<i64>,
    pub allow_contact: bool,
    pub likes: i64,
    pub date: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug,
            project_type: record.project_type,
            name: record.name,
            description: record.description,
            avatar: record.avatar,
            featured_image: record.featured_image,
            tags: record.tags,
            category: record.category,
            needs: record.needs,
            links: record.links,
            claimed: record.claimed,
            allow_contact: record.allow_contact,
            likes: record.likes,
            date: record.date,
        }
    }
}

/// Validated submission ready to be stored
#[derive(Debug, Clone)]
pub struct NewProject {
    pub id: String,
    pub slug: String,
    pub project_type: ProjectType,
    pub name: String,
    pub description: String,
    pub avatar: Option<String>,
    pub featured_image: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub needs: Option<String>,
    pub links: ProjectLinks,
    pub date: String,
}

const PROJECT_COLUMNS: &str = "id, slug, type, name, description, avatar, featured_image, tags,
    category, needs, links, email, claimed, claim_token, claim_token_issued_at, allow_contact,
    likes, date, created_at, updated_at";

fn json_column<T: serde::de::DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn project_from_row(row: &Row) -> rusqlite::Result<ProjectRecord> {
    let type_str: String = row.get(2)?;
    let project_type = ProjectType::parse(&type_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            format!("unknown project type: {}", type_str).into(),
        )
    })?;

    Ok(ProjectRecord {
        id: row.get(0)?,
        slug: row.get(1)?,
        project_type,
        name: row.get(3)?,
        description: row.get(4)?,
        avatar: row.get(5)?,
        featured_image: row.get(6)?,
        tags: json_column(row, 7)?,
        category: row.get(8)?,
        needs: row.get(9)?,
        links: json_column(row, 10)?,
        email: row.get(11)?,
        claimed: row.get(12)?,
        claim_token: row.get(13)?,
        claim_token_issued_at: row.get(14)?,
        allow_contact: row.get(15)?,
        likes: row.get(16)?,
        date: row.get(17)?,
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
    })
}

/// Insert a project. Returns the total number of projects afterwards, or
/// `None` when the slug is already taken. The insert and the count share a
/// transaction so each submission sees its own number.
pub async fn insert_project(
    conn: AsyncDbConnection,
    project: &NewProject,
    now: i64,
) -> Result<Option<i64>> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let tags_json = serde_json::to_string(&project.tags)?;
    let links_json = serde_json::to_string(&project.links)?;

    let inserted = tx.execute(
        "INSERT INTO projects
         (id, slug, type, name, description, avatar, featured_image, tags, category, needs,
          links, date, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(slug) DO NOTHING",
        params![
            &project.id,
            &project.slug,
            project.project_type.as_str(),
            &project.name,
            &project.description,
            &project.avatar,
            &project.featured_image,
            tags_json,
            &project.category,
            &project.needs,
            links_json,
            &project.date,
            now,
            now,
        ],
    )?;

    if inserted == 0 {
        return Ok(None);
    }

    let total: i64 = tx.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
    tx.commit()?;

    Ok(Some(total))
}

pub async fn list_projects(conn: AsyncDbConnection) -> Result<Vec<ProjectRecord>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM projects ORDER BY created_at DESC, rowid DESC",
        PROJECT_COLUMNS
    ))?;

    let rows = stmt.query_map([], project_from_row)?;

    let mut projects = Vec::new();
    for row_result in rows {
        projects.push(row_result?);
    }

    Ok(projects)
}

pub async fn get_project(conn: AsyncDbConnection, slug: &str) -> Result<Option<ProjectRecord>> {
    let conn = conn.lock().await?;

    let project = conn
        .query_row(
            &format!("SELECT {} FROM projects WHERE slug = ?", PROJECT_COLUMNS),
            [slug],
            project_from_row,
        )
        .optional()?;

    Ok(project)
}

pub async fn slug_exists(conn: AsyncDbConnection, slug: &str) -> Result<bool> {
    let conn = conn.lock().await?;

    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE slug = ?",
        [slug],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// Store a fresh claim token on an unclaimed project, replacing any earlier
/// one. Returns false when the project is missing or already claimed.
pub async fn begin_claim(
    conn: AsyncDbConnection,
    slug: &str,
    email: &str,
    token: &str,
    allow_contact: bool,
    issued_at: i64,
) -> Result<bool> {
    let conn = conn.lock().await?;

    let updated = conn.execute(
        "UPDATE projects
         SET email = ?, claim_token = ?, claim_token_issued_at = ?, allow_contact = ?,
             updated_at = ?
         WHERE slug = ? AND claimed = 0",
        params![email, token, issued_at, allow_contact, issued_at, slug],
    )?;

    Ok(updated > 0)
}

pub async fn find_by_claim_token(
    conn: AsyncDbConnection,
    slug: &str,
    token: &str,
) -> Result<Option<ProjectRecord>> {
    let conn = conn.lock().await?;

    let project = conn
        .query_row(
            &format!(
                "SELECT {} FROM projects WHERE slug = ? AND claim_token = ?",
                PROJECT_COLUMNS
            ),
            params![slug, token],
            project_from_row,
        )
        .optional()?;

    Ok(project)
}

/// Redeem a claim token. Only one caller can win for a given token.
pub async fn complete_claim(
    conn: AsyncDbConnection,
    slug: &str,
    token: &str,
    now: i64,
) -> Result<bool> {
    let conn = conn.lock().await?;

    let updated = conn.execute(
        "UPDATE projects
         SET claimed = 1, claim_token = NULL, claim_token_issued_at = NULL, updated_at = ?
         WHERE slug = ? AND claim_token = ? AND claimed = 0",
        params![now, slug, token],
    )?;

    Ok(updated > 0)
}
