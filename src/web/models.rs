use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Full user record as stored. The hash is a PHC string; the plaintext
/// password never reaches a row.
#[derive(Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub joined_at: DateTime<Utc>,
}

/// Projection safe to show on the public landing page.
#[derive(Clone, FromRow)]
pub struct PublicUserRow {
    pub username: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Clone, Debug, FromRow)]
pub struct JournalEntryRow {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
