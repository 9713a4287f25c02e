use sqlx::PgPool;

use super::models::{JournalEntryRow, PublicUserRow, UserRow};

pub async fn fetch_all_users(pool: &PgPool) -> sqlx::Result<Vec<PublicUserRow>> {
    sqlx::query_as::<_, PublicUserRow>(
        "SELECT username, joined_at FROM users ORDER BY joined_at DESC, username",
    )
    .fetch_all(pool)
    .await
}

pub async fn fetch_user_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, password_hash, joined_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn email_exists(pool: &PgPool, email: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await
}

pub async fn username_exists(pool: &PgPool, username: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await
}

pub async fn insert_user(
    pool: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> sqlx::Result<UserRow> {
    sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (username, email, password_hash)
         VALUES ($1, $2, $3)
         RETURNING id, username, email, password_hash, joined_at",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

/// Explicit owner-scoped listing, newest first.
pub async fn entries_by_owner(pool: &PgPool, owner_id: i64) -> sqlx::Result<Vec<JournalEntryRow>> {
    sqlx::query_as::<_, JournalEntryRow>(
        "SELECT id, owner_id, title, content, created_at, updated_at
         FROM journal_entries
         WHERE owner_id = $1
         ORDER BY created_at DESC, id DESC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_entry(pool: &PgPool, entry_id: i64) -> sqlx::Result<Option<JournalEntryRow>> {
    sqlx::query_as::<_, JournalEntryRow>(
        "SELECT id, owner_id, title, content, created_at, updated_at
         FROM journal_entries
         WHERE id = $1",
    )
    .bind(entry_id)
    .fetch_optional(pool)
    .await
}

pub async fn insert_entry(
    pool: &PgPool,
    owner_id: i64,
    title: &str,
    content: &str,
) -> sqlx::Result<JournalEntryRow> {
    sqlx::query_as::<_, JournalEntryRow>(
        "INSERT INTO journal_entries (owner_id, title, content)
         VALUES ($1, $2, $3)
         RETURNING id, owner_id, title, content, created_at, updated_at",
    )
    .bind(owner_id)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await
}

/// Overwrites title and content and refreshes `updated_at`; `created_at` is
/// never touched.
pub async fn update_entry(
    pool: &PgPool,
    entry_id: i64,
    title: &str,
    content: &str,
) -> sqlx::Result<Option<JournalEntryRow>> {
    sqlx::query_as::<_, JournalEntryRow>(
        "UPDATE journal_entries
         SET title = $2, content = $3, updated_at = NOW()
         WHERE id = $1
         RETURNING id, owner_id, title, content, created_at, updated_at",
    )
    .bind(entry_id)
    .bind(title)
    .bind(content)
    .fetch_optional(pool)
    .await
}

pub async fn delete_entry(pool: &PgPool, entry_id: i64) -> sqlx::Result<u64> {
    sqlx::query("DELETE FROM journal_entries WHERE id = $1")
        .bind(entry_id)
        .execute(pool)
        .await
        .map(|result| result.rows_affected())
}
