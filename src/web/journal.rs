use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::error;

use crate::web::{
    AppState, auth, data,
    flash::{FlashQuery, compose_flash_message},
    journal_ui::{EntryFormMode, render_entry_form, render_entry_view, render_journal_list},
    models::JournalEntryRow,
    validate,
};

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("journal entry not found")]
    NotFound,
    #[error("journal entry belongs to another user")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

#[derive(Deserialize)]
pub struct EntryForm {
    pub title: String,
    pub content: String,
}

/// The single ownership gate: every read/update/delete resolves the stored
/// row first and compares its `owner_id` against the session user. A
/// client-supplied owner field is never consulted.
pub async fn load_owned_entry(
    pool: &PgPool,
    user_id: i64,
    entry_id: i64,
) -> Result<JournalEntryRow, EntryError> {
    let entry = data::fetch_entry(pool, entry_id)
        .await?
        .ok_or(EntryError::NotFound)?;

    check_owner(entry, user_id)
}

fn check_owner(entry: JournalEntryRow, user_id: i64) -> Result<JournalEntryRow, EntryError> {
    if entry.owner_id != user_id {
        return Err(EntryError::Forbidden);
    }

    Ok(entry)
}

pub async fn list_entries_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<FlashQuery>,
) -> Result<Html<String>, Redirect> {
    let user = auth::require_user(&state, &jar).await?;

    let entries = match data::entries_by_owner(state.pool_ref(), user.id).await {
        Ok(entries) => entries,
        Err(err) => {
            error!(?err, user_id = user.id, "failed to load journal entries");
            return Err(Redirect::to("/?error=unknown"));
        }
    };

    let flash = compose_flash_message(params.status.as_deref(), params.error.as_deref());
    Ok(Html(render_journal_list(&user, &entries, &flash)))
}

pub async fn new_entry_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Redirect> {
    let _user = auth::require_user(&state, &jar).await?;

    Ok(Html(render_entry_form(EntryFormMode::New, &[], "", "")))
}

pub async fn create_entry(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<EntryForm>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    let user = match auth::require_user(&state, &jar).await {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };

    let input = match validate::validate_entry(&form.title, &form.content) {
        Ok(input) => input,
        Err(errors) => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_entry_form(
                    EntryFormMode::New,
                    &errors,
                    &form.title,
                    &form.content,
                )),
            ));
        }
    };

    match data::insert_entry(state.pool_ref(), user.id, &input.title, &input.content).await {
        Ok(entry) => Ok(Redirect::to(&format!(
            "/journal/{}?status=entry_created",
            entry.id
        ))),
        Err(err) => {
            error!(?err, user_id = user.id, "failed to create journal entry");
            Ok(Redirect::to("/journal?error=unknown"))
        }
    }
}

pub async fn entry_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(entry_id): Path<i64>,
    Query(params): Query<FlashQuery>,
) -> Result<Html<String>, Redirect> {
    let user = auth::require_user(&state, &jar).await?;

    match load_owned_entry(state.pool_ref(), user.id, entry_id).await {
        Ok(entry) => {
            let flash = compose_flash_message(params.status.as_deref(), params.error.as_deref());
            Ok(Html(render_entry_view(&user, &entry, &flash)))
        }
        Err(err) => Err(entry_error_redirect(err, user.id, entry_id)),
    }
}

pub async fn edit_entry_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(entry_id): Path<i64>,
) -> Result<Html<String>, Redirect> {
    let user = auth::require_user(&state, &jar).await?;

    match load_owned_entry(state.pool_ref(), user.id, entry_id).await {
        Ok(entry) => Ok(Html(render_entry_form(
            EntryFormMode::Edit {
                entry_id: entry.id,
            },
            &[],
            &entry.title,
            &entry.content,
        ))),
        Err(err) => Err(entry_error_redirect(err, user.id, entry_id)),
    }
}

pub async fn update_entry(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(entry_id): Path<i64>,
    Form(form): Form<EntryForm>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    let user = match auth::require_user(&state, &jar).await {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };

    if let Err(err) = load_owned_entry(state.pool_ref(), user.id, entry_id).await {
        return Ok(entry_error_redirect(err, user.id, entry_id));
    }

    // Validation failure re-renders the form and leaves the stored row
    // untouched.
    let input = match validate::validate_entry(&form.title, &form.content) {
        Ok(input) => input,
        Err(errors) => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_entry_form(
                    EntryFormMode::Edit { entry_id },
                    &errors,
                    &form.title,
                    &form.content,
                )),
            ));
        }
    };

    match data::update_entry(state.pool_ref(), entry_id, &input.title, &input.content).await {
        Ok(Some(entry)) => Ok(Redirect::to(&format!(
            "/journal/{}?status=entry_updated",
            entry.id
        ))),
        Ok(None) => Ok(Redirect::to("/journal?error=not_found")),
        Err(err) => {
            error!(?err, user_id = user.id, entry_id, "failed to update journal entry");
            Ok(Redirect::to("/journal?error=unknown"))
        }
    }
}

pub async fn delete_entry(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(entry_id): Path<i64>,
) -> Result<Redirect, Redirect> {
    let user = auth::require_user(&state, &jar).await?;

    if let Err(err) = load_owned_entry(state.pool_ref(), user.id, entry_id).await {
        return Ok(entry_error_redirect(err, user.id, entry_id));
    }

    match data::delete_entry(state.pool_ref(), entry_id).await {
        Ok(affected) if affected > 0 => Ok(Redirect::to("/journal?status=entry_deleted")),
        Ok(_) => Ok(Redirect::to("/journal?error=not_found")),
        Err(err) => {
            error!(?err, user_id = user.id, entry_id, "failed to delete journal entry");
            Ok(Redirect::to("/journal?error=unknown"))
        }
    }
}

fn entry_error_redirect(err: EntryError, user_id: i64, entry_id: i64) -> Redirect {
    match err {
        EntryError::NotFound => Redirect::to("/journal?error=not_found"),
        EntryError::Forbidden => Redirect::to("/journal?error=forbidden"),
        EntryError::Store(err) => {
            error!(?err, user_id, entry_id, "failed to load journal entry");
            Redirect::to("/journal?error=unknown")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(owner_id: i64) -> JournalEntryRow {
        let now = Utc::now();
        JournalEntryRow {
            id: 1,
            owner_id,
            title: "Day 1".to_string(),
            content: "hello".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn owner_passes_the_gate() {
        let gated = check_owner(entry(7), 7).expect("owner should pass");
        assert_eq!(gated.id, 1);
    }

    #[test]
    fn non_owner_is_forbidden() {
        let err = check_owner(entry(7), 8).unwrap_err();
        assert!(matches!(err, EntryError::Forbidden));
    }

    #[test]
    fn entry_errors_render_distinct_messages() {
        assert_eq!(EntryError::NotFound.to_string(), "journal entry not found");
        assert_eq!(
            EntryError::Forbidden.to_string(),
            "journal entry belongs to another user"
        );
    }
}
