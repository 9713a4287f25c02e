use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration as ChronoDuration, Utc};
use cookie::time::Duration as CookieDuration;
use rand_core::OsRng;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::web::{
    AppState, data,
    flash::{FlashQuery, compose_flash_message},
    models::UserRow,
    templates::{RegisterPrefill, render_login_page, render_register_page},
    validate::{self, FieldError, RegistrationInput},
};

/// Identity resolved from an active session, passed into handlers instead of
/// living in any ambient global.
#[derive(Clone, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

pub const SESSION_COOKIE: &str = "auth_token";
pub const SESSION_TTL_DAYS: i64 = 1;
pub const REMEMBER_SESSION_TTL_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("username already taken")]
    DuplicateUsername,
    #[error("failed to hash password")]
    Hash,
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

pub struct EstablishedSession {
    pub token: Uuid,
    pub ttl_days: i64,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password2: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: Option<String>,
}

pub async fn register_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Redirect> {
    if let Some(redirect) = redirect_if_authenticated(&state, &jar).await {
        return Err(redirect);
    }

    Ok(Html(render_register_page(
        &[],
        &RegisterPrefill::default(),
    )))
}

pub async fn process_register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, (StatusCode, Html<String>)> {
    if let Some(redirect) = redirect_if_authenticated(&state, &jar).await {
        return Ok(redirect);
    }

    let prefill = RegisterPrefill {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
    };

    let input = match validate::validate_registration(
        &form.username,
        &form.email,
        &form.password,
        &form.password2,
    ) {
        Ok(input) => input,
        Err(errors) => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_register_page(&errors, &prefill)),
            ));
        }
    };

    match register(state.pool_ref(), &input).await {
        Ok(user) => {
            info!(user_id = user.id, username = %user.username, "registered new user");
            Ok(Redirect::to("/login?status=registered"))
        }
        Err(RegisterError::DuplicateEmail) => Err((
            StatusCode::CONFLICT,
            Html(render_register_page(
                &[FieldError {
                    field: "email",
                    message: "This email is already registered.",
                }],
                &prefill,
            )),
        )),
        Err(RegisterError::DuplicateUsername) => Err((
            StatusCode::CONFLICT,
            Html(render_register_page(
                &[FieldError {
                    field: "username",
                    message: "This username is already taken.",
                }],
                &prefill,
            )),
        )),
        Err(err) => {
            error!(?err, "failed to register user");
            Err(server_error())
        }
    }
}

/// Creates the user record. Duplicate email is reported before duplicate
/// username, including when both conflict at once; the unique indexes
/// backstop the pre-checks against concurrent registrations.
pub async fn register(pool: &PgPool, input: &RegistrationInput) -> Result<UserRow, RegisterError> {
    if data::email_exists(pool, &input.email).await? {
        return Err(RegisterError::DuplicateEmail);
    }
    if data::username_exists(pool, &input.username).await? {
        return Err(RegisterError::DuplicateUsername);
    }

    let password_hash = hash_password(&input.password).map_err(|err| {
        error!(%err, "failed to hash password during registration");
        RegisterError::Hash
    })?;

    match data::insert_user(pool, &input.username, &input.email, &password_hash).await {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            match db_err.constraint() {
                Some("users_username_key") => Err(RegisterError::DuplicateUsername),
                _ => Err(RegisterError::DuplicateEmail),
            }
        }
        Err(err) => Err(RegisterError::Store(err)),
    }
}

pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<FlashQuery>,
) -> Result<Html<String>, Redirect> {
    if let Some(redirect) = redirect_if_authenticated(&state, &jar).await {
        return Err(redirect);
    }

    let flash = compose_flash_message(params.status.as_deref(), params.error.as_deref());
    Ok(Html(render_login_page(&[], "", &flash)))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    if let Some(redirect) = redirect_if_authenticated(&state, &jar).await {
        return Ok((jar, redirect));
    }

    let email_value = form.email.trim().to_string();

    let input = match validate::validate_login(&form.email, &form.password) {
        Ok(input) => input,
        Err(errors) => {
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(render_login_page(&errors, &email_value, "")),
            ));
        }
    };

    let remember = form.remember.is_some();

    match login(state.pool_ref(), &input.email, &input.password, remember).await {
        Ok(session) => {
            let jar = jar.add(session_cookie(session.token, session.ttl_days));
            Ok((jar, Redirect::to("/?status=logged_in")))
        }
        Err(LoginError::InvalidCredentials) => Err((
            StatusCode::UNAUTHORIZED,
            Html(render_login_page(
                &[FieldError {
                    field: "form",
                    message: "Invalid email or password.",
                }],
                &email_value,
                "",
            )),
        )),
        Err(LoginError::Store(err)) => {
            error!(?err, "failed to process login");
            Err(server_error())
        }
    }
}

/// Verifies credentials and establishes a session. A missing user and a
/// failed hash check produce the identical error value, so the response
/// never reveals which field was wrong.
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
    remember: bool,
) -> Result<EstablishedSession, LoginError> {
    let user = match data::fetch_user_by_email(pool, email).await? {
        Some(user) => user,
        None => return Err(LoginError::InvalidCredentials),
    };

    if !verify_password(password, &user.password_hash) {
        return Err(LoginError::InvalidCredentials);
    }

    let ttl_days = if remember {
        REMEMBER_SESSION_TTL_DAYS
    } else {
        SESSION_TTL_DAYS
    };

    // Expired rows for this user are reaped here rather than by a background
    // task.
    sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= NOW()")
        .bind(user.id)
        .execute(pool)
        .await?;

    let token = Uuid::new_v4();
    let expires_at = Utc::now() + ChronoDuration::days(ttl_days);

    sqlx::query("INSERT INTO sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(user.id)
        .bind(expires_at)
        .execute(pool)
        .await?;

    Ok(EstablishedSession { token, ttl_days })
}

/// Idempotent: an unknown or already-removed token still clears the cookie.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut jar = jar;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(token) = Uuid::parse_str(cookie.value()) {
            if let Err(err) = sqlx::query("DELETE FROM sessions WHERE id = $1")
                .bind(token)
                .execute(state.pool_ref())
                .await
            {
                error!(?err, "failed to remove session during logout");
            }
        }
    }

    jar = jar.remove(removal_cookie());

    (jar, Redirect::to("/?status=logged_out"))
}

pub async fn current_user(state: &AppState, jar: &CookieJar) -> Option<AuthUser> {
    let token_cookie = jar.get(SESSION_COOKIE)?;
    let token = Uuid::parse_str(token_cookie.value()).ok()?;

    match fetch_user_by_session(state.pool_ref(), token).await {
        Ok(user) => user,
        Err(err) => {
            error!(?err, "failed to resolve session");
            None
        }
    }
}

/// Handler guard for session-protected routes.
pub async fn require_user(state: &AppState, jar: &CookieJar) -> Result<AuthUser, Redirect> {
    current_user(state, jar)
        .await
        .ok_or_else(|| Redirect::to("/login"))
}

/// Already-authenticated visitors to the register/login forms are sent back
/// to the landing page instead of being re-processed.
pub async fn redirect_if_authenticated(state: &AppState, jar: &CookieJar) -> Option<Redirect> {
    current_user(state, jar).await.map(|_| Redirect::to("/"))
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn fetch_user_by_session(pool: &PgPool, token: Uuid) -> sqlx::Result<Option<AuthUser>> {
    sqlx::query_as::<_, AuthUser>(
        "SELECT users.id, users.username FROM sessions JOIN users ON users.id = sessions.user_id WHERE sessions.id = $1 AND sessions.expires_at > NOW()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

fn session_cookie(token: Uuid, ttl_days: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::days(ttl_days));
    cookie
}

fn removal_cookie() -> Cookie<'static> {
    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(CookieDuration::seconds(0));
    removal
}

fn server_error() -> (StatusCode, Html<String>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<h1>Server error</h1><p>Please try again later.</p>".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_never_stores_plaintext() {
        let hash = hash_password("secret1").expect("hashing should succeed");
        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(verify_password("correct-horse-battery-staple", &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("secret1").expect("hashing should succeed");
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn verify_rejects_malformed_stored_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn two_hashes_of_the_same_password_differ() {
        let first = hash_password("secret1").expect("hashing should succeed");
        let second = hash_password("secret1").expect("hashing should succeed");
        assert_ne!(first, second);
    }

    #[test]
    fn session_cookie_is_scoped_and_http_only() {
        let cookie = session_cookie(Uuid::new_v4(), SESSION_TTL_DAYS);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(
            cookie.max_age(),
            Some(CookieDuration::days(SESSION_TTL_DAYS))
        );
    }

    #[test]
    fn remember_extends_cookie_lifetime() {
        let short = session_cookie(Uuid::new_v4(), SESSION_TTL_DAYS);
        let long = session_cookie(Uuid::new_v4(), REMEMBER_SESSION_TTL_DAYS);
        assert!(long.max_age() > short.max_age());
    }
}
