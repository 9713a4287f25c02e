use axum::{
    Router,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, auth, journal, landing};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::landing_page))
        .route(
            "/register",
            get(auth::register_page).post(auth::process_register),
        )
        .route("/login", get(auth::login_page).post(auth::process_login))
        .route("/logout", get(auth::logout))
        .route("/journal", get(journal::list_entries_page))
        .route(
            "/journal/new",
            get(journal::new_entry_page).post(journal::create_entry),
        )
        .route("/journal/:id", get(journal::entry_page))
        .route(
            "/journal/:id/edit",
            get(journal::edit_entry_page).post(journal::update_entry),
        )
        .route("/journal/:id/delete", post(journal::delete_entry))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .with_state(state)
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
