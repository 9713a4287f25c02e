use std::borrow::Cow;

use axum::{
    extract::{Query, State},
    response::Html,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;

use crate::web::{
    AppState, PublicUserRow, auth,
    auth::AuthUser,
    flash::{FlashQuery, compose_flash_message},
    templates::{PageLayout, escape_html, render_page},
};

/// Public landing page: every registered member, newest first, with a
/// session-aware header.
pub async fn landing_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<FlashQuery>,
) -> Html<String> {
    let maybe_user = auth::current_user(&state, &jar).await;

    let users = match crate::web::data::fetch_all_users(state.pool_ref()).await {
        Ok(users) => users,
        Err(err) => {
            error!(?err, "failed to load users for landing page");
            Vec::new()
        }
    };

    let flash = compose_flash_message(params.status.as_deref(), params.error.as_deref());
    Html(render_landing_page(maybe_user.as_ref(), &users, &flash))
}

fn render_landing_page(
    user: Option<&AuthUser>,
    users: &[PublicUserRow],
    flash_html: &str,
) -> String {
    let nav = match user {
        Some(user) => format!(
            r#"<span>Signed in as <strong>{username}</strong></span> <a class="nav-link" href="/journal">My journal</a> <a class="nav-link" href="/logout">Sign out</a>"#,
            username = escape_html(&user.username),
        ),
        None => r#"<a class="nav-link" href="/login">Sign in</a> <a class="nav-link" href="/register">Register</a>"#
            .to_string(),
    };

    let members = if users.is_empty() {
        r#"<p class="note">Nobody has registered yet.</p>"#.to_string()
    } else {
        let rows = users
            .iter()
            .map(|row| {
                format!(
                    "<tr><td>{username}</td><td>{joined}</td></tr>",
                    username = escape_html(&row.username),
                    joined = row.joined_at.format("%Y-%m-%d"),
                )
            })
            .collect::<String>();

        format!(
            r#"<table>
                <thead><tr><th>Member</th><th>Joined</th></tr></thead>
                <tbody>{rows}</tbody>
            </table>"#
        )
    };

    let body = format!(
        r#"<section>
            <p class="note">A quiet place to keep a daily journal. Entries are private to their author.</p>
            {members}
        </section>"#,
    );

    render_page(PageLayout {
        meta_title: "Daybook",
        heading: "Daybook",
        nav_html: Cow::Owned(nav),
        flash_html: Cow::Borrowed(flash_html),
        body_html: Cow::Owned(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn member(username: &str) -> PublicUserRow {
        PublicUserRow {
            username: username.to_string(),
            joined_at: Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn anonymous_visitors_see_sign_in_links() {
        let html = render_landing_page(None, &[member("alice")], "");
        assert!(html.contains(r#"href="/login""#));
        assert!(html.contains(r#"href="/register""#));
        assert!(html.contains("alice"));
        assert!(html.contains("2026-01-15"));
    }

    #[test]
    fn signed_in_visitors_see_their_journal_link() {
        let user = AuthUser {
            id: 1,
            username: "alice".to_string(),
        };
        let html = render_landing_page(Some(&user), &[member("alice")], "");
        assert!(html.contains(r#"href="/journal""#));
        assert!(html.contains(r#"href="/logout""#));
        assert!(!html.contains(r#"href="/login""#));
    }

    #[test]
    fn usernames_are_escaped() {
        let html = render_landing_page(None, &[member("<script>")], "");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>alert"));
    }
}
