use std::borrow::Cow;

use chrono::{DateTime, Utc};

use crate::web::{
    auth::AuthUser,
    models::JournalEntryRow,
    templates::{PageLayout, escape_html, render_field_errors, render_page},
    validate::FieldError,
};

pub enum EntryFormMode {
    New,
    Edit { entry_id: i64 },
}

impl EntryFormMode {
    fn action(&self) -> String {
        match self {
            Self::New => "/journal/new".to_string(),
            Self::Edit { entry_id } => format!("/journal/{entry_id}/edit"),
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Self::New => "New entry",
            Self::Edit { .. } => "Edit entry",
        }
    }

    fn submit_label(&self) -> &'static str {
        match self {
            Self::New => "Save entry",
            Self::Edit { .. } => "Save changes",
        }
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn journal_nav(user: &AuthUser) -> String {
    format!(
        r#"<span>Signed in as <strong>{username}</strong></span> <a class="nav-link" href="/">Home</a> <a class="nav-link" href="/journal">My journal</a> <a class="nav-link" href="/logout">Sign out</a>"#,
        username = escape_html(&user.username),
    )
}

pub fn render_journal_list(
    user: &AuthUser,
    entries: &[JournalEntryRow],
    flash_html: &str,
) -> String {
    let list = if entries.is_empty() {
        r#"<p class="note">No entries yet. Write your first one.</p>"#.to_string()
    } else {
        let cards = entries
            .iter()
            .map(|entry| {
                format!(
                    r#"<li class="entry-card"><h3><a href="/journal/{id}">{title}</a></h3><p class="entry-meta">Created {created}</p></li>"#,
                    id = entry.id,
                    title = escape_html(&entry.title),
                    created = format_timestamp(&entry.created_at),
                )
            })
            .collect::<String>();
        format!(r#"<ul class="entry-list">{cards}</ul>"#)
    };

    let body = format!(
        r#"<section>
            <a class="nav-link" href="/journal/new">＋ New entry</a>
            {list}
        </section>"#,
    );

    render_page(PageLayout {
        meta_title: "My journal · Daybook",
        heading: "My journal",
        nav_html: Cow::Owned(journal_nav(user)),
        flash_html: Cow::Borrowed(flash_html),
        body_html: Cow::Owned(body),
    })
}

pub fn render_entry_form(
    mode: EntryFormMode,
    errors: &[FieldError],
    title_value: &str,
    content_value: &str,
) -> String {
    let body = format!(
        r#"<section class="panel">
            <h2>{heading}</h2>
            <form method="post" action="{action}">
                <label for="title">Title</label>
                <input id="title" name="title" value="{title}" required>
                <label for="content">Content</label>
                <textarea id="content" name="content" required>{content}</textarea>
                <button type="submit">{submit_label}</button>
            </form>
        </section>"#,
        heading = mode.heading(),
        action = mode.action(),
        title = escape_html(title_value),
        content = escape_html(content_value),
        submit_label = mode.submit_label(),
    );

    render_page(PageLayout {
        meta_title: "Journal · Daybook",
        heading: mode.heading(),
        nav_html: Cow::Borrowed(
            r#"<a class="nav-link" href="/journal">My journal</a> <a class="nav-link" href="/logout">Sign out</a>"#,
        ),
        flash_html: Cow::Owned(render_field_errors(errors)),
        body_html: Cow::Owned(body),
    })
}

pub fn render_entry_view(user: &AuthUser, entry: &JournalEntryRow, flash_html: &str) -> String {
    let body = format!(
        r#"<article class="panel">
            <h2>{title}</h2>
            <p class="entry-meta">Created {created} · Updated {updated}</p>
            <div class="entry-content">{content}</div>
            <div class="entry-actions">
                <a class="nav-link" href="/journal/{id}/edit">Edit</a>
                <form method="post" action="/journal/{id}/delete">
                    <button type="submit" class="danger">Delete</button>
                </form>
            </div>
        </article>"#,
        title = escape_html(&entry.title),
        created = format_timestamp(&entry.created_at),
        updated = format_timestamp(&entry.updated_at),
        content = escape_html(&entry.content),
        id = entry.id,
    );

    render_page(PageLayout {
        meta_title: "Journal · Daybook",
        heading: "My journal",
        nav_html: Cow::Owned(journal_nav(user)),
        flash_html: Cow::Borrowed(flash_html),
        body_html: Cow::Owned(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_entry() -> JournalEntryRow {
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        JournalEntryRow {
            id: 42,
            owner_id: 7,
            title: "Day <1>".to_string(),
            content: "hello & goodbye".to_string(),
            created_at: created,
            updated_at: created,
        }
    }

    fn sample_user() -> AuthUser {
        AuthUser {
            id: 7,
            username: "alice".to_string(),
        }
    }

    #[test]
    fn list_renders_entries_in_given_order() {
        let mut newer = sample_entry();
        newer.id = 43;
        newer.title = "Second".to_string();
        let older = sample_entry();

        let html = render_journal_list(&sample_user(), &[newer, older], "");
        let second = html.find("Second").expect("newer entry rendered");
        let first = html.find("Day &lt;1&gt;").expect("older entry rendered");
        assert!(second < first);
    }

    #[test]
    fn list_shows_empty_hint_without_entries() {
        let html = render_journal_list(&sample_user(), &[], "");
        assert!(html.contains("No entries yet"));
    }

    #[test]
    fn entry_view_escapes_title_and_content() {
        let html = render_entry_view(&sample_user(), &sample_entry(), "");
        assert!(html.contains("Day &lt;1&gt;"));
        assert!(html.contains("hello &amp; goodbye"));
        assert!(!html.contains("Day <1>"));
    }

    #[test]
    fn edit_form_posts_back_to_the_entry() {
        let html = render_entry_form(
            EntryFormMode::Edit { entry_id: 42 },
            &[],
            "Day 1",
            "hello",
        );
        assert!(html.contains(r#"action="/journal/42/edit""#));
        assert!(html.contains(r#"value="Day 1""#));
        assert!(html.contains(">hello</textarea>"));
    }

    #[test]
    fn form_re_render_preserves_and_escapes_input() {
        let errors = [FieldError {
            field: "title",
            message: "Please enter a title.",
        }];
        let html = render_entry_form(EntryFormMode::New, &errors, "", "a <b> c");
        assert!(html.contains("Please enter a title."));
        assert!(html.contains("a &lt;b&gt; c"));
        assert!(html.contains(r#"action="/journal/new""#));
    }
}
