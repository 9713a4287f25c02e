use std::borrow::Cow;

use chrono::{Datelike, Utc};

use crate::web::validate::FieldError;

const PAGE_BASE_STYLES: &str = r#"
        :root { color-scheme: light; }
        body { font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; min-height: 100vh; display: flex; flex-direction: column; }
        header { background: #ffffff; padding: 2rem 1.5rem; border-bottom: 1px solid #e2e8f0; }
        .header-bar { display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 1rem; }
        .header-bar h1 { margin: 0; font-size: 1.8rem; }
        nav { display: flex; align-items: center; flex-wrap: wrap; gap: 0.75rem; }
        nav span { color: #475569; font-size: 0.95rem; }
        .nav-link { display: inline-flex; align-items: center; gap: 0.4rem; color: #1d4ed8; text-decoration: none; font-weight: 600; background: #e0f2fe; padding: 0.5rem 0.95rem; border-radius: 999px; border: 1px solid #bfdbfe; transition: background 0.15s ease, border 0.15s ease; }
        .nav-link:hover { background: #bfdbfe; border-color: #93c5fd; }
        main { flex: 1; padding: 2rem 1.5rem; max-width: 860px; margin: 0 auto; width: 100%; box-sizing: border-box; }
        .panel { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.5rem; box-shadow: 0 18px 40px rgba(15, 23, 42, 0.08); }
        .panel h2 { margin-top: 0; }
        label { display: block; margin-top: 1.2rem; font-weight: 600; color: #0f172a; }
        input, textarea { width: 100%; padding: 0.85rem; margin-top: 0.65rem; border-radius: 10px; border: 1px solid #cbd5f5; background: #f8fafc; color: #0f172a; font-size: 1rem; box-sizing: border-box; }
        input:focus, textarea:focus { outline: none; border-color: #2563eb; box-shadow: 0 0 0 3px rgba(37, 99, 235, 0.15); }
        textarea { min-height: 12rem; resize: vertical; font-family: inherit; }
        .checkbox-row { display: flex; align-items: center; gap: 0.5rem; margin-top: 1.2rem; }
        .checkbox-row input { width: auto; margin: 0; }
        .checkbox-row label { margin: 0; font-weight: 500; }
        button { margin-top: 1.5rem; padding: 0.85rem 1.2rem; border: none; border-radius: 10px; background: #2563eb; color: #ffffff; font-weight: 600; font-size: 1rem; cursor: pointer; transition: background 0.15s ease; }
        button:hover { background: #1d4ed8; }
        button.danger { background: #dc2626; }
        button.danger:hover { background: #b91c1c; }
        table { width: 100%; border-collapse: collapse; margin-top: 1.5rem; background: #ffffff; border: 1px solid #e2e8f0; border-radius: 12px; overflow: hidden; }
        th, td { padding: 0.75rem 1rem; border-bottom: 1px solid #e2e8f0; text-align: left; }
        th { background: #f1f5f9; color: #0f172a; font-weight: 600; }
        .flash { padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; border: 1px solid transparent; }
        .flash.success { background: #ecfdf3; border-color: #bbf7d0; color: #166534; }
        .flash.error { background: #fef2f2; border-color: #fecaca; color: #b91c1c; }
        .flash ul { margin: 0; padding-left: 1.25rem; font-weight: 500; }
        .note { color: #475569; font-size: 0.95rem; line-height: 1.6; }
        .entry-list { list-style: none; margin: 1.5rem 0 0; padding: 0; display: grid; gap: 1rem; }
        .entry-card { background: #ffffff; border-radius: 12px; border: 1px solid #e2e8f0; padding: 1.25rem; box-shadow: 0 12px 30px rgba(15, 23, 42, 0.06); }
        .entry-card h3 { margin: 0 0 0.5rem; font-size: 1.1rem; }
        .entry-card h3 a { color: #0f172a; text-decoration: none; }
        .entry-card h3 a:hover { color: #1d4ed8; }
        .entry-meta { color: #64748b; font-size: 0.85rem; }
        .entry-content { white-space: pre-wrap; line-height: 1.7; }
        .entry-actions { display: flex; gap: 0.75rem; align-items: center; margin-top: 1.5rem; }
        .entry-actions form { margin: 0; }
        .entry-actions button { margin-top: 0; }
        .app-footer { margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #94a3b8; }
        @media (max-width: 768px) {
            header { padding: 1.5rem 1rem; }
            main { padding: 1.5rem 1rem; }
            .header-bar { flex-direction: column; align-items: flex-start; }
            th, td { padding: 0.5rem; }
        }
"#;

pub struct PageLayout<'a> {
    pub meta_title: &'a str,
    pub heading: &'a str,
    pub nav_html: Cow<'a, str>,
    pub flash_html: Cow<'a, str>,
    pub body_html: Cow<'a, str>,
}

pub fn render_page(layout: PageLayout<'_>) -> String {
    let PageLayout {
        meta_title,
        heading,
        nav_html,
        flash_html,
        body_html,
    } = layout;

    let footer = render_footer();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{meta_title}</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
{styles}
    </style>
</head>
<body>
    <header>
        <div class="header-bar">
            <h1>{heading}</h1>
            <nav>
                {nav_html}
            </nav>
        </div>
    </header>
    <main>
        {flash_html}
        {body_html}
        {footer}
    </main>
</body>
</html>"#,
        meta_title = meta_title,
        heading = heading,
        nav_html = nav_html,
        flash_html = flash_html,
        body_html = body_html,
        styles = PAGE_BASE_STYLES,
        footer = footer,
    )
}

/// Renders field errors as a flash-styled list at the top of a form, or
/// nothing when the slice is empty.
pub fn render_field_errors(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let items = errors
        .iter()
        .map(|err| format!("<li>{}</li>", escape_html(err.message)))
        .collect::<String>();

    format!(r#"<div class="flash error"><ul>{items}</ul></div>"#)
}

#[derive(Default)]
pub struct RegisterPrefill {
    pub username: String,
    pub email: String,
}

pub fn render_register_page(errors: &[FieldError], prefill: &RegisterPrefill) -> String {
    let body = format!(
        r#"<section class="panel">
            <h2>Create an account</h2>
            <p class="note">Pick a username, then sign in with your email address.</p>
            <form method="post" action="/register">
                <label for="username">Username</label>
                <input id="username" name="username" value="{username}" required>
                <label for="email">Email</label>
                <input id="email" name="email" type="email" value="{email}" required>
                <label for="password">Password</label>
                <input id="password" type="password" name="password" required>
                <label for="password2">Repeat password</label>
                <input id="password2" type="password" name="password2" required>
                <button type="submit">Register</button>
            </form>
        </section>"#,
        username = escape_html(&prefill.username),
        email = escape_html(&prefill.email),
    );

    render_page(PageLayout {
        meta_title: "Register · Daybook",
        heading: "Daybook",
        nav_html: Cow::Borrowed(
            r#"<a class="nav-link" href="/">Home</a> <a class="nav-link" href="/login">Sign in</a>"#,
        ),
        flash_html: Cow::Owned(render_field_errors(errors)),
        body_html: Cow::Owned(body),
    })
}

pub fn render_login_page(errors: &[FieldError], email_value: &str, flash_html: &str) -> String {
    let error_html = render_field_errors(errors);

    let body = format!(
        r#"<section class="panel">
            <h2>Sign in</h2>
            <form method="post" action="/login">
                <label for="email">Email</label>
                <input id="email" name="email" type="email" value="{email}" required>
                <label for="password">Password</label>
                <input id="password" type="password" name="password" required>
                <div class="checkbox-row">
                    <input id="remember" type="checkbox" name="remember" value="on">
                    <label for="remember">Remember me</label>
                </div>
                <button type="submit">Sign in</button>
            </form>
            <p class="note">No account yet? <a href="/register">Register here</a>.</p>
        </section>"#,
        email = escape_html(email_value),
    );

    render_page(PageLayout {
        meta_title: "Sign in · Daybook",
        heading: "Daybook",
        nav_html: Cow::Borrowed(
            r#"<a class="nav-link" href="/">Home</a> <a class="nav-link" href="/register">Register</a>"#,
        ),
        flash_html: Cow::Owned(format!("{flash_html}{error_html}")),
        body_html: Cow::Owned(body),
    })
}

pub fn render_footer() -> String {
    let current_year = Utc::now().year();
    format!(r#"<footer class="app-footer">© {year} Daybook</footer>"#, year = current_year)
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("hi")</script>"#),
            "&lt;script&gt;alert(&quot;hi&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("a & b's"), "a &amp; b&#39;s");
    }

    #[test]
    fn field_errors_render_each_message() {
        let errors = [
            FieldError {
                field: "email",
                message: "Please enter an email address.",
            },
            FieldError {
                field: "password",
                message: "Please enter a password.",
            },
        ];
        let html = render_field_errors(&errors);
        assert!(html.contains("flash error"));
        assert!(html.contains("Please enter an email address."));
        assert!(html.contains("Please enter a password."));
    }

    #[test]
    fn no_errors_render_nothing() {
        assert_eq!(render_field_errors(&[]), "");
    }

    #[test]
    fn register_page_preserves_and_escapes_prefill() {
        let prefill = RegisterPrefill {
            username: "<bob>".to_string(),
            email: "b@x.com".to_string(),
        };
        let html = render_register_page(&[], &prefill);
        assert!(html.contains("&lt;bob&gt;"));
        assert!(!html.contains("<bob>"));
        assert!(html.contains(r#"value="b@x.com""#));
    }

    #[test]
    fn login_page_never_echoes_a_password_value() {
        let html = render_login_page(&[], "a@x.com", "");
        assert!(html.contains(r#"type="password" name="password""#));
        assert!(!html.contains(r#"name="password" value"#));
    }
}
