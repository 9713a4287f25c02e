use serde::Deserialize;

/// Flash codes survive the redirect as query parameters and render once on
/// the next page.
#[derive(Default, Deserialize)]
pub struct FlashQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

/// Compose a flash message HTML snippet for known status or error codes.
pub fn compose_flash_message(status: Option<&str>, error: Option<&str>) -> String {
    if let Some(status) = status {
        let message = match status {
            "registered" => "Account created. You can sign in now.",
            "logged_in" => "Welcome back.",
            "logged_out" => "You have been signed out.",
            "entry_created" => "Journal entry saved.",
            "entry_updated" => "Journal entry updated.",
            "entry_deleted" => "Journal entry deleted.",
            _ => "",
        };

        if !message.is_empty() {
            return format!(r#"<div class="flash success">{message}</div>"#);
        }
    }

    if let Some(error) = error {
        let message = match error {
            "not_found" => "That journal entry does not exist.",
            "forbidden" => "That journal entry belongs to another account.",
            _ => "Something went wrong. Please try again later.",
        };

        return format!(r#"<div class="flash error">{message}</div>"#);
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_status_renders_success_flash() {
        let html = compose_flash_message(Some("entry_deleted"), None);
        assert!(html.contains("flash success"));
        assert!(html.contains("Journal entry deleted."));
    }

    #[test]
    fn known_error_renders_error_flash() {
        let html = compose_flash_message(None, Some("forbidden"));
        assert!(html.contains("flash error"));
        assert!(html.contains("another account"));
    }

    #[test]
    fn unknown_error_falls_back_to_generic_message() {
        let html = compose_flash_message(None, Some("nonsense"));
        assert!(html.contains("Something went wrong"));
    }

    #[test]
    fn unknown_status_alone_renders_nothing() {
        assert_eq!(compose_flash_message(Some("nonsense"), None), "");
        assert_eq!(compose_flash_message(None, None), "");
    }

    #[test]
    fn status_takes_precedence_over_error() {
        let html = compose_flash_message(Some("registered"), Some("forbidden"));
        assert!(html.contains("flash success"));
    }
}
