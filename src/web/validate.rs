use lazy_static::lazy_static;
use regex::Regex;

/// Field-level validation failure, rendered inline on the re-displayed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

/// Normalized registration fields. Username and email are trimmed; the
/// password is taken verbatim so leading/trailing whitespace round-trips
/// through hashing.
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct EntryInput {
    pub title: String,
    pub content: String,
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    password2: &str,
) -> Result<RegistrationInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    let username = username.trim();
    if username.is_empty() {
        errors.push(FieldError::new("username", "Please enter a username."));
    }

    let email = email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Please enter an email address."));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new(
            "email",
            "Please enter a valid email address.",
        ));
    }

    if password.is_empty() {
        errors.push(FieldError::new("password", "Please enter a password."));
    }

    if password2.is_empty() {
        errors.push(FieldError::new("password2", "Please repeat the password."));
    } else if !password.is_empty() && password.as_bytes() != password2.as_bytes() {
        errors.push(FieldError::new("password2", "The passwords do not match."));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(RegistrationInput {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_login(email: &str, password: &str) -> Result<LoginInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    let email = email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Please enter an email address."));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new(
            "email",
            "Please enter a valid email address.",
        ));
    }

    if password.is_empty() {
        errors.push(FieldError::new("password", "Please enter a password."));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(LoginInput {
        email: email.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_entry(title: &str, content: &str) -> Result<EntryInput, Vec<FieldError>> {
    let mut errors = Vec::new();

    let title = title.trim();
    if title.is_empty() {
        errors.push(FieldError::new("title", "Please enter a title."));
    }

    let content = content.trim();
    if content.is_empty() {
        errors.push(FieldError::new("content", "Please write some content."));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(EntryInput {
        title: title.to_string(),
        content: content.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|err| err.field).collect()
    }

    #[test]
    fn registration_accepts_valid_input() {
        let input = validate_registration("alice", "a@x.com", "secret1", "secret1")
            .expect("valid registration should pass");
        assert_eq!(input.username, "alice");
        assert_eq!(input.email, "a@x.com");
        assert_eq!(input.password, "secret1");
    }

    #[test]
    fn registration_trims_username_and_email_but_not_password() {
        let input = validate_registration("  alice ", " a@x.com ", " secret1 ", " secret1 ")
            .expect("valid registration should pass");
        assert_eq!(input.username, "alice");
        assert_eq!(input.email, "a@x.com");
        assert_eq!(input.password, " secret1 ");
    }

    #[test]
    fn registration_requires_every_field() {
        let errors = validate_registration("", "", "", "").unwrap_err();
        assert_eq!(fields(&errors), vec!["username", "email", "password", "password2"]);
    }

    #[test]
    fn registration_rejects_malformed_email() {
        let errors = validate_registration("alice", "not-an-email", "pw", "pw").unwrap_err();
        assert_eq!(fields(&errors), vec!["email"]);
    }

    #[test]
    fn registration_rejects_password_mismatch() {
        let errors = validate_registration("alice", "a@x.com", "secret1", "secret2").unwrap_err();
        assert_eq!(fields(&errors), vec!["password2"]);
    }

    #[test]
    fn registration_password_comparison_is_byte_exact() {
        assert!(validate_registration("alice", "a@x.com", "secret1", "Secret1").is_err());
        assert!(validate_registration("alice", "a@x.com", "secret1 ", "secret1").is_err());
    }

    #[test]
    fn email_shape_is_syntactic_only() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a x@y.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@@x.com"));
    }

    #[test]
    fn login_requires_both_fields() {
        let errors = validate_login(" ", "").unwrap_err();
        assert_eq!(fields(&errors), vec!["email", "password"]);
    }

    #[test]
    fn entry_rejects_blank_title_or_content() {
        let errors = validate_entry("   ", "hello").unwrap_err();
        assert_eq!(fields(&errors), vec!["title"]);

        let errors = validate_entry("Day 1", "\n\t ").unwrap_err();
        assert_eq!(fields(&errors), vec!["content"]);
    }

    #[test]
    fn entry_trims_title_and_content() {
        let input = validate_entry(" Day 1 ", " hello \n").expect("valid entry should pass");
        assert_eq!(input.title, "Day 1");
        assert_eq!(input.content, "hello");
    }
}
