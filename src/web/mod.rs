pub mod auth;
pub mod data;
pub mod flash;
pub mod journal;
pub mod journal_ui;
pub mod landing;
pub mod models;
pub mod router;
pub mod state;
pub mod templates;
pub mod validate;

pub use auth::{AuthUser, REMEMBER_SESSION_TTL_DAYS, SESSION_COOKIE, SESSION_TTL_DAYS};
pub use flash::compose_flash_message;
pub use models::{JournalEntryRow, PublicUserRow, UserRow};
pub use state::AppState;
pub use templates::{escape_html, render_footer};
