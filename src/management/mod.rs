pub mod archive;
mod auth;
mod session;

pub use archive::{archive_folder, list_folder, persist_covers};
pub use auth::REFRESH_MARGIN_SECS;
pub use auth::TokenStore;
pub use session::Session;
pub use session::SessionId;
pub use session::SessionStore;
