//! Spotify Album Cover Downloader Library
//!
//! This library backs a small web application that signs a user in with
//! Spotify, walks their saved album library, downloads every album's cover
//! image and offers the images for download, one by one or as a zip archive.
//!
//! # Modules
//!
//! - `api` - HTTP handlers and the shared application state
//! - `config` - Configuration from flags, environment variables and `.env` files
//! - `error` - Error type of the HTTP layer
//! - `management` - Sessions, token refresh and cover storage on disk
//! - `server` - Router construction and the server loop
//! - `spotify` - Spotify OAuth2 and Web API client
//! - `telemetry` - `tracing` subscriber setup
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use coverfetch::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> coverfetch::Res<()> {
//!     config::load_env().await?;
//!     // Parse a config::Config, then:
//!     // server::start_api_server(config).await
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod telemetry;
pub mod types;
pub mod utils;

/// A convenient Result type alias for startup code that may fail.
///
/// Request handling uses [`error::AppError`]; this alias covers the rest,
/// where any error just has to be reported before the process exits. The
/// boxed error keeps `Send + Sync` so it can cross `.await` points.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use coverfetch::Res;
///
/// async fn bind_address(raw: &str) -> Res<std::net::SocketAddr> {
///     Ok(raw.parse()?)
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Writes one line to stdout with a blue "o" indicator. Used for startup
/// notes such as which `.env` file was loaded; request-time events go
/// through `tracing` instead.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Loaded environment from {}", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Arguments
///
/// Same as `println!`.
///
/// # Example
///
/// ```
/// success!("Serving on http://{}", address);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for startup failures; request handlers report errors through
/// [`error::AppError`] instead.
///
/// # Arguments
///
/// Same as `println!`.
///
/// # Example
///
/// ```
/// error!("Server stopped: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Unlike [`error!`] the program keeps running.
///
/// # Arguments
///
/// Same as `println!`.
///
/// # Example
///
/// ```
/// warning!("No .env file found, using the process environment only");
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
