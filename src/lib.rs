//! Spotify Top Charts Service Library
//!
//! This library implements a small web service that signs a user in to
//! Spotify through the OAuth 2.0 authorization-code flow and proxies a
//! handful of read-only Web API endpoints for a browser frontend. On top of
//! the raw top tracks and top artists it derives two facets: the albums the
//! user plays most and the genres their favourite artists share.
//!
//! # Modules
//!
//! - `analysis` - Ranking of top albums and top genres, fail-soft hydration
//! - `api` - HTTP handlers for the login flow and the proxied endpoints
//! - `config` - Configuration management and environment variables
//! - `management` - Token store and the authorization flow controller
//! - `server` - Router assembly and the HTTP server
//! - `spotify` - Spotify Web API client implementation
//! - `state` - Shared state injected into every handler
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spotcharts::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> spotcharts::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     server::start_api_server(settings, false).await
//! }
//! ```

pub mod analysis;
pub mod api;
pub mod config;
pub mod management;
pub mod server;
pub mod spotify;
pub mod state;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by startup code where any error is fatal. Request handling uses the
/// typed errors of [`api::ApiError`], [`management::AuthError`] and
/// [`spotify::SpotifyError`] instead.
///
/// # Example
///
/// ```
/// use spotcharts::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Server is listening on port {}", port);
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
/// # Example
///
/// ```
/// success!("Authorization completed");
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
/// Reserved for fatal startup conditions such as missing credentials or a
/// port that cannot be bound. Request handlers never call it.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems: a failed upstream request, a dropped
/// aggregation item, a rejected callback.
///
/// # Example
///
/// ```
/// warning!("Upstream request failed: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
