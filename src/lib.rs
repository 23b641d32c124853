//! Release Broadcast Library
//!
//! This library tracks music releases for a curated list of artists, keeps an
//! append-only appearance history per release and turns newly found releases
//! into announcements for Bluesky and Telegram.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `lastfm` - Last.fm client used to enrich releases with popularity and tags
//! - `management` - Artist list and release history persistence
//! - `release` - Release identity, deduplication, reconciliation and post composition
//! - `social` - Bluesky and Telegram publishing clients
//! - `spotify` - Spotify Web API client used as release source
//! - `text` - Grapheme-aware text length and segmentation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use relcast::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> relcast::Res<()> {
//!     config::load_env().await?;
//!     // Use CLI functions...
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod lastfm;
pub mod management;
pub mod release;
pub mod social;
pub mod spotify;
pub mod text;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the orchestration layer where errors of different collaborators
/// meet. Domain modules return their own error enums which convert into the
/// boxed error through `?`.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Found {} releases", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for batch-level failures such as missing credentials. Per
/// artist and per release failures are reported with [`warning!`] instead so
/// the run carries on.
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
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
