//! Dewey Library Curator
//!
//! This library reads the tracks a user saved on Spotify, counts how often each
//! artist and album shows up, and adds the ones above user-chosen thresholds to
//! the user's library (following artists, saving albums).
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Interactive driver sequencing a curation run
//! - `config` - Credentials file loading and endpoint settings
//! - `curation` - Saved-track fetching, tallying and library updates
//! - `error` - Error types for every layer
//! - `management` - Token cache management
//! - `prompt` - Parsing and reading of interactive answers
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API session and authorization flow
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use dewey::{config, curation, spotify};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = config::load("dewey.toml")?;
//!     let mut session = spotify::auth::authorize(&config.credentials).await?;
//!     let tracks = curation::fetch_all_saved_tracks(&mut session, &Default::default()).await?;
//!     let selection = curation::aggregate(&tracks, 3, 5);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod curation;
pub mod error;
pub mod management;
pub mod prompt;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Used for narration of each step of a run: thresholds, account lookup,
/// fetch progress and the calls being made.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Looking up your account...");
/// info!("Found {} saved tracks", count);
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
/// Marks the end of a step that went through, such as a completed fetch or
/// a finished library update.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("OK, I fetched {} tracks.", tracks.len());
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
/// Terminates the process with exit code 1 right after printing. Only the
/// interactive driver uses it, for conditions that end a run.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// Library functions return errors instead; code after this macro never runs.
///
/// # Example
///
/// ```
/// error!("Config file missing required param(s): {}", fields);
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
/// For conditions a run recovers from, like a retried page or a library
/// that shrank while it was being read.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Request failed. Waiting {} seconds before retrying...", 3);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
