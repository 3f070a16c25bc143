//! HealthPlanet measurement fetcher library
//!
//! Logs into HealthPlanet through its HTML login and consent pages, trades
//! the resulting authorization code for an access token and downloads
//! body-composition measurements. The series can be printed by the CLI or
//! served as JSON by a small local HTTP endpoint.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the local endpoint
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Failure taxonomy of the fetch pipeline
//! - `healthplanet` - Scripted login, token exchange and innerscan client
//! - `server` - Local HTTP server wiring
//! - `types` - Data structures and type definitions
//! - `utils` - Console helpers
//!
//! # Example
//!
//! ```
//! use hpscan::{config, healthplanet, types::InnerscanQuery};
//!
//! #[tokio::main]
//! async fn main() -> hpscan::Res<()> {
//!     config::load_env().await?;
//!     let credentials = config::credentials()?;
//!     let settings = healthplanet::SessionSettings::from_env()?;
//!     let scale = healthplanet::fetch_with_fresh_session(
//!         &settings,
//!         &credentials,
//!         &InnerscanQuery::default(),
//!     )
//!     .await?;
//!     println!("{} measurements", scale.records.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod healthplanet;
pub mod server;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the outer edges of the crate (server startup, examples) where the
/// concrete error type does not matter. The fetch pipeline itself returns
/// [`error::HealthPlanetError`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

static QUIET: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Silences `info!`, `success!` and `warning!` for the rest of the process.
///
/// `hpscan fetch --json` turns this on so stdout carries nothing but the JSON
/// document. `error!` always prints.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, std::sync::atomic::Ordering::Relaxed);
}

/// Whether console progress messages are currently suppressed.
pub fn is_quiet() -> bool {
    QUIET.load(std::sync::atomic::Ordering::Relaxed)
}

/// Prints an informational message with a blue bullet point unless
/// [`set_quiet`] is on.
///
/// ```
/// info!("Serving measurements on http://{}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    if !$crate::is_quiet() {
      println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
    }
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    if !$crate::is_quiet() {
      println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
    }
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1, so it is only used by the CLI
/// layer for failures that end the command. In quiet mode the message goes
/// to stderr instead of being dropped.
///
/// ```
/// error!("Could not authenticate with HealthPlanet. Err: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    let line = format!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    if $crate::is_quiet() {
      eprintln!("{}", line);
    } else {
      println!("{}", line);
    }
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    if !$crate::is_quiet() {
      println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
    }
  })
}
