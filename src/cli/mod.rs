//! # CLI Module
//!
//! User-facing commands of hpscan.
//!
//! - [`fetch`] - runs one HealthPlanet fetch and prints the series as a table
//!   or as JSON
//! - [`serve`] - starts the local endpoint that runs a fresh fetch per request
//!
//! Both commands read credentials from the environment (see
//! [`crate::config`]) and end the process through the `error!` macro when a
//! fetch or the configuration fails, naming whether authentication, data
//! parsing or the network was at fault.
//!
//! ```bash
//! hpscan fetch                      # weight, measurement dates
//! hpscan fetch --tag 6022 --json    # body fat as JSON
//! hpscan serve --addr 0.0.0.0:8000
//! ```

mod fetch;
mod serve;

pub use fetch::fetch;
pub use serve::serve;
