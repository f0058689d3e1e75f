//! mNAV Common - Shared ambient concerns for the mNAV dashboard.
//!
//! - [`config`]: `~/.mnav/config.json` with environment overrides
//! - [`validation`]: sanity checks run before the config is used
//! - [`error`]: the error type shared by both crates
//! - [`logging`]: `tracing` subscriber setup (pretty or JSON)

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::{Config, DashboardConfig, MnavBands, ObservabilityConfig};
pub use error::{Error, Result, ResultExt};
pub use validation::{Validate, ValidationError, ValidationResult};

/// Common imports for binaries and tests.
pub mod prelude {
    pub use crate::config::{Config, MnavBands};
    pub use crate::error::{Error, Result, ResultExt};
    pub use crate::logging::init_logging;
    pub use crate::validation::{Validate, ValidationError};
}
