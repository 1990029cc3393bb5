//! dbGaP Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared error handling and logging for the dbGaP ingest workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`DbgapError`] and the [`Result`] alias used by every
//!   library operation
//! - **Logging**: [`logging::LogConfig`] and [`logging::init_logging`]
//!
//! # Example
//!
//! ```no_run
//! use dbgap_common::{DbgapError, Result};
//!
//! fn title(entrez: Option<&str>) -> Result<&str> {
//!     entrez.ok_or_else(|| DbgapError::missing_field("Configuration.StudyNameEntrez"))
//! }
//! ```

pub mod error;
pub mod logging;

// Re-export commonly used types
pub use error::{DbgapError, Result};
