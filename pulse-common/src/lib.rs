//! Common types and utilities shared across Pulse crates.
//!
//! This crate defines the collected-post data model, the run-level error taxonomy,
//! and the observability helpers used throughout the Pulse workspace. It is
//! intentionally lightweight so every crate can depend on it without dragging in
//! the HTTP or CSV stacks.
//!
//! # Overview
//!
//! - [`Record`]: one collected post, enriched in place by the pipeline stages
//! - [`SentimentLabel`]: the three-way label produced by the classifier
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`PulseError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use pulse_common::{PulseError, Record, SentimentLabel};
//! use time::macros::datetime;
//!
//! let mut record = Record::new("1", "Great shoes!", datetime!(2025-09-01 12:00 UTC), "42");
//! record.set_clean_text("great shoes".into())?;
//! record.set_sentiment(SentimentLabel::Positive)?;
//! assert_eq!(record.sentiment_label, Some(SentimentLabel::Positive));
//! # Ok::<(), PulseError>(())
//! ```
pub mod observability;
pub mod record;

pub use record::{EngagementCounts, Record, SentimentLabel};

use serde::Deserialize;

/// What the tabular writer does when a run collected nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyOutputPolicy {
    /// Create no file and warn.
    #[default]
    Skip,
    /// Write a file holding only the header row.
    HeaderOnly,
}

/// Error taxonomy for a single collection run.
///
/// Every variant is fatal for the run; the binary maps each one to a distinct
/// process exit code through [`PulseError::exit_code`].
#[derive(thiserror::Error, Debug)]
pub enum PulseError {
    /// A required credential is missing or the configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote source reported quota exhaustion (HTTP 429).
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Any other remote failure: bad query, rejected auth, malformed response.
    #[error("Remote API error: {0}")]
    RemoteApi(String),

    /// Catch-all for defects and I/O failures not covered above.
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl PulseError {
    /// Process exit code reported by the `pulse` binary for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            PulseError::Unexpected(_) => 1,
            PulseError::Configuration(_) => 2,
            PulseError::RateLimitExceeded(_) => 3,
            PulseError::RemoteApi(_) => 4,
        }
    }
}

impl From<std::io::Error> for PulseError {
    fn from(e: std::io::Error) -> Self {
        PulseError::Unexpected(anyhow::Error::new(e))
    }
}

/// Convenient alias for results that use [`PulseError`].
pub type Result<T> = std::result::Result<T, PulseError>;
