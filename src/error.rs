// ============================================================================
// ERRORS
// ============================================================================
//
// Error types for the gauge.
//
// Every failure is a value-domain violation raised at the call that caused
// it. Values that are merely too large are clamped instead of rejected.

use thiserror::Error;

/// Errors raised by gauge setters and construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GaugeError {
    /// A configuration value or gauge value is out of its allowed domain
    #[error("invalid value {value} for {field}")]
    InvalidConfiguration {
        /// Name of the rejected setting.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A colored range whose begin is not below its end
    #[error("incorrect number range specified: begin {begin} is not below end {end}")]
    InvalidRange {
        /// Lower bound as passed by the caller.
        begin: f64,
        /// Upper bound as passed by the caller.
        end: f64,
    },

    /// Font bytes could not be parsed
    #[error("font data could not be parsed")]
    InvalidFont,
}

impl GaugeError {
    pub(crate) fn config(field: &'static str, value: f64) -> Self {
        Self::InvalidConfiguration { field, value }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GaugeError>;
