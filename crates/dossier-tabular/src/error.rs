//! Error types for the tabular parser

use thiserror::Error;

/// Errors that can occur while parsing a service record
#[derive(Error, Debug)]
pub enum TabularError {
    /// Document text is too short to be a service record
    #[error("Service record text too short: {0} chars")]
    TextTooShort(usize),

    /// No table rows matched the fixed layout
    ///
    /// Expected-but-uncommon: the caller falls back to the extraction
    /// service with a reliability warning.
    #[error("No service table rows found")]
    TableNotFound,
}
