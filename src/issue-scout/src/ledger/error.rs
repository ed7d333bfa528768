//! Ledger error types.

use thiserror::Error;

/// Errors raised when the persistent ledger cannot be read or written.
///
/// These are fatal to a run: continuing without the ledger would lose
/// deduplication state.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Failed to read the ledger file.
    #[error("Failed to read ledger '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Ledger file contents are not a valid snapshot.
    #[error("Failed to parse ledger '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Ledger file uses a snapshot version this build does not understand.
    #[error("Unsupported ledger version {version} in '{path}'")]
    UnsupportedVersion { path: String, version: u32 },

    /// Failed to serialize the snapshot.
    #[error("Failed to encode ledger '{path}': {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the ledger file.
    #[error("Failed to write ledger '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
