//! Error types for the attendance bridge.
//!
//! One enum per concern, mirroring the three informal error kinds of the
//! mobile bundle:
//!
//! - [`AssetError`] - filesystem failures while bundling web assets (fatal)
//! - [`StorageError`] - persisted settings unavailable (swallowed by the resolver)
//! - [`ScanError`] - plugin, network or response failures during a scan
//!
//! Permission denial is not an error: it is a terminal
//! [`ScanOutcome`](crate::scan::ScanOutcome) of its own.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Asset Copy Errors
// =============================================================================

/// Errors while mirroring web assets into the mobile bundle.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Failed to create a destination directory.
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to walk a source tree.
    #[error("Failed to read {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy a file.
    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors from the persisted key/value store (local storage).
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is not available in this host.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// IO error.
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document is not a JSON object of strings.
    #[error("Storage JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Scan Errors
// =============================================================================

/// Errors during a scan run.
///
/// All of them end the run on the generic failure path; the display string
/// is what the user sees after `Scan failed: `.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scanning plugin failed or could not be loaded.
    #[error("{0}")]
    Plugin(String),

    /// The HTTP request could not be built or sent.
    #[error("{0}")]
    Network(String),

    /// The server response is not JSON.
    #[error("Invalid JSON response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    /// The server answered with a JSON `null`.
    #[error("Empty response from server")]
    NullResponse,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for asset copy operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for scanner plugin and transport operations.
pub type PluginResult<T> = Result<T, ScanError>;
