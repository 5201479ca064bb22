//! # Attendance Bridge - glue between the attendance web pages and the mobile app
//!
//! Three independent pieces that ship with the mobile asset bundle:
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌──────────────────────────────┐
//! │ Asset copier │   │ Config resolver  │   │ Scan handler                 │
//! │ pages, CSS,  │   │ override ▸ query │──▶│ permission ▸ scan ▸ POST     │
//! │ JS ▸ www/    │   │ ▸ storage ▸ dflt │   │ /api/attendance/scan ▸ alert │
//! └──────────────┘   └──────────────────┘   └──────────────────────────────┘
//! ```
//!
//! The resolver produces an [`ApiBase`] once at startup; the scan handler
//! receives it along with its injected scanner, transport and notifier.
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`config`] - Constants and environment settings
//! - [`resolver`] - Base-URL resolution and `api(path)`
//! - [`scan`] - Scan flow, request model and plugin seams
//! - [`assets`] - Web asset copier (`native` feature)
//! - [`host`] - Native storage, transport, scanners (`native` feature)

// Core modules
pub mod config;
pub mod error;

// Server config
pub mod resolver;

// Scanning
pub mod scan;

// Native host
#[cfg(feature = "native")]
pub mod assets;
#[cfg(feature = "native")]
pub mod host;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{AssetError, PluginResult, ScanError, StorageError, StorageResult};

// =============================================================================
// Re-exports - Resolver
// =============================================================================

pub use resolver::{ApiBase, BaseUrlSource, Environment};

// =============================================================================
// Re-exports - Scan
// =============================================================================

pub use scan::{
    AttendanceRequest, Notifier, PermissionStatus, ScanHandler, ScanOutcome, ScanResult,
    ScanState, Scanner, Transport, response_message,
};

// =============================================================================
// Re-exports - Native
// =============================================================================

#[cfg(feature = "native")]
pub use assets::{copy_web_assets, AssetPlan, CopyReport};

#[cfg(feature = "native")]
pub use host::{
    ConsoleNotifier, FileStorage, FixedScanner, HttpTransport, NativeEnvironment,
    SelectedScanner, WedgeScanner,
};
