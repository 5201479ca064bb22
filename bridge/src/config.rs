//! Application configuration.
//!
//! Centralized constants shared by the native CLI and the WebAssembly
//! bindings. Runtime values (override URL, storage directory) come from the
//! host: window globals in the browser, env vars / `.env` for the CLI.

/// Backend used when a page is opened from the filesystem and nothing is stored.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Name of the global override variable and of the persisted storage key.
pub const SERVER_URL_KEY: &str = "SERVER_URL";

/// Query-string parameter naming the backend.
pub const SERVER_QUERY_PARAM: &str = "server";

/// Page protocol of documents loaded from the local filesystem.
pub const FILE_PROTOCOL: &str = "file:";

/// Attendance endpoint receiving scanned codes.
pub const SCAN_ENDPOINT: &str = "/api/attendance/scan";

/// Scanned payloads starting with this prefix are legacy student codes.
pub const LEGACY_QR_PREFIX: &str = "STUDENT_";

/// Directory holding the native local-storage file (relative to current dir).
pub const DEFAULT_STORAGE_DIR: &str = ".attendance";

/// Mobile asset folder, relative to the project root.
pub const MOBILE_WWW_DIR: &str = "mobile/www";
