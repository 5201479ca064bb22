//! Native host implementations of the bridge seams.
//!
//! - [`storage`] - file-backed local storage
//! - [`environment`] - resolution environment for the CLI
//! - [`transport`] - `reqwest` HTTP transport
//! - [`scanner`] - keyboard-wedge and preset scanners
//! - [`notify`] - console notifications

pub mod environment;
pub mod notify;
pub mod scanner;
pub mod storage;
pub mod transport;

pub use environment::NativeEnvironment;
pub use notify::ConsoleNotifier;
pub use scanner::{FixedScanner, SelectedScanner, WedgeScanner};
pub use storage::FileStorage;
pub use transport::HttpTransport;
