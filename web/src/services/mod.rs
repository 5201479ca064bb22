//! Browser implementations of the bridge seams.
//!
//! # Services
//!
//! - [`environment`] - server settings from `window`, `location`, `localStorage`
//! - [`scanner`] - Capacitor barcode-scanner plugin
//! - [`transport`] - `fetch` via gloo-net
//! - [`notify`] - `alert()` notifications
//!
//! # JavaScript Bindings
//!
//! Lookups that only JS can express live in `src/js/bridge.js`.

pub mod environment;
pub mod notify;
pub mod scanner;
pub mod transport;

pub use environment::BrowserEnvironment;
pub use notify::AlertNotifier;
pub use scanner::{CapacitorScanner, PluginSource};
pub use transport::FetchTransport;

use wasm_bindgen::JsValue;

/// Best-effort text of a thrown JS value.
pub(crate) fn js_error_message(e: &JsValue) -> String {
    js_sys::Reflect::get(e, &JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| e.as_string())
        .unwrap_or_else(|| "Unknown JS error".to_string())
}
