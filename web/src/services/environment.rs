//! Browser resolution environment.
//!
//! Reads the server override, query string and protocol from the page and
//! the stored server URL from `localStorage`.

use attendance_bridge::{Environment, StorageError, StorageResult};
use wasm_bindgen::prelude::*;

use super::js_error_message;

#[wasm_bindgen(module = "/src/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = "serverUrlOverride")]
    fn server_url_override_js() -> Option<String>;
}

/// [`Environment`] backed by `window`.
pub struct BrowserEnvironment {
    window: web_sys::Window,
}

impl BrowserEnvironment {
    /// `None` outside a browsing context (e.g. in a worker).
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl Environment for BrowserEnvironment {
    fn server_url_override(&self) -> Option<String> {
        server_url_override_js()
    }

    fn query_string(&self) -> Option<String> {
        self.window.location().search().ok()
    }

    fn protocol(&self) -> Option<String> {
        self.window.location().protocol().ok()
    }

    fn stored_item(&self, key: &str) -> StorageResult<Option<String>> {
        // Both calls throw when storage is disabled (private mode, sandboxed frames)
        let storage = self
            .window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(js_error_message(&e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;

        storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(js_error_message(&e)))
    }
}
