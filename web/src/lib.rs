//! Attendance Web - WebAssembly bindings for the mobile pages
//!
//! Exposes the server configuration and the native QR scan to the pages
//! bundled in `mobile/www`:
//!
//! ```js
//! import init, { ServerConfig, startNativeScan } from './pkg/attendance_web.js';
//!
//! await init();
//! const config = ServerConfig.resolve();
//! fetch(config.api('/api/students'));
//! scanButton.onclick = () => config.startNativeScan();
//! ```
//!
//! # Modules
//!
//! - [`services`] - Browser environment, Capacitor scanner, fetch, alerts

use std::cell::OnceCell;

use attendance_bridge::{ApiBase, Notifier, ScanHandler, ScanOutcome};
use wasm_bindgen::prelude::*;

pub mod services;

pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - runs when the module is instantiated.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("📱 Attendance web bindings loaded");

    // Fix the backend for the lifetime of the page
    page_base();
}

thread_local! {
    static PAGE_BASE: OnceCell<ApiBase> = const { OnceCell::new() };
}

/// Backend of the current page, resolved on first use and never again.
fn page_base() -> ApiBase {
    cached_base(resolve_page_base)
}

fn cached_base(resolve: impl FnOnce() -> ApiBase) -> ApiBase {
    PAGE_BASE.with(|cell| cell.get_or_init(resolve).clone())
}

/// Global override, `?server=`, stored value or default for `file:` pages.
fn resolve_page_base() -> ApiBase {
    match BrowserEnvironment::new() {
        Some(env) => {
            let (base, source) = ApiBase::resolve_traced(&env);
            log::info!("🔗 Server base URL: '{}' ({})", base, source);
            base
        }
        None => ApiBase::relative(),
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Backend location for the current page.
#[wasm_bindgen]
pub struct ServerConfig {
    base: ApiBase,
}

#[wasm_bindgen]
impl ServerConfig {
    /// The backend resolved when the module started. Later changes to the
    /// query string or stored value do not affect it.
    pub fn resolve() -> ServerConfig {
        ServerConfig { base: page_base() }
    }

    /// Resolved base URL; empty means same origin.
    #[wasm_bindgen(getter, js_name = "baseUrl")]
    pub fn base_url(&self) -> String {
        self.base.to_string()
    }

    /// URL for an API path.
    pub fn api(&self, path: &str) -> String {
        self.base.api(path)
    }

    /// Scan one QR code and report it to the attendance endpoint.
    ///
    /// Resolves to a short description of the outcome.
    #[wasm_bindgen(js_name = "startNativeScan")]
    pub fn start_native_scan(&self) -> js_sys::Promise {
        let base = self.base.clone();
        wasm_bindgen_futures::future_to_promise(async move {
            let outcome = run_scan(base).await;
            Ok(JsValue::from_str(&outcome.to_string()))
        })
    }
}

/// Page-level shortcut: scan against the page's backend.
#[wasm_bindgen(js_name = "startNativeScan")]
pub fn start_native_scan() -> js_sys::Promise {
    ServerConfig::resolve().start_native_scan()
}

async fn run_scan(base: ApiBase) -> ScanOutcome {
    let scanner = match CapacitorScanner::acquire().await {
        Ok(scanner) => scanner,
        Err(e) => {
            log::error!("Scan error: {}", e);
            let outcome = ScanOutcome::Failed {
                error: e.to_string(),
            };
            if let Some(message) = outcome.user_message() {
                AlertNotifier.notify(&message);
            }
            return outcome;
        }
    };
    log::debug!("Scanner plugin source: {:?}", scanner.source());

    ScanHandler::new(scanner, FetchTransport, AlertNotifier, base)
        .run()
        .await
}
