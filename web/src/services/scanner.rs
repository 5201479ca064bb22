//! Wrapper for the `@capacitor-community/barcode-scanner` plugin.
//!
//! The plugin is looked up once: the instance registered on
//! `window.Capacitor.Plugins` when running inside the native shell, otherwise
//! the module is imported dynamically. The resulting [`CapacitorScanner`] is
//! then injected into the scan handler.

use attendance_bridge::{PermissionStatus, PluginResult, ScanError, ScanResult, Scanner};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::js_error_message;

#[wasm_bindgen(module = "/src/js/bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = "importBarcodeScanner")]
    fn import_barcode_scanner() -> js_sys::Promise;
}

#[wasm_bindgen]
extern "C" {
    /// The plugin object (`BarcodeScanner`).
    pub type BarcodeScannerPlugin;

    #[wasm_bindgen(method, catch, js_name = "checkPermission")]
    fn check_permission_js(this: &BarcodeScannerPlugin, options: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "startScan")]
    fn start_scan_js(this: &BarcodeScannerPlugin) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch, js_name = "stopScan")]
    fn stop_scan_js(this: &BarcodeScannerPlugin) -> Result<js_sys::Promise, JsValue>;
}

/// Where the plugin instance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginSource {
    /// `window.Capacitor.Plugins.BarcodeScanner`
    Global,
    /// Dynamic `import('@capacitor-community/barcode-scanner')`
    Imported,
}

#[derive(Serialize)]
struct PermissionOptions {
    force: bool,
}

/// [`Scanner`] driving the Capacitor camera plugin.
pub struct CapacitorScanner {
    plugin: BarcodeScannerPlugin,
    source: PluginSource,
}

impl CapacitorScanner {
    /// Locate the plugin.
    pub async fn acquire() -> PluginResult<Self> {
        if let Some(plugin) = global_plugin() {
            log::info!("📷 Using BarcodeScanner from Capacitor.Plugins");
            return Ok(Self {
                plugin,
                source: PluginSource::Global,
            });
        }

        log::info!("📷 Importing @capacitor-community/barcode-scanner...");
        let plugin = JsFuture::from(import_barcode_scanner())
            .await
            .map_err(plugin_error)?;
        if plugin.is_undefined() || plugin.is_null() {
            return Err(ScanError::Plugin("Barcode scanner plugin not available".to_string()));
        }

        Ok(Self {
            plugin: plugin.unchecked_into(),
            source: PluginSource::Imported,
        })
    }

    pub fn source(&self) -> PluginSource {
        self.source
    }
}

impl Scanner for CapacitorScanner {
    async fn check_permission(&self, force: bool) -> PluginResult<PermissionStatus> {
        let options = serde_wasm_bindgen::to_value(&PermissionOptions { force })
            .map_err(|e| ScanError::Plugin(e.to_string()))?;
        let promise = self.plugin.check_permission_js(&options).map_err(plugin_error)?;
        let status = JsFuture::from(promise).await.map_err(plugin_error)?;

        serde_wasm_bindgen::from_value(status)
            .map_err(|e| ScanError::Plugin(format!("Unexpected permission status: {}", e)))
    }

    async fn start_scan(&self) -> PluginResult<ScanResult> {
        let promise = self.plugin.start_scan_js().map_err(plugin_error)?;
        let result = JsFuture::from(promise).await.map_err(plugin_error)?;

        scan_result_from_js(result)
    }

    async fn stop_scan(&self) -> PluginResult<()> {
        let promise = self.plugin.stop_scan_js().map_err(plugin_error)?;
        JsFuture::from(promise).await.map_err(plugin_error)?;
        Ok(())
    }
}

/// `window.Capacitor.Plugins.BarcodeScanner`, if registered.
fn global_plugin() -> Option<BarcodeScannerPlugin> {
    let window = web_sys::window()?;
    let capacitor = get_defined(&window, "Capacitor")?;
    let plugins = get_defined(&capacitor, "Plugins")?;
    let scanner = get_defined(&plugins, "BarcodeScanner")?;
    Some(scanner.unchecked_into())
}

fn get_defined(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// A `null` or `undefined` result counts as a cancelled scan.
fn scan_result_from_js(value: JsValue) -> PluginResult<ScanResult> {
    serde_wasm_bindgen::from_value::<Option<ScanResult>>(value)
        .map(Option::unwrap_or_default)
        .map_err(|e| ScanError::Plugin(format!("Unexpected scan result: {}", e)))
}

fn plugin_error(e: JsValue) -> ScanError {
    ScanError::Plugin(js_error_message(&e))
}
