//! `fetch` transport.

use attendance_bridge::{AttendanceRequest, PluginResult, ScanError, Transport};
use gloo_net::http::Request;

/// [`Transport`] using the browser's `fetch` through gloo-net.
///
/// Relative URLs resolve against the page origin, as with any `fetch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl Transport for FetchTransport {
    async fn post_json(&self, url: &str, body: &AttendanceRequest) -> PluginResult<String> {
        let request = Request::post(url)
            .header("Content-Type", "application/json")
            .json(body)
            .map_err(|e| ScanError::Network(format!("Failed to build request: {}", e)))?;

        let response = request
            .send()
            .await
            .map_err(|e| ScanError::Network(format!("HTTP request failed: {}", e)))?;

        log::debug!("POST {} -> {}", url, response.status());

        response
            .text()
            .await
            .map_err(|e| ScanError::Network(format!("Failed to read response: {}", e)))
    }
}
