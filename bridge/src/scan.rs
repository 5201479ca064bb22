//! QR attendance scan flow.
//!
//! Drives one scan from a user action to the server's answer:
//!
//! ```text
//! Idle ─▶ PermissionRequested ─┬─▶ Denied            (terminal)
//!                              └─▶ Scanning ─▶ Completed (scanner stopped)
//! ```
//!
//! The camera plugin, the HTTP client and the user-facing notification are
//! injected through [`Scanner`], [`Transport`] and [`Notifier`], so the same
//! flow runs inside the mobile WebView and from the native CLI.

use std::cell::Cell;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{LEGACY_QR_PREFIX, SCAN_ENDPOINT};
use crate::error::{PluginResult, ScanError};
use crate::resolver::ApiBase;

/// Message shown when the camera permission is refused.
pub const PERMISSION_REQUIRED_MESSAGE: &str = "Camera permission is required for scanning";

// =============================================================================
// Plugin Types
// =============================================================================

/// Answer of the plugin's permission check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionStatus {
    #[serde(default)]
    pub granted: bool,
}

impl PermissionStatus {
    pub fn granted() -> Self {
        Self { granted: true }
    }

    pub fn denied() -> Self {
        Self { granted: false }
    }
}

/// Result of one scan session, as reported by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// False when the user cancelled or nothing was decoded.
    #[serde(default)]
    pub has_content: bool,
    /// Decoded barcode text.
    #[serde(default)]
    pub content: String,
}

impl ScanResult {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            has_content: true,
            content: content.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /api/attendance/scan`.
///
/// Serializes to a single-key object: `{"qr_data": ...}` for legacy student
/// codes, `{"qr_token": ...}` for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceRequest {
    /// Legacy payload (`STUDENT_<id>`).
    QrData(String),
    /// Signed attendance token.
    QrToken(String),
}

impl AttendanceRequest {
    /// Classify scanned content by its prefix.
    pub fn from_scan(content: impl Into<String>) -> Self {
        let content = content.into();
        if content.starts_with(LEGACY_QR_PREFIX) {
            AttendanceRequest::QrData(content)
        } else {
            AttendanceRequest::QrToken(content)
        }
    }

    /// The scanned text, whichever field it travels in.
    pub fn content(&self) -> &str {
        match self {
            AttendanceRequest::QrData(s) | AttendanceRequest::QrToken(s) => s,
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, AttendanceRequest::QrData(_))
    }
}

// =============================================================================
// Seams
// =============================================================================

/// Camera barcode-scanning capability.
#[allow(async_fn_in_trait)]
pub trait Scanner {
    /// Ask for camera permission; `force` prompts the user if undecided.
    async fn check_permission(&self, force: bool) -> PluginResult<PermissionStatus>;

    /// Open the camera and wait for a code or a cancellation.
    async fn start_scan(&self) -> PluginResult<ScanResult>;

    /// Close the scan session.
    async fn stop_scan(&self) -> PluginResult<()>;
}

/// JSON-over-HTTP client.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// POST `body` as `application/json` and return the raw response text.
    async fn post_json(&self, url: &str, body: &AttendanceRequest) -> PluginResult<String>;
}

/// User-visible notification (an alert box, a console line).
pub trait Notifier {
    fn notify(&self, message: &str);
}

// =============================================================================
// Flow
// =============================================================================

/// Where a scan run currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanState {
    #[default]
    Idle,
    PermissionRequested,
    Denied,
    Scanning,
    Completed,
}

/// Terminal result of a scan run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Camera permission refused; nothing was scanned or sent.
    PermissionDenied,
    /// The plugin returned without content.
    Cancelled,
    /// The code was sent and the server answered.
    Submitted { message: String },
    /// Plugin, network or response failure.
    Failed { error: String },
}

impl ScanOutcome {
    /// Text surfaced to the user, if any.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ScanOutcome::PermissionDenied => Some(PERMISSION_REQUIRED_MESSAGE.to_string()),
            ScanOutcome::Cancelled => None,
            ScanOutcome::Submitted { message } => Some(message.clone()),
            ScanOutcome::Failed { error } => Some(format!("Scan failed: {}", error)),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScanOutcome::Submitted { .. })
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanOutcome::PermissionDenied => f.write_str("permission denied"),
            ScanOutcome::Cancelled => f.write_str("cancelled"),
            ScanOutcome::Submitted { message } => write!(f, "submitted: {}", message),
            ScanOutcome::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}

/// One-shot scan driver, invoked once per user action.
pub struct ScanHandler<S, T, N> {
    scanner: S,
    transport: T,
    notifier: N,
    api: ApiBase,
    state: Cell<ScanState>,
}

impl<S: Scanner, T: Transport, N: Notifier> ScanHandler<S, T, N> {
    pub fn new(scanner: S, transport: T, notifier: N, api: ApiBase) -> Self {
        Self {
            scanner,
            transport,
            notifier,
            api,
            state: Cell::new(ScanState::Idle),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state.get()
    }

    pub fn scanner(&self) -> &S {
        &self.scanner
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Run the whole flow and notify the user of the outcome.
    ///
    /// Never fails: errors become [`ScanOutcome::Failed`].
    pub async fn run(&self) -> ScanOutcome {
        self.enter(ScanState::Idle);

        let outcome = match self.attempt().await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Scan error: {}", e);
                ScanOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        if let Some(message) = outcome.user_message() {
            self.notifier.notify(&message);
        }
        outcome
    }

    async fn attempt(&self) -> PluginResult<ScanOutcome> {
        self.enter(ScanState::PermissionRequested);
        let status = self.scanner.check_permission(true).await?;
        if !status.granted {
            self.enter(ScanState::Denied);
            log::warn!("Camera permission denied");
            return Ok(ScanOutcome::PermissionDenied);
        }

        self.enter(ScanState::Scanning);
        let outcome = match self.scanner.start_scan().await {
            Ok(result) => self.submit(result).await,
            Err(e) => Err(e),
        };

        if let Err(e) = self.scanner.stop_scan().await {
            log::warn!("Failed to stop scanner: {}", e);
        }
        self.enter(ScanState::Completed);

        outcome
    }

    async fn submit(&self, result: ScanResult) -> PluginResult<ScanOutcome> {
        if !result.has_content {
            log::info!("Scan finished without content");
            return Ok(ScanOutcome::Cancelled);
        }

        let request = AttendanceRequest::from_scan(result.content);
        let url = self.api.api(SCAN_ENDPOINT);
        log::info!(
            "Sending {} to {}",
            if request.is_legacy() { "legacy QR payload" } else { "QR token" },
            url
        );

        let body = self.transport.post_json(&url, &request).await?;
        let message = response_message(&body)?;
        Ok(ScanOutcome::Submitted { message })
    }

    fn enter(&self, state: ScanState) {
        log::debug!("Scan state: {:?} -> {:?}", self.state.get(), state);
        self.state.set(state);
    }
}

/// Pick the text to show for a server response.
///
/// A truthy `message` field wins; otherwise the whole response is shown as
/// compact JSON in the server's key order. Non-JSON and `null` bodies are
/// errors.
pub fn response_message(body: &str) -> Result<String, ScanError> {
    let data: Value = serde_json::from_str(body)?;
    if data.is_null() {
        return Err(ScanError::NullResponse);
    }

    let message = match data.get("message") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => number_text(n),
        Some(Value::Bool(true)) => Some("true".to_string()),
        Some(Value::Object(_)) => Some("[object Object]".to_string()),
        Some(Value::Array(items)) => Some(Value::Array(items.clone()).to_string()),
        _ => None,
    };

    Ok(message.unwrap_or_else(|| data.to_string()))
}

/// Non-zero numbers as a browser prints them (`1.0` shows as `1`).
fn number_text(n: &serde_json::Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    let v = n.as_f64()?;
    if v == 0.0 {
        None
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        Some(format!("{}", v as i64))
    } else {
        Some(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<String>>>;

    struct FakeScanner {
        permission: PluginResult<PermissionStatus>,
        result: RefCell<Option<PluginResult<ScanResult>>>,
        calls: CallLog,
    }

    impl FakeScanner {
        fn granted(result: PluginResult<ScanResult>, calls: &CallLog) -> Self {
            Self {
                permission: Ok(PermissionStatus::granted()),
                result: RefCell::new(Some(result)),
                calls: calls.clone(),
            }
        }
    }

    impl Scanner for FakeScanner {
        async fn check_permission(&self, force: bool) -> PluginResult<PermissionStatus> {
            self.calls.borrow_mut().push(format!("check_permission({})", force));
            match &self.permission {
                Ok(status) => Ok(*status),
                Err(e) => Err(ScanError::Plugin(e.to_string())),
            }
        }

        async fn start_scan(&self) -> PluginResult<ScanResult> {
            self.calls.borrow_mut().push("start_scan".into());
            self.result
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Ok(ScanResult::empty()))
        }

        async fn stop_scan(&self) -> PluginResult<()> {
            self.calls.borrow_mut().push("stop_scan".into());
            Ok(())
        }
    }

    struct FakeTransport {
        response: PluginResult<String>,
        calls: CallLog,
    }

    impl Transport for FakeTransport {
        async fn post_json(&self, url: &str, body: &AttendanceRequest) -> PluginResult<String> {
            let json = serde_json::to_string(body).unwrap();
            self.calls.borrow_mut().push(format!("POST {} {}", url, json));
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(ScanError::Network(e.to_string())),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    fn handler(
        scanner: FakeScanner,
        response: PluginResult<String>,
        calls: &CallLog,
    ) -> ScanHandler<FakeScanner, FakeTransport, RecordingNotifier> {
        let transport = FakeTransport {
            response,
            calls: calls.clone(),
        };
        ScanHandler::new(
            scanner,
            transport,
            RecordingNotifier::default(),
            ApiBase::new("http://localhost:5000/"),
        )
    }

    #[test]
    fn test_request_shape_follows_prefix() {
        let legacy = AttendanceRequest::from_scan("STUDENT_abc123");
        assert_eq!(
            serde_json::to_value(&legacy).unwrap(),
            serde_json::json!({"qr_data": "STUDENT_abc123"})
        );

        let token = AttendanceRequest::from_scan("tok-xyz");
        assert_eq!(
            serde_json::to_value(&token).unwrap(),
            serde_json::json!({"qr_token": "tok-xyz"})
        );

        // Prefix test is case sensitive
        assert!(!AttendanceRequest::from_scan("student_7").is_legacy());
    }

    #[test]
    fn test_scan_result_from_plugin_json() {
        let result: ScanResult =
            serde_json::from_str(r#"{"hasContent": true, "content": "tok", "format": "QR_CODE"}"#)
                .unwrap();
        assert_eq!(result, ScanResult::with_content("tok"));

        let cancelled: ScanResult = serde_json::from_str("{}").unwrap();
        assert!(!cancelled.has_content);

        let status: PermissionStatus =
            serde_json::from_str(r#"{"granted": false, "denied": true}"#).unwrap();
        assert!(!status.granted);
    }

    #[test]
    fn test_response_message_selection() {
        assert_eq!(
            response_message(r#"{"success": true, "message": "Attendance marked for Ana"}"#).unwrap(),
            "Attendance marked for Ana"
        );
        assert_eq!(
            response_message(r#"{"error": "Invalid QR code"}"#).unwrap(),
            r#"{"error":"Invalid QR code"}"#
        );
        assert_eq!(
            response_message(r#"{"message": ""}"#).unwrap(),
            r#"{"message":""}"#
        );
        assert!(response_message("<html>502 Bad Gateway</html>").is_err());
    }

    #[test]
    fn test_response_fallback_keeps_server_key_order() {
        assert_eq!(
            response_message(r#"{"success": false, "error": "x"}"#).unwrap(),
            r#"{"success":false,"error":"x"}"#
        );
        assert_eq!(
            response_message(r#"{"message": null, "status": "duplicate", "code": 409}"#).unwrap(),
            r#"{"message":null,"status":"duplicate","code":409}"#
        );
    }

    #[test]
    fn test_response_message_odd_shapes() {
        assert!(matches!(response_message("null"), Err(ScanError::NullResponse)));
        assert_eq!(response_message(r#"{"message": 1.0}"#).unwrap(), "1");
        assert_eq!(response_message(r#"{"message": 2.5}"#).unwrap(), "2.5");
        assert_eq!(response_message(r#"{"message": 0}"#).unwrap(), r#"{"message":0}"#);
        assert_eq!(
            response_message(r#"{"message": {"text": "hi"}}"#).unwrap(),
            "[object Object]"
        );
    }

    #[tokio::test]
    async fn test_null_response_is_generic_failure() {
        let calls = CallLog::default();
        let scanner = FakeScanner::granted(Ok(ScanResult::with_content("tok")), &calls);
        let handler = handler(scanner, Ok("null".into()), &calls);

        let outcome = handler.run().await;

        assert!(matches!(outcome, ScanOutcome::Failed { .. }));
        assert_eq!(calls.borrow().last().map(String::as_str), Some("stop_scan"));
        assert_eq!(
            *handler.notifier().messages.borrow(),
            vec!["Scan failed: Empty response from server".to_string()]
        );
    }

    #[tokio::test]
    async fn test_token_scan_posts_and_surfaces_message() {
        let calls = CallLog::default();
        let scanner = FakeScanner::granted(Ok(ScanResult::with_content("tok-xyz")), &calls);
        let handler = handler(scanner, Ok(r#"{"message":"Marked present"}"#.into()), &calls);

        let outcome = handler.run().await;

        assert_eq!(
            outcome,
            ScanOutcome::Submitted {
                message: "Marked present".into()
            }
        );
        assert_eq!(
            *calls.borrow(),
            vec![
                "check_permission(true)".to_string(),
                "start_scan".to_string(),
                r#"POST http://localhost:5000/api/attendance/scan {"qr_token":"tok-xyz"}"#.to_string(),
                "stop_scan".to_string(),
            ]
        );
        assert_eq!(*handler.notifier().messages.borrow(), vec!["Marked present".to_string()]);
        assert_eq!(handler.state(), ScanState::Completed);
    }

    #[tokio::test]
    async fn test_permission_denied_never_touches_network() {
        let calls = CallLog::default();
        let scanner = FakeScanner {
            permission: Ok(PermissionStatus::denied()),
            result: RefCell::new(Some(Ok(ScanResult::with_content("STUDENT_1")))),
            calls: calls.clone(),
        };
        let handler = handler(scanner, Ok("{}".into()), &calls);

        let outcome = handler.run().await;

        assert_eq!(outcome, ScanOutcome::PermissionDenied);
        assert_eq!(*calls.borrow(), vec!["check_permission(true)".to_string()]);
        assert_eq!(
            *handler.notifier().messages.borrow(),
            vec![PERMISSION_REQUIRED_MESSAGE.to_string()]
        );
        assert_eq!(handler.state(), ScanState::Denied);
    }

    #[tokio::test]
    async fn test_cancelled_scan_stops_without_posting() {
        let calls = CallLog::default();
        let scanner = FakeScanner::granted(Ok(ScanResult::empty()), &calls);
        let handler = handler(scanner, Ok("{}".into()), &calls);

        assert_eq!(handler.run().await, ScanOutcome::Cancelled);
        assert!(!calls.borrow().iter().any(|c| c.starts_with("POST")));
        assert_eq!(calls.borrow().last().map(String::as_str), Some("stop_scan"));
        assert!(handler.notifier().messages.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_still_stops_scanner() {
        let calls = CallLog::default();
        let scanner = FakeScanner::granted(Ok(ScanResult::with_content("STUDENT_42")), &calls);
        let handler = handler(scanner, Err(ScanError::Network("connection refused".into())), &calls);

        let outcome = handler.run().await;

        assert_eq!(
            outcome,
            ScanOutcome::Failed {
                error: "connection refused".into()
            }
        );
        assert_eq!(calls.borrow().last().map(String::as_str), Some("stop_scan"));
        assert_eq!(
            *handler.notifier().messages.borrow(),
            vec!["Scan failed: connection refused".to_string()]
        );
    }

    #[tokio::test]
    async fn test_non_json_response_is_generic_failure() {
        let calls = CallLog::default();
        let scanner = FakeScanner::granted(Ok(ScanResult::with_content("tok")), &calls);
        let handler = handler(scanner, Ok("Internal Server Error".into()), &calls);

        let outcome = handler.run().await;

        assert!(matches!(outcome, ScanOutcome::Failed { .. }));
        let messages = handler.notifier().messages.borrow();
        assert!(messages[0].starts_with("Scan failed: Invalid JSON response"));
    }

    #[tokio::test]
    async fn test_plugin_failure_on_start_releases_session() {
        let calls = CallLog::default();
        let scanner = FakeScanner::granted(Err(ScanError::Plugin("camera busy".into())), &calls);
        let handler = handler(scanner, Ok("{}".into()), &calls);

        let outcome = handler.run().await;

        assert_eq!(
            outcome,
            ScanOutcome::Failed {
                error: "camera busy".into()
            }
        );
        assert_eq!(
            *calls.borrow(),
            vec![
                "check_permission(true)".to_string(),
                "start_scan".to_string(),
                "stop_scan".to_string(),
            ]
        );
    }
}
