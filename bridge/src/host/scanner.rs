//! Native scanners.
//!
//! On a desktop the camera plugin does not exist; USB and Bluetooth barcode
//! readers act as keyboards ("keyboard wedge") and type the decoded text
//! followed by Enter. [`WedgeScanner`] reads that line, [`FixedScanner`]
//! replays content given up front, and [`SelectedScanner`] picks one at
//! startup.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use crate::error::{PluginResult, ScanError};
use crate::scan::{PermissionStatus, ScanResult, Scanner};

/// Reads one scanned code per session from a line-oriented input.
///
/// End of input or a blank line counts as a cancelled scan.
pub struct WedgeScanner<R> {
    reader: Mutex<R>,
}

impl WedgeScanner<BufReader<Stdin>> {
    /// Scanner reading from standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> WedgeScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Mutex::new(reader),
        }
    }
}

impl<R: AsyncBufRead + Unpin> Scanner for WedgeScanner<R> {
    async fn check_permission(&self, _force: bool) -> PluginResult<PermissionStatus> {
        // No camera involved
        Ok(PermissionStatus::granted())
    }

    async fn start_scan(&self) -> PluginResult<ScanResult> {
        let mut reader = self.reader.lock().await;
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .await
            .map_err(|e| ScanError::Plugin(format!("Failed to read scanner input: {}", e)))?;

        let content = line.trim();
        if content.is_empty() {
            Ok(ScanResult::empty())
        } else {
            Ok(ScanResult::with_content(content))
        }
    }

    async fn stop_scan(&self) -> PluginResult<()> {
        Ok(())
    }
}

/// Returns preset content, once per session.
#[derive(Debug, Clone)]
pub struct FixedScanner {
    content: String,
    granted: bool,
}

impl FixedScanner {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            granted: true,
        }
    }

    /// Same scanner, but with camera permission refused.
    pub fn denied(mut self) -> Self {
        self.granted = false;
        self
    }
}

impl Scanner for FixedScanner {
    async fn check_permission(&self, _force: bool) -> PluginResult<PermissionStatus> {
        Ok(PermissionStatus {
            granted: self.granted,
        })
    }

    async fn start_scan(&self) -> PluginResult<ScanResult> {
        if self.content.trim().is_empty() {
            Ok(ScanResult::empty())
        } else {
            Ok(ScanResult::with_content(self.content.clone()))
        }
    }

    async fn stop_scan(&self) -> PluginResult<()> {
        Ok(())
    }
}

/// Scanner chosen once at startup and injected into the scan handler.
pub enum SelectedScanner {
    Fixed(FixedScanner),
    Wedge(WedgeScanner<BufReader<Stdin>>),
}

impl SelectedScanner {
    /// Preset content wins; otherwise read from the keyboard wedge on stdin.
    pub fn select(content: Option<String>) -> Self {
        match content {
            Some(content) => SelectedScanner::Fixed(FixedScanner::new(content)),
            None => SelectedScanner::Wedge(WedgeScanner::stdin()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SelectedScanner::Fixed(_) => "preset content",
            SelectedScanner::Wedge(_) => "keyboard wedge (stdin)",
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, SelectedScanner::Wedge(_))
    }
}

impl Scanner for SelectedScanner {
    async fn check_permission(&self, force: bool) -> PluginResult<PermissionStatus> {
        match self {
            SelectedScanner::Fixed(s) => s.check_permission(force).await,
            SelectedScanner::Wedge(s) => s.check_permission(force).await,
        }
    }

    async fn start_scan(&self) -> PluginResult<ScanResult> {
        match self {
            SelectedScanner::Fixed(s) => s.start_scan().await,
            SelectedScanner::Wedge(s) => s.start_scan().await,
        }
    }

    async fn stop_scan(&self) -> PluginResult<()> {
        match self {
            SelectedScanner::Fixed(s) => s.stop_scan().await,
            SelectedScanner::Wedge(s) => s.stop_scan().await,
        }
    }
}
