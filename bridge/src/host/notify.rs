//! Console notifications.

use crate::scan::Notifier;

/// Prints notifications on stdout, where the WebView would show an alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        println!("📣 {}", message);
    }
}
