//! Alert-box notifications.

use attendance_bridge::Notifier;

/// [`Notifier`] using `window.alert`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, message: &str) {
        match web_sys::window() {
            Some(window) => {
                if window.alert_with_message(message).is_err() {
                    log::warn!("alert() failed: {}", message);
                }
            }
            None => log::warn!("No window for alert: {}", message),
        }
    }
}
