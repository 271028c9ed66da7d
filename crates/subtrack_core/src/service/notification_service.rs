//! Test alert trigger.
//!
//! Independent of the record store. Scheduling is fire-and-forget: failures
//! are logged and never reach the caller's UI.

use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const TEST_ALERT_DELAY: Duration = Duration::from_secs(5);

/// One local alert to schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestAlert {
    pub title: String,
    pub body: String,
    /// Delay between scheduling and delivery.
    pub delay: Duration,
}

impl Default for TestAlert {
    fn default() -> Self {
        Self {
            title: "Subscription reminder".to_string(),
            body: "This is a test notification.".to_string(),
            delay: TEST_ALERT_DELAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    PermissionDenied,
    Backend(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "notification permission denied"),
            Self::Backend(message) => write!(f, "notification backend failed: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// Local notification backend.
pub trait Notifier {
    fn schedule(&self, alert: &TestAlert) -> Result<(), NotifyError>;
}

/// Notifier for hosts without a notification center: the alert becomes a
/// log event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn schedule(&self, alert: &TestAlert) -> Result<(), NotifyError> {
        info!(
            "event=notification_delivered module=notify status=ok delay_ms={} title={:?} body={:?}",
            alert.delay.as_millis(),
            alert.title,
            alert.body
        );
        Ok(())
    }
}

/// Schedules the default test alert.
///
/// Returns whether scheduling succeeded; failures are only logged.
pub fn fire_test_alert(notifier: &dyn Notifier) -> bool {
    let alert = TestAlert::default();
    match notifier.schedule(&alert) {
        Ok(()) => {
            info!(
                "event=test_alert module=notify status=ok delay_ms={}",
                alert.delay.as_millis()
            );
            true
        }
        Err(err) => {
            error!("event=test_alert module=notify status=error error={err}");
            false
        }
    }
}
