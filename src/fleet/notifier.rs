use crate::orbit::ElementKey;
use crate::{event, info};

/// Receiver of pass notification requests.
///
/// Pass prediction itself happens behind this seam, the registry only
/// decides which objects are monitored.
pub trait PassNotifier: Send + Sync {
    /// Starts announcing upcoming passes of `object`.
    fn notify_passes(&self, object: &ElementKey);
    /// Drops every pending pass timer of `object`.
    fn clear_timers(&self, object: &ElementKey);
}

/// Headless [`PassNotifier`] that only logs.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogNotifier;

impl PassNotifier for LogNotifier {
    fn notify_passes(&self, object: &ElementKey) {
        info!("Monitoring passes of {object}");
    }

    fn clear_timers(&self, object: &ElementKey) {
        event!("Clearing pass timers of {object}");
    }
}
