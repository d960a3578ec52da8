use super::Phase;

/// Best-effort notification sink for end-of-phase alerts.
///
/// The controller asks for at most one pending alert at a time; a new
/// `schedule` supersedes the previous one. Calls are fire-and-forget --
/// the controller never waits on delivery, and a slow or missing sink
/// degrades only the notification, never the countdown itself.
pub trait AlertPort {
    /// Request a notification after `duration_ms`, marking which phase ends.
    fn schedule(&mut self, phase: Phase, duration_ms: u64);

    /// Drop any pending request.
    fn cancel(&mut self);
}

/// No-op sink for tests and headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAlerts;

impl AlertPort for NullAlerts {
    fn schedule(&mut self, _phase: Phase, _duration_ms: u64) {}

    fn cancel(&mut self) {}
}
