use chrono::{DateTime, Utc};

/// Time source for session drivers.
///
/// The controller itself never reads ambient time -- every operation takes
/// `now` explicitly -- so only the driver needs a clock, and tests can step
/// one by hand.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
