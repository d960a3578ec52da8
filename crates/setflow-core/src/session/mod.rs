mod alert;
mod clock;
mod controller;

pub use alert::{AlertPort, NullAlerts};
pub use clock::{Clock, SystemClock};
pub use controller::{Phase, RunMode, SessionController};
