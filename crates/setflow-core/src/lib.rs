//! # Setflow Core Library
//!
//! Core business logic for the Setflow workout timer. All operations are
//! available through a standalone CLI binary; any GUI is a thin layer over
//! this same library.
//!
//! ## Architecture
//!
//! - **Session Controller**: A wall-clock-based state machine that requires
//!   the caller to periodically invoke `tick(now)` for progress updates
//! - **Routine**: Ordered exercise list, JSON round-trippable, edited only
//!   before a session starts
//! - **Store**: JSON-file routine persistence and TOML-based configuration
//! - **Ports**: Alert scheduling and time injected behind small traits
//!
//! ## Key Components
//!
//! - [`SessionController`]: The phase state machine
//! - [`Routine`] / [`ExerciseSpec`]: Session input
//! - [`RoutineStore`] / [`Config`]: Persistence glue
//! - [`AlertPort`] / [`Clock`]: Capability ports

pub mod config;
pub mod error;
pub mod events;
pub mod routine;
pub mod session;
pub mod store;

pub use config::{Config, NotificationsConfig, SessionConfig, UiConfig};
pub use error::{ConfigError, CoreError, RoutineError, StoreError};
pub use events::Event;
pub use routine::{ExerciseSpec, Routine};
pub use session::{AlertPort, Clock, NullAlerts, Phase, RunMode, SessionController, SystemClock};
pub use store::{RoutineStore, StoredRoutine};
