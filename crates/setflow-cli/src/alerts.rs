//! Terminal alert sink.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use setflow_core::{AlertPort, NotificationsConfig, Phase};
use tracing::debug;

/// Best-effort end-of-phase bell.
///
/// `schedule` parks a detached thread until the deadline. A later schedule
/// or cancel bumps the generation counter, and a stale thread drops its
/// alert on wake -- at most one pending alert can ever fire. The session
/// never waits on this; a lost bell loses only the bell.
pub struct BellAlerts {
    config: NotificationsConfig,
    generation: Arc<AtomicU64>,
}

impl BellAlerts {
    pub fn new(config: NotificationsConfig) -> Self {
        Self {
            config,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl AlertPort for BellAlerts {
    fn schedule(&mut self, phase: Phase, duration_ms: u64) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.config.enabled {
            return;
        }
        debug!(?phase, duration_ms, "alert scheduled");
        let current = Arc::clone(&self.generation);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(duration_ms));
            if current.load(Ordering::SeqCst) == generation {
                print!("\x07");
                let _ = io::stdout().flush();
                debug!(?phase, "alert fired");
            }
        });
    }

    fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        debug!("pending alert cancelled");
    }
}
