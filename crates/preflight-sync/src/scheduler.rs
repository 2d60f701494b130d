//! Daily upload scheduler: one shot at the next local midnight, then
//! every 24 hours.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};

use preflight_core::models::InteractionRecord;

use crate::engine::SyncEngine;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);
/// Shutdown poll granularity while sleeping.
const POLL: Duration = Duration::from_millis(250);

/// Background thread driving the daily anonymized upload. Cancellable:
/// `stop` (also run on drop) wakes the sleep within the poll interval
/// and joins the thread.
pub struct UploadScheduler {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl UploadScheduler {
    /// Start the scheduler. `snapshot` is called at each tick to obtain
    /// the current history without holding any model lock across the
    /// upload.
    pub fn start<F>(engine: Arc<SyncEngine>, snapshot: F) -> Self
    where
        F: Fn() -> Vec<InteractionRecord> + Send + 'static,
    {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = shutdown.clone();

        let handle = std::thread::Builder::new()
            .name("preflight-upload".into())
            .spawn(move || {
                let mut wait = until_next_midnight(Local::now());
                tracing::debug!("sync: first upload in {}s", wait.as_secs());
                loop {
                    if sleep_interruptible(&flag, wait) {
                        break;
                    }
                    let history = snapshot();
                    if let Err(e) = engine.upload(&history) {
                        tracing::warn!("sync: scheduled upload failed: {e}");
                    }
                    wait = DAY;
                }
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!("sync: could not spawn upload scheduler: {e}");
                None
            }
        };

        Self { shutdown, handle }
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for UploadScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sleep for `total`, checking the shutdown flag every poll interval.
/// Returns true when interrupted by shutdown.
fn sleep_interruptible(flag: &AtomicBool, total: Duration) -> bool {
    let mut remaining = total;
    while remaining > Duration::ZERO {
        if flag.load(Ordering::SeqCst) {
            return true;
        }
        let step = remaining.min(POLL);
        std::thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
    flag.load(Ordering::SeqCst)
}

/// Time until the next local midnight. Falls back to a flat day on
/// calendar edge cases rather than guessing.
fn until_next_midnight(now: DateTime<Local>) -> Duration {
    let Some(tomorrow) = now.date_naive().succ_opt() else {
        return DAY;
    };
    let Some(midnight) = tomorrow.and_hms_opt(0, 0, 0) else {
        return DAY;
    };
    match Local.from_local_datetime(&midnight).earliest() {
        Some(next) => (next - now).to_std().unwrap_or(DAY),
        None => DAY,
    }
}
