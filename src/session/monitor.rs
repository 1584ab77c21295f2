//! Polling of the server's subscription-update status.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::app::Result;
use crate::domain::UpdateStatus;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;

/// Parse an interval like "3s", "2m" or a bare number of seconds.
pub fn parse_interval(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim().to_lowercase();

    if let Some(minutes) = s.strip_suffix('m') {
        minutes
            .parse::<u64>()
            .map(|m| m * 60)
            .map_err(|_| format!("Invalid minutes: {}", minutes))
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>()
            .map_err(|_| format!("Invalid seconds: {}", secs))
    } else {
        s.parse::<u64>()
            .map_err(|_| format!("Invalid interval: {}. Use format like '3s' or '1m'", s))
    }
}

/// Watches a server-side update until it is no longer active.
pub struct UpdateMonitor {
    api: ApiClient,
    poll_interval: Duration,
    running: Arc<AtomicBool>,
}

impl UpdateMonitor {
    pub fn new(api: ApiClient) -> Self {
        Self::with_interval(api, Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS))
    }

    pub fn with_interval(api: ApiClient, poll_interval: Duration) -> Self {
        Self {
            api,
            poll_interval,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub async fn poll_once(&self) -> Result<UpdateStatus> {
        self.api.get_subscription_update_status().await
    }

    /// Poll until the update stops being active, calling `on_change` with the
    /// first status and every status that differs from the previous one.
    ///
    /// Returns the last status seen. A failed poll ends monitoring with the
    /// error.
    pub async fn run<F>(&self, mut on_change: F) -> Result<UpdateStatus>
    where
        F: FnMut(&UpdateStatus),
    {
        let mut status = self.poll_once().await?;
        on_change(&status);

        let mut timer = interval(self.poll_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer.tick().await; // Skip the first immediate tick

        while status.is_updating() && self.running.load(Ordering::SeqCst) {
            timer.tick().await;

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let next = self.poll_once().await?;
            if next != status {
                debug!("Update status changed: {:?}", next.status);
                on_change(&next);
            }
            status = next;
        }

        info!("Update monitor stopped ({:?})", status.status);
        Ok(status)
    }

    /// Stop monitoring after the current poll.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Shared flag for stopping the monitor from another task.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }
}
