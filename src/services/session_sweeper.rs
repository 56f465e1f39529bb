//! Idle-session eviction daemon.
//!
//! Sessions have no expiry of their own; they live until finalization or an
//! explicit clear. This background task bounds memory growth by evicting
//! registry entries left untouched past a configured TTL. Eviction drops
//! in-memory state only; transient documents in the store are untouched, so
//! an evicted candidate who returns resumes from their stored evaluations.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, info};

use crate::services::session_registry::SessionRegistry;

/// Configuration for the idle-session sweeper.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Interval between sweep passes.
    pub interval: Duration,
    /// How long a session may sit untouched before eviction.
    pub idle_ttl: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            idle_ttl: Duration::from_secs(3600),
        }
    }
}

/// Handle to a running sweeper.
pub struct SweeperHandle {
    stop_flag: Arc<AtomicBool>,
    evicted: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stops the sweep loop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Release);
        self.task.abort();
    }

    /// Total sessions evicted since start.
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Acquire)
    }
}

/// Background sweeper over one session registry.
pub struct SessionSweeper {
    registry: Arc<SessionRegistry>,
    config: SweeperConfig,
}

impl SessionSweeper {
    /// Creates a sweeper for the given registry.
    pub fn new(registry: Arc<SessionRegistry>, config: SweeperConfig) -> Self {
        Self { registry, config }
    }

    /// Spawns the sweep loop on the current runtime.
    pub fn spawn(self) -> SweeperHandle {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let evicted = Arc::new(AtomicU64::new(0));

        let task = tokio::spawn({
            let stop_flag = Arc::clone(&stop_flag);
            let evicted = Arc::clone(&evicted);
            async move {
                let mut ticker = interval(self.config.interval);
                // The first tick of a tokio interval completes immediately.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    if stop_flag.load(Ordering::Acquire) {
                        break;
                    }
                    let swept = sweep_once(&self.registry, self.config.idle_ttl).await;
                    if swept > 0 {
                        evicted.fetch_add(swept, Ordering::AcqRel);
                        info!(swept, "evicted idle sessions");
                    }
                }
            }
        });

        SweeperHandle {
            stop_flag,
            evicted,
            task,
        }
    }
}

/// Evicts sessions idle longer than `idle_ttl`; returns the eviction count.
pub async fn sweep_once(registry: &SessionRegistry, idle_ttl: Duration) -> u64 {
    let ttl = match chrono::Duration::from_std(idle_ttl) {
        Ok(ttl) => ttl,
        Err(_) => return 0,
    };
    let cutoff = Utc::now() - ttl;

    let mut count = 0;
    for session_id in registry.idle_since(cutoff).await {
        if registry.remove(&session_id).await {
            debug!(session_id = %session_id, "evicted idle session");
            count += 1;
        }
    }
    count
}
