//! Fetch admission and politeness pacing
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - Spacing requests to one origin by its robots.txt crawl delay

use crate::robots::MAX_CRAWL_DELAY;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};

/// Permission to perform one fetch
///
/// The global slot is released when this is dropped.
#[derive(Debug)]
pub struct ScheduledFetch {
    /// The semaphore permit for this fetch
    _permit: OwnedSemaphorePermit,

    /// Time spent waiting on the origin's crawl delay
    pub waited: Duration,
}

/// Admits fetches under a global concurrency limit and per-origin delays
///
/// The scheduler coordinates:
/// - Global concurrency limits (at most `max_concurrent` fetches in flight)
/// - Per-origin pacing (consecutive fetch starts at least `crawl_delay` apart)
#[derive(Debug)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global_semaphore: Arc<Semaphore>,

    /// Earliest instant the next fetch to each origin may start
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl Scheduler {
    /// Creates a scheduler allowing `max_concurrent` fetches at once
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            global_semaphore: Arc::new(Semaphore::new(max_concurrent)),
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Waits until a fetch to `origin` may start
    ///
    /// This method:
    /// 1. Acquires a global semaphore permit
    /// 2. Reserves the origin's next start slot when a crawl delay applies,
    ///    clamping the delay to [`MAX_CRAWL_DELAY`]
    /// 3. Sleeps until that slot arrives
    ///
    /// Reservation happens under the lock, so concurrent callers for the same
    /// origin queue up one delay apart instead of all waking together.
    pub async fn schedule(
        &self,
        origin: &str,
        crawl_delay: Option<Duration>,
    ) -> Result<ScheduledFetch, AcquireError> {
        let permit = self.global_semaphore.clone().acquire_owned().await?;

        let start_at = match crawl_delay {
            Some(delay) if !delay.is_zero() => {
                Some(self.reserve(origin, delay.min(MAX_CRAWL_DELAY)))
            }
            _ => None,
        };

        let waited = match start_at {
            Some(start_at) => {
                let wait = start_at.saturating_duration_since(Instant::now());
                if !wait.is_zero() {
                    tracing::debug!("Waiting {:?} before fetching from {}", wait, origin);
                    tokio::time::sleep(wait).await;
                }
                wait
            }
            None => Duration::ZERO,
        };

        Ok(ScheduledFetch {
            _permit: permit,
            waited,
        })
    }

    /// Number of fetch slots currently free
    pub fn available_permits(&self) -> usize {
        self.global_semaphore.available_permits()
    }

    fn reserve(&self, origin: &str, delay: Duration) -> Instant {
        let mut slots = self
            .next_slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let now = Instant::now();
        let start_at = slots
            .get(origin)
            .copied()
            .filter(|slot| *slot > now)
            .unwrap_or(now);
        let next = start_at
            .checked_add(delay)
            .or_else(|| start_at.checked_add(MAX_CRAWL_DELAY))
            .unwrap_or(start_at);
        slots.insert(origin.to_string(), next);
        start_at
    }
}
