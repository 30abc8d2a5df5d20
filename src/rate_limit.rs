//! Per-client sliding-window admission control.
//!
//! Every client address keeps the instants of its admitted requests inside
//! the trailing window. Stale instants are pruned on the next check for that
//! client, never eagerly.

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Admitted requests per client inside one window.
pub const REQUESTS_PER_SECOND: usize = 5;

/// Length of the trailing window.
pub const TIME_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    clients: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(REQUESTS_PER_SECOND, TIME_WINDOW)
    }
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` and records the attempt if `client` still has quota.
    pub async fn admit(&self, client: IpAddr) -> bool {
        self.admit_at(client, Instant::now()).await
    }

    /// Same as [`admit`](Self::admit) with an explicit clock.
    ///
    /// Prune, count and append happen under a single lock acquisition, so two
    /// concurrent calls can never both take the last free slot.
    pub async fn admit_at(&self, client: IpAddr, now: Instant) -> bool {
        let mut clients = self.clients.lock().await;
        let stamps = clients.entry(client).or_default();

        while let Some(oldest) = stamps.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                stamps.pop_front();
            } else {
                break;
            }
        }

        if stamps.len() < self.limit {
            stamps.push_back(now);
            true
        } else {
            false
        }
    }

    /// Drops clients whose recorded requests have all left the window.
    ///
    /// Such clients would be admitted with an empty window anyway, so this
    /// never changes an admission decision.
    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now()).await
    }

    pub async fn evict_idle_at(&self, now: Instant) -> usize {
        let window = self.window;
        let mut clients = self.clients.lock().await;
        let before = clients.len();
        clients.retain(|_, stamps| {
            stamps
                .back()
                .is_some_and(|last| now.saturating_duration_since(*last) < window)
        });
        before - clients.len()
    }

    /// Number of client addresses currently tracked.
    pub async fn tracked_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}
