//! Visit counts per request path.
//!
//! The whole map sits behind one lock and every bump sleeps while holding
//! it. Concurrent bumps therefore queue behind each other whatever their
//! key, which is what the load tests measure.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;

#[derive(Debug)]
pub struct HitCounter {
    delay: Duration,
    counts: Mutex<HashMap<String, u64>>,
}

impl HitCounter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Increments the count for `key`. A missing key counts as zero.
    pub async fn bump(&self, key: &str) {
        let mut counts = self.counts.lock().await;
        let current = counts.get(key).copied().unwrap_or(0);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        counts.insert(key.to_string(), current + 1);
    }

    pub async fn get(&self, key: &str) -> u64 {
        self.counts.lock().await.get(key).copied().unwrap_or(0)
    }

    /// Counts for several keys read under one lock acquisition.
    pub async fn counts_for(&self, keys: &[String]) -> Vec<u64> {
        let counts = self.counts.lock().await;
        keys.iter()
            .map(|k| counts.get(k).copied().unwrap_or(0))
            .collect()
    }
}
