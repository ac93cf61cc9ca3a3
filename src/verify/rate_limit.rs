//! Per-host budget for outbound URL checks.
//!
//! Owned by the scan orchestrator and passed into verification explicitly;
//! reset between scans so no state leaks across runs.

use std::collections::HashMap;

/// Caps URL reachability checks per target hostname within one scan
#[derive(Debug)]
pub struct UrlRateLimiter {
    per_host_limit: u32,
    counts: HashMap<String, u32>,
}

impl UrlRateLimiter {
    pub fn new(per_host_limit: u32) -> Self {
        Self {
            per_host_limit,
            counts: HashMap::new(),
        }
    }

    /// Consume one check for `host`; `false` means the budget is spent
    pub fn try_acquire(&mut self, host: &str) -> bool {
        let count = self.counts.entry(host.to_lowercase()).or_insert(0);
        if *count >= self.per_host_limit {
            return false;
        }
        *count += 1;
        true
    }

    /// Clear all counters at the start of a new scan
    pub fn reset(&mut self) {
        self.counts.clear();
    }
}
