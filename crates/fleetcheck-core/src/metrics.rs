//! Global atomic counters for fleetcheck runs.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single `tracing::info!`
//! event at the end of a run.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters.
pub struct Metrics {
    devices_evaluated: AtomicU64,
    installs_scanned: AtomicU64,
    findings_emitted: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            devices_evaluated: AtomicU64::new(0),
            installs_scanned: AtomicU64::new(0),
            findings_emitted: AtomicU64::new(0),
        }
    }

    /// Add `n` to the devices-evaluated counter.
    pub fn add_devices_evaluated(&self, n: u64) {
        self.devices_evaluated.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "devices_evaluated", n = n, "counter incremented");
    }

    /// Add `n` to the installs-scanned counter.
    pub fn add_installs_scanned(&self, n: u64) {
        self.installs_scanned.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "installs_scanned", n = n, "counter incremented");
    }

    /// Add `n` to the findings-emitted counter.
    pub fn add_findings(&self, n: u64) {
        self.findings_emitted.fetch_add(n, Ordering::Relaxed);
        tracing::trace!(metric = "findings_emitted", n = n, "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            devices_evaluated = self.devices_evaluated(),
            installs_scanned = self.installs_scanned(),
            findings_emitted = self.findings_emitted(),
        );
    }

    pub fn devices_evaluated(&self) -> u64 {
        self.devices_evaluated.load(Ordering::Relaxed)
    }

    pub fn installs_scanned(&self) -> u64 {
        self.installs_scanned.load(Ordering::Relaxed)
    }

    pub fn findings_emitted(&self) -> u64 {
        self.findings_emitted.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.devices_evaluated.store(0, Ordering::Relaxed);
        self.installs_scanned.store(0, Ordering::Relaxed);
        self.findings_emitted.store(0, Ordering::Relaxed);
    }
}
