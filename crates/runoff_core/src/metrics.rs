//! Tick metrics and logging setup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::tick::TickReport;

/// Running totals for a simulation run.
pub struct Metrics {
    tick_count: AtomicU64,
    total_phosphorus: AtomicU64,
    moved: AtomicU64,
    decayed: AtomicU64,
    saturated: AtomicU64,
    injected: AtomicU64,
    log_interval: u64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Metrics {
    /// `log_interval` of 0 disables the periodic log line.
    #[must_use]
    pub fn new(log_interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            total_phosphorus: AtomicU64::new(0),
            moved: AtomicU64::new(0),
            decayed: AtomicU64::new(0),
            saturated: AtomicU64::new(0),
            injected: AtomicU64::new(0),
            log_interval,
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick.
    pub fn record_tick(&self, duration: Duration, report: &TickReport, total: u64) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.total_phosphorus.store(total, Ordering::Relaxed);
        self.moved.fetch_add(report.moved, Ordering::Relaxed);
        self.decayed.fetch_add(report.decayed, Ordering::Relaxed);
        self.saturated.fetch_add(report.saturated, Ordering::Relaxed);

        if report.saturated > 0 {
            tracing::warn!(clipped = report.saturated, "Tiles saturated during transport");
        }

        let tick = self.tick_count.load(Ordering::Relaxed);
        if self.log_interval > 0 && tick % self.log_interval == 0 {
            tracing::info!(
                tick = tick,
                total = total,
                moved = report.moved,
                decayed = report.decayed,
                duration_us = duration.as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    pub fn record_injection(&self, amount: u64) {
        self.injected.fetch_add(amount, Ordering::Relaxed);
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total_phosphorus(&self) -> u64 {
        self.total_phosphorus.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn moved(&self) -> u64 {
        self.moved.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn decayed(&self) -> u64 {
        self.decayed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn saturated(&self) -> u64 {
        self.saturated.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn injected(&self) -> u64 {
        self.injected.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Installs a fmt subscriber honouring `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .finish(),
    )
    .ok();
}
