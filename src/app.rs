use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::config::SimConfig;
use crate::model::persistence::{self, SaveFormat};
use crate::model::sim::PhosphorusSim;
use crate::report;

/// What a headless run prints when it finishes.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks_run: u64,
    pub final_tick: u64,
    pub total_phosphorus: u64,
    pub moved: u64,
    pub decayed: u64,
    pub saturated: u64,
    pub injected: u64,
    pub sinks: usize,
    pub elapsed_ms: u128,
    pub config_fingerprint: String,
    pub state_hash: String,
    pub regions: Vec<(u16, u64)>,
}

pub struct App {
    pub sim: PhosphorusSim,
}

impl App {
    /// Reads `path`, falling back to defaults. A missing file is created with
    /// the defaults so there is something to edit next time.
    pub fn load_config<P: AsRef<Path>>(path: P) -> SimConfig {
        let path = path.as_ref();
        if let Ok(content) = std::fs::read_to_string(path) {
            match SimConfig::from_toml(&content) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                }
            }
        }
        let default = SimConfig::default();
        if !path.exists() {
            if let Ok(toml_str) = toml::to_string(&default) {
                if std::fs::write(path, toml_str).is_ok() {
                    tracing::info!(path = %path.display(), "Wrote default config");
                }
            }
        }
        default
    }

    /// Fresh simulation from `config`, or a resumed one when `load` is given.
    pub fn new(config: SimConfig, load: Option<&Path>) -> Result<Self> {
        let sim = match load {
            Some(path) => {
                let snapshot = persistence::load_snapshot(path)
                    .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
                tracing::info!(
                    path = %path.display(),
                    tick = snapshot.tick,
                    total = snapshot.total_phosphorus(),
                    "Resuming from snapshot"
                );
                PhosphorusSim::from_snapshot(&snapshot, config)?
            }
            None => PhosphorusSim::new(config)?,
        };
        Ok(Self { sim })
    }

    /// Runs `ticks` steps (sources, transport, swap) and summarizes.
    pub fn run(&mut self, ticks: u64) -> RunSummary {
        let report = self.sim.run(ticks);
        let metrics = self.sim.metrics();
        RunSummary {
            ticks_run: ticks,
            final_tick: self.sim.current_tick(),
            total_phosphorus: self.sim.total_phosphorus(),
            moved: report.moved,
            decayed: report.decayed,
            saturated: report.saturated,
            injected: metrics.injected(),
            sinks: self.sim.flow_summary().sinks,
            elapsed_ms: metrics.elapsed().as_millis(),
            config_fingerprint: self.sim.config().fingerprint(),
            state_hash: self.sim.deterministic_hash(),
            regions: report::region_totals(self.sim.tiles(), self.sim.counts()),
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P, format: Option<SaveFormat>) -> Result<()> {
        let path = path.as_ref();
        let format = format.unwrap_or_else(|| SaveFormat::from_path(path));
        persistence::save_snapshot_as(&self.sim.snapshot(), path, format)
            .with_context(|| format!("Failed to save snapshot {}", path.display()))
    }
}
