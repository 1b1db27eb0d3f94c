//! Reference host driver.
//!
//! [`PhosphorusSim`] owns everything the pure kernels need: the grid, the
//! static tiles, both state buffers, the generator and the parallel scratch
//! space. It upholds the call-ordering contract (flow field before ticks,
//! swap after every tick, injections only into the active buffer).

use std::sync::atomic::AtomicU32;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use runoff_data::{HexGridSize, PhosphorusCount, SimSnapshot, TileInfo, TileState};

use crate::buffers::StateBuffers;
use crate::config::{PhosphorusSource, SimConfig};
use crate::flow::{evaluate_flow_field, evaluate_flow_field_parallel, FlowSummary};
use crate::generation::generate_tiles;
use crate::metrics::Metrics;
use crate::tick::{self, TickReport};

pub struct PhosphorusSim {
    config: SimConfig,
    grid: HexGridSize,
    tiles: Vec<TileInfo>,
    buffers: StateBuffers,
    scratch: Vec<AtomicU32>,
    rng: ChaCha8Rng,
    seed: u64,
    tick_count: u64,
    flow: FlowSummary,
    metrics: Metrics,
}

impl PhosphorusSim {
    /// Generates a heightfield from the config and sets up an empty simulation.
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let seed = resolve_seed(&config);
        let grid = HexGridSize::new(config.world.width, config.world.height)?;
        let tiles = generate_tiles(
            &grid,
            seed,
            config.world.max_height,
            config.world.region_size,
        );
        Self::assemble(grid, tiles, vec![TileState::default(); grid.size()], config, seed, 0)
    }

    /// Uses caller-supplied tiles. Heights are read, flow masks are rebuilt.
    /// `config.world` dimensions are replaced by the grid's.
    pub fn from_tiles(grid: HexGridSize, tiles: Vec<TileInfo>, mut config: SimConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(
            tiles.len() == grid.size(),
            "Expected {} tiles, got {}",
            grid.size(),
            tiles.len()
        );
        config.world.width = grid.width();
        config.world.height = grid.height();
        let seed = resolve_seed(&config);
        let states = vec![TileState::default(); grid.size()];
        Self::assemble(grid, tiles, states, config, seed, 0)
    }

    /// Resumes from a saved snapshot. `config.world` dimensions are ignored.
    pub fn from_snapshot(snapshot: &SimSnapshot, mut config: SimConfig) -> anyhow::Result<Self> {
        snapshot.check_lengths()?;
        let grid = HexGridSize::new(snapshot.width, snapshot.height)?;
        config.world.width = snapshot.width;
        config.world.height = snapshot.height;
        config.world.seed = Some(snapshot.seed);

        let tiles = snapshot
            .heights
            .iter()
            .zip(&snapshot.region_ids)
            .map(|(&h, &r)| TileInfo::new(h, r))
            .collect();
        let states = snapshot.counts.iter().map(|&c| TileState::new(c)).collect();
        Self::assemble(grid, tiles, states, config, snapshot.seed, snapshot.tick)
    }

    fn assemble(
        grid: HexGridSize,
        mut tiles: Vec<TileInfo>,
        states: Vec<TileState>,
        config: SimConfig,
        seed: u64,
        tick_count: u64,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let flow = if config.world.parallel {
            evaluate_flow_field_parallel(&mut tiles, &grid)
        } else {
            evaluate_flow_field(&mut tiles, &grid)
        };

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            seed = seed,
            sinks = flow.sinks,
            parallel = config.world.parallel,
            "Phosphorus simulation ready"
        );

        let metrics = Metrics::new(config.log_interval);
        Ok(Self {
            grid,
            tiles,
            buffers: StateBuffers::from_states(states),
            scratch: (0..grid.size()).map(|_| AtomicU32::new(0)).collect(),
            rng: ChaCha8Rng::seed_from_u64(seed.wrapping_add(tick_count)),
            seed,
            tick_count,
            flow,
            metrics,
            config,
        })
    }

    /// Replaces every height and re-evaluates the flow field.
    pub fn set_heights(&mut self, heights: &[u16]) -> anyhow::Result<FlowSummary> {
        anyhow::ensure!(
            heights.len() == self.tiles.len(),
            "Expected {} heights, got {}",
            self.tiles.len(),
            heights.len()
        );
        for (tile, &h) in self.tiles.iter_mut().zip(heights) {
            tile.height = h;
        }
        self.flow = if self.config.world.parallel {
            evaluate_flow_field_parallel(&mut self.tiles, &self.grid)
        } else {
            evaluate_flow_field(&mut self.tiles, &self.grid)
        };
        tracing::info!(sinks = self.flow.sinks, "Heightfield changed, flow field rebuilt");
        Ok(self.flow)
    }

    /// Saturating injection into the active buffer. Returns the amount that landed.
    pub fn add_phosphorus(&mut self, index: usize, amount: PhosphorusCount) -> anyhow::Result<PhosphorusCount> {
        anyhow::ensure!(
            index < self.grid.size(),
            "Tile {} is outside a {}-tile map",
            index,
            self.grid.size()
        );
        let landed = self.buffers.add_phosphorus(index, amount);
        self.metrics.record_injection(landed as u64);
        if landed < amount {
            tracing::warn!(tile = index, requested = amount, landed = landed, "Injection clipped");
        }
        Ok(landed)
    }

    /// Fires every configured source whose interval divides the current tick.
    pub fn apply_sources(&mut self) -> u64 {
        let tick = self.tick_count;
        let mut landed = 0u64;
        for source in &self.config.sources {
            if tick % source.interval == 0 {
                let added = self.buffers.add_phosphorus(source.index, source.amount);
                if added < source.amount {
                    tracing::warn!(
                        tile = source.index,
                        requested = source.amount,
                        landed = added,
                        "Source injection clipped"
                    );
                }
                landed += added as u64;
            }
        }
        if landed > 0 {
            self.metrics.record_injection(landed);
        }
        landed
    }

    /// One transport step followed by the buffer swap.
    pub fn tick(&mut self) -> TickReport {
        let started = Instant::now();
        self.tick_count += 1;

        if self.config.world.deterministic {
            let seed = self
                .seed
                .wrapping_add(self.tick_count)
                .wrapping_add(0x5EED);
            self.rng = ChaCha8Rng::seed_from_u64(seed);
        }

        let rules = self.config.transport;
        let (read, write) = self.buffers.read_write();
        let report = if self.config.world.parallel {
            let seed = self.rng.gen();
            tick::tick_parallel(&self.tiles, read, write, &self.grid, &rules, seed, &self.scratch)
        } else {
            tick::tick(&self.tiles, read, write, &self.grid, &rules, &mut self.rng)
        };
        self.buffers.swap();

        let total = self.buffers.total();
        tracing::debug!(
            tick = self.tick_count,
            moved = report.moved,
            total = total,
            "Transport step"
        );
        self.metrics.record_tick(started.elapsed(), &report, total);
        report
    }

    /// Sources then transport.
    pub fn step(&mut self) -> TickReport {
        self.apply_sources();
        self.tick()
    }

    /// Runs `ticks` steps and returns the summed report.
    pub fn run(&mut self, ticks: u64) -> TickReport {
        let mut sum = TickReport::default();
        for _ in 0..ticks {
            let r = self.step();
            sum.moved += r.moved;
            sum.decayed += r.decayed;
            sum.saturated += r.saturated;
        }
        sum
    }

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Registers a producer after checking it against this map.
    pub fn add_source(&mut self, source: PhosphorusSource) -> anyhow::Result<()> {
        let mut candidate = self.config.clone();
        candidate.sources.push(source);
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }

    #[must_use]
    pub fn grid(&self) -> &HexGridSize {
        &self.grid
    }

    #[must_use]
    pub fn tiles(&self) -> &[TileInfo] {
        &self.tiles
    }

    /// The buffer external readers should look at.
    #[must_use]
    pub fn counts(&self) -> &[TileState] {
        self.buffers.active()
    }

    #[must_use]
    pub fn active_buffer_index(&self) -> usize {
        self.buffers.active_index()
    }

    #[must_use]
    pub fn total_phosphorus(&self) -> u64 {
        self.buffers.total()
    }

    #[must_use]
    pub fn flow_summary(&self) -> FlowSummary {
        self.flow
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn current_tick(&self) -> u64 {
        self.tick_count
    }

    /// Captures the persisted state. The inactive buffer is not included.
    #[must_use]
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            tick: self.tick_count,
            seed: self.seed,
            heights: self.tiles.iter().map(|t| t.height).collect(),
            region_ids: self.tiles.iter().map(|t| t.region_id).collect(),
            counts: self.counts().iter().map(|s| s.count).collect(),
            state_hash: self.deterministic_hash(),
        }
    }

    /// Hex SHA-256 over dimensions, tick, heights, region ids and active counts.
    #[must_use]
    pub fn deterministic_hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.grid.width().to_le_bytes());
        hasher.update(self.grid.height().to_le_bytes());
        hasher.update(self.tick_count.to_le_bytes());
        for tile in &self.tiles {
            hasher.update(tile.height.to_le_bytes());
            hasher.update(tile.region_id.to_le_bytes());
        }
        for state in self.counts() {
            hasher.update(state.count.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

/// Configured seed, or a fresh random one.
fn resolve_seed(config: &SimConfig) -> u64 {
    config
        .world
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen())
}
