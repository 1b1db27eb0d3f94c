#[macro_use]
pub mod macros;

use runoff_core::{PhosphorusSim, PhosphorusSource, SimConfig, TransportRules};
use runoff_data::{HexGridSize, TileInfo};

type HeightFn = Box<dyn Fn(usize, usize) -> u16>;

#[allow(dead_code)]
pub struct SimBuilder {
    config: SimConfig,
    heights: Option<HeightFn>,
    deposits: Vec<(usize, u16)>,
}

#[allow(dead_code)]
impl SimBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        let mut config = SimConfig::default();
        config.world.width = width;
        config.world.height = height;
        config.world.seed = Some(0);
        config.log_interval = 0;
        Self {
            config,
            heights: None,
            deposits: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn deterministic(mut self) -> Self {
        self.config.world.deterministic = true;
        self
    }

    pub fn parallel(mut self) -> Self {
        self.config.world.parallel = true;
        self
    }

    pub fn with_rules(mut self, retain_per_mille: u16, decay_per_mille: u16) -> Self {
        self.config.transport = TransportRules {
            retain_per_mille,
            decay_per_mille,
        };
        self
    }

    pub fn with_source(mut self, index: usize, amount: u16, interval: u64) -> Self {
        self.config.sources.push(PhosphorusSource {
            index,
            amount,
            interval,
        });
        self
    }

    /// Heights from an `(x, y)` function. Without one the heightfield is generated.
    pub fn with_heights<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) -> u16 + 'static,
    {
        self.heights = Some(Box::new(f));
        self
    }

    pub fn with_phosphorus(mut self, index: usize, amount: u16) -> Self {
        self.deposits.push((index, amount));
        self
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn build(self) -> PhosphorusSim {
        let mut sim = match self.heights {
            Some(f) => {
                let grid = HexGridSize::new(self.config.world.width, self.config.world.height)
                    .expect("valid grid");
                let w = grid.width() as usize;
                let tiles = (0..grid.size())
                    .map(|i| TileInfo::new(f(i % w, i / w), 0))
                    .collect();
                PhosphorusSim::from_tiles(grid, tiles, self.config).expect("valid tiles")
            }
            None => PhosphorusSim::new(self.config).expect("valid config"),
        };
        for (index, amount) in self.deposits {
            sim.add_phosphorus(index, amount).expect("deposit in range");
        }
        sim
    }
}

/// Active counts as plain numbers.
#[allow(dead_code)]
pub fn counts(sim: &PhosphorusSim) -> Vec<u16> {
    sim.counts().iter().map(|s| s.count).collect()
}
