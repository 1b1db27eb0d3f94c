//! Configuration for the phosphorus simulation.
//!
//! Maps onto `config.toml`. Defaults are hardcoded in the `Default` impls and
//! every field may be overridden from the file.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! log_interval = 100
//!
//! [world]
//! width = 64
//! height = 48
//! max_height = 1000
//! region_size = 16
//! seed = 42
//! deterministic = true
//! parallel = false
//!
//! [transport]
//! retain_per_mille = 0
//! decay_per_mille = 0
//!
//! [[sources]]
//! index = 100
//! amount = 25
//! interval = 5
//! ```

use serde::{Deserialize, Serialize};

use crate::tick::{TransportRules, PER_MILLE};

/// Map dimensions and run mode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: u16,
    pub height: u16,
    /// Upper bound of generated heights.
    pub max_height: u16,
    /// Edge length of the square blocks used for region ids.
    pub region_size: u16,
    pub seed: Option<u64>,
    /// Reseed the generator from `seed` and the tick number every tick.
    pub deterministic: bool,
    /// Use the rayon transport kernel.
    pub parallel: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 48,
            max_height: 1000,
            region_size: 16,
            seed: None,
            deterministic: false,
            parallel: false,
        }
    }
}

/// A producer that injects phosphorus into one tile between ticks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhosphorusSource {
    pub index: usize,
    pub amount: u16,
    /// Fires on ticks that are a multiple of this.
    pub interval: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SimConfig {
    /// Ticks between periodic metric log lines. 0 disables them.
    pub log_interval: u64,
    pub world: WorldConfig,
    pub transport: TransportRules,
    pub sources: Vec<PhosphorusSource>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            log_interval: 100,
            world: WorldConfig::default(),
            transport: TransportRules::default(),
            sources: Vec::new(),
        }
    }
}

impl SimConfig {
    /// Validates all parameters, failing on the first bad one.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.world.width > 0, "World width must be positive");
        anyhow::ensure!(self.world.height > 0, "World height must be positive");
        anyhow::ensure!(self.world.max_height > 0, "Max height must be positive");
        anyhow::ensure!(self.world.region_size > 0, "Region size must be positive");

        anyhow::ensure!(
            self.transport.retain_per_mille <= PER_MILLE,
            "Retention must be in [0, {}] per mille",
            PER_MILLE
        );
        anyhow::ensure!(
            self.transport.decay_per_mille <= PER_MILLE,
            "Decay must be in [0, {}] per mille",
            PER_MILLE
        );

        let tiles = self.world.width as usize * self.world.height as usize;
        for (i, source) in self.sources.iter().enumerate() {
            anyhow::ensure!(
                source.index < tiles,
                "Source {} targets tile {} outside a {}-tile map",
                i,
                source.index,
                tiles
            );
            anyhow::ensure!(source.interval > 0, "Source {} interval must be positive", i);
        }

        Ok(())
    }

    /// Parses and validates `config.toml` content.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Hash of the parameters that affect transport results.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.transport).as_bytes());
        hasher.update(format!("{:?}", self.sources).as_bytes());
        hasher.update([self.world.deterministic as u8, self.world.parallel as u8]);
        hex::encode(hasher.finalize())
    }
}
