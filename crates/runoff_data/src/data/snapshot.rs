use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};
use serde::{Deserialize, Serialize};

/// Persisted simulation state.
///
/// Only the active count buffer is stored; flow masks and the inactive
/// buffer are rebuilt on load.
#[derive(
    Serialize, Deserialize, Clone, Debug, Default, PartialEq, Archive, RkyvSerialize, RkyvDeserialize,
)]
#[archive(check_bytes)]
pub struct SimSnapshot {
    pub width: u16,
    pub height: u16,
    pub tick: u64,
    pub seed: u64,
    pub heights: Vec<u16>,
    pub region_ids: Vec<u16>,
    pub counts: Vec<u16>,
    /// Hex SHA-256 of the state at save time.
    pub state_hash: String,
}

impl SimSnapshot {
    /// Number of tiles implied by the stored dimensions.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Checks that every per-tile array matches the dimensions.
    pub fn check_lengths(&self) -> anyhow::Result<()> {
        let n = self.tile_count();
        anyhow::ensure!(n > 0, "Snapshot has an empty grid");
        anyhow::ensure!(
            self.heights.len() == n,
            "Snapshot has {} heights for {} tiles",
            self.heights.len(),
            n
        );
        anyhow::ensure!(
            self.region_ids.len() == n,
            "Snapshot has {} region ids for {} tiles",
            self.region_ids.len(),
            n
        );
        anyhow::ensure!(
            self.counts.len() == n,
            "Snapshot has {} counts for {} tiles",
            self.counts.len(),
            n
        );
        Ok(())
    }

    #[must_use]
    pub fn total_phosphorus(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }
}
