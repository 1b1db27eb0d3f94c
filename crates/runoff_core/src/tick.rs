//! Per-tick phosphorus transport.
//!
//! A tick reads one state buffer and writes the other. Nothing written during
//! a tick is read back in the same tick, so results never depend on tile
//! iteration order.
//!
//! ## Remainder rule
//!
//! A tile with `k` downhill directions and `n` outgoing units sends `n / k`
//! along every direction. The `n % k` leftover units go one each to
//! consecutive mask members (clockwise, wrapping) beginning at a mask position
//! drawn uniformly from `0..k`. The generator is only consulted when the
//! leftover is non-zero.

use std::sync::atomic::{AtomicU32, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use runoff_data::{DirectionSet, PhosphorusCount, TileInfo, TileState, MAX_COUNT};
use serde::{Deserialize, Serialize};

use crate::hex::HexTopology;

/// Denominator of the per-mille ratios in [`TransportRules`].
pub const PER_MILLE: u16 = 1000;

/// Retention and decay applied to every tile each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportRules {
    /// Share of a draining tile's remaining units that stays put.
    pub retain_per_mille: u16,
    /// Share of every tile's units that is removed from the system.
    pub decay_per_mille: u16,
}

/// How one tile's count splits up in a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Outflow {
    pub decayed: PhosphorusCount,
    pub stay: PhosphorusCount,
    pub outgoing: PhosphorusCount,
}

impl TransportRules {
    #[inline]
    fn fraction(count: PhosphorusCount, per_mille: u16) -> PhosphorusCount {
        (count as u32 * per_mille.min(PER_MILLE) as u32 / PER_MILLE as u32) as PhosphorusCount
    }

    #[inline]
    pub(crate) fn outflow(&self, count: PhosphorusCount, mask: DirectionSet) -> Outflow {
        let decayed = Self::fraction(count, self.decay_per_mille);
        let remaining = count - decayed;
        if mask.is_empty() {
            return Outflow {
                decayed,
                stay: remaining,
                outgoing: 0,
            };
        }
        let kept = Self::fraction(remaining, self.retain_per_mille);
        Outflow {
            decayed,
            stay: kept,
            outgoing: remaining - kept,
        }
    }
}

/// Totals for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Units sent to a neighbor.
    pub moved: u64,
    /// Units removed by decay.
    pub decayed: u64,
    /// Units lost to saturation at a full tile.
    pub saturated: u64,
}

/// Sends `outgoing` units along `mask` from tile `index`.
///
/// `emit(target, amount)` receives every non-zero share. Returns the units
/// that could not leave (mask pointing past the edge) and must stay on the
/// source tile.
#[inline]
fn scatter<G, S, F>(
    grid: &G,
    index: usize,
    mask: DirectionSet,
    outgoing: PhosphorusCount,
    pick_start: S,
    mut emit: F,
) -> PhosphorusCount
where
    G: HexTopology,
    S: FnOnce(usize) -> usize,
    F: FnMut(usize, PhosphorusCount),
{
    let k = mask.len();
    let share = outgoing / k as PhosphorusCount;
    let leftover = (outgoing % k as PhosphorusCount) as usize;
    let start = if leftover > 0 { pick_start(k) } else { 0 };

    let mut stranded = 0;
    for (pos, dir) in mask.iter().enumerate() {
        let extra = ((pos + k - start) % k < leftover) as PhosphorusCount;
        let amount = share + extra;
        if amount == 0 {
            continue;
        }
        match grid.neighbor_index(index, dir) {
            Some(target) => emit(target, amount),
            // stale mask: the share stays on the source
            None => stranded += amount,
        }
    }
    stranded
}

#[inline]
fn deposit(state: &mut TileState, amount: PhosphorusCount) -> u64 {
    (amount - state.add(amount)) as u64
}

/// Advances transport by one tick, single-threaded.
///
/// `read` is left untouched; `write` is cleared and fully rebuilt from
/// `read` and `tiles`. All slices must have `grid.size()` elements.
pub fn tick<G, R>(
    tiles: &[TileInfo],
    read: &[TileState],
    write: &mut [TileState],
    grid: &G,
    rules: &TransportRules,
    rng: &mut R,
) -> TickReport
where
    G: HexTopology,
    R: Rng + ?Sized,
{
    debug_assert_eq!(tiles.len(), read.len());
    debug_assert_eq!(read.len(), write.len());

    write.fill(TileState::default());
    let mut report = TickReport::default();

    for (i, (info, state)) in tiles.iter().zip(read).enumerate() {
        let flow = rules.outflow(state.count, info.flow_mask);
        report.decayed += flow.decayed as u64;

        let mut stay = flow.stay;
        if flow.outgoing > 0 {
            let mut sent = 0u64;
            let mut clipped = 0u64;
            stay += scatter(
                grid,
                i,
                info.flow_mask,
                flow.outgoing,
                |k| rng.gen_range(0..k),
                |target, amount| {
                    sent += amount as u64;
                    clipped += deposit(&mut write[target], amount);
                },
            );
            report.moved += sent;
            report.saturated += clipped;
        }
        report.saturated += deposit(&mut write[i], stay);
    }

    report
}

/// Per-tile generator seed for [`tick_parallel`].
#[inline]
#[must_use]
pub fn tile_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Parallel variant of [`tick`].
///
/// Source tiles are processed on the rayon pool; shares accumulate in
/// `scratch` (one counter per tile, owned by the caller so no allocation
/// happens here) and are then folded into `write` with saturation. Each tile
/// that needs a remainder draw seeds its own `ChaCha8Rng` from
/// [`tile_seed`], so the result only depends on `seed`.
pub fn tick_parallel<G>(
    tiles: &[TileInfo],
    read: &[TileState],
    write: &mut [TileState],
    grid: &G,
    rules: &TransportRules,
    seed: u64,
    scratch: &[AtomicU32],
) -> TickReport
where
    G: HexTopology + Sync,
{
    debug_assert_eq!(tiles.len(), read.len());
    debug_assert_eq!(read.len(), write.len());
    debug_assert_eq!(read.len(), scratch.len());

    scratch
        .par_iter()
        .for_each(|acc| acc.store(0, Ordering::Relaxed));

    let (moved, decayed) = tiles
        .par_iter()
        .zip(read.par_iter())
        .enumerate()
        .map(|(i, (info, state))| {
            let flow = rules.outflow(state.count, info.flow_mask);
            let mut stay = flow.stay;
            let mut sent = 0u64;
            if flow.outgoing > 0 {
                stay += scatter(
                    grid,
                    i,
                    info.flow_mask,
                    flow.outgoing,
                    |k| ChaCha8Rng::seed_from_u64(tile_seed(seed, i)).gen_range(0..k),
                    |target, amount| {
                        sent += amount as u64;
                        scratch[target].fetch_add(amount as u32, Ordering::Relaxed);
                    },
                );
            }
            scratch[i].fetch_add(stay as u32, Ordering::Relaxed);
            (sent, flow.decayed as u64)
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));

    let saturated: u64 = write
        .par_iter_mut()
        .zip(scratch.par_iter())
        .map(|(state, acc)| {
            let total = acc.load(Ordering::Relaxed);
            let max = MAX_COUNT as u32;
            state.count = total.min(max) as PhosphorusCount;
            total.saturating_sub(max) as u64
        })
        .sum();

    TickReport {
        moved,
        decayed,
        saturated,
    }
}
