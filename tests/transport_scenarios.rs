#[macro_use]
mod common;

use std::collections::HashSet;

use common::{counts, SimBuilder};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use runoff_core::{evaluate_flow_field, tick, StateBuffers, TransportRules};
use runoff_data::{Direction, DirectionSet, HexGridSize, TileInfo, TileState, MAX_COUNT};

fn row(heights: &[u16]) -> (HexGridSize, Vec<TileInfo>) {
    let grid = HexGridSize::new(heights.len() as u16, 1).unwrap();
    let mut tiles: Vec<TileInfo> = heights.iter().map(|&h| TileInfo::new(h, 0)).collect();
    evaluate_flow_field(&mut tiles, &grid);
    (grid, tiles)
}

#[test]
fn test_three_tile_row_drains_into_sink() {
    let (_, tiles) = row(&[10, 5, 0]);
    assert_eq!(tiles[0].flow_mask, DirectionSet::from_iter([Direction::East]));
    assert_eq!(tiles[1].flow_mask, DirectionSet::from_iter([Direction::East]));
    assert!(tiles[2].is_sink());

    let mut sim = SimBuilder::new(3, 1)
        .with_heights(|x, _| [10, 5, 0][x])
        .with_phosphorus(0, 10)
        .build();
    sim.tick();
    assert_counts!(sim, [0, 10, 0]);
    sim.tick();
    assert_counts!(sim, [0, 0, 10]);
    sim.tick();
    assert_counts!(sim, [0, 0, 10]);
}

#[test]
fn test_five_units_over_two_directions() {
    let (grid, tiles) = row(&[0, 5, 0]);
    assert_eq!(tiles[1].flow_mask.len(), 2);

    let read = vec![TileState::new(0), TileState::new(5), TileState::new(0)];
    let mut outcomes = HashSet::new();
    for seed in 0..64u64 {
        let mut write = vec![TileState::default(); 3];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        tick(&tiles, &read, &mut write, &grid, &TransportRules::default(), &mut rng);

        let (west, east) = (write[0].count, write[2].count);
        assert_eq!(west + east, 5, "seed {} lost units", seed);
        assert!(west >= 2 && east >= 2, "seed {} gave {}/{}", seed, west, east);
        assert_eq!(write[1].count, 0);
        outcomes.insert((west, east));
    }
    assert_eq!(outcomes.len(), 2, "the odd unit should land on either side");
}

#[test]
fn test_same_seed_same_write_buffer() {
    let (grid, tiles) = row(&[0, 9, 0, 9, 0]);
    let read: Vec<TileState> = [0, 7, 0, 3, 0].iter().map(|&c| TileState::new(c)).collect();
    let run = |seed| {
        let mut write = vec![TileState::default(); 5];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        tick(&tiles, &read, &mut write, &grid, &TransportRules::default(), &mut rng);
        write
    };
    assert_eq!(run(77), run(77));
}

#[test]
fn test_write_buffer_ignores_stale_contents() {
    let (grid, tiles) = row(&[10, 5, 0]);
    let read = vec![TileState::new(4), TileState::new(0), TileState::new(1)];
    let mut write = vec![TileState::new(999); 3];
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    tick(&tiles, &read, &mut write, &grid, &TransportRules::default(), &mut rng);
    assert_eq!(write, vec![TileState::new(0), TileState::new(4), TileState::new(1)]);
}

#[test]
fn test_sink_saturates_instead_of_wrapping() {
    let mut sim = SimBuilder::new(3, 1)
        .with_heights(|x, _| [5, 0, 5][x])
        .with_phosphorus(0, MAX_COUNT)
        .with_phosphorus(1, MAX_COUNT)
        .with_phosphorus(2, 10)
        .build();

    let report = sim.tick();
    assert_counts!(sim, [0, MAX_COUNT, 0]);
    assert_eq!(report.saturated, MAX_COUNT as u64 + 10);
    assert_eq!(sim.metrics().saturated(), report.saturated);
}

#[test]
fn test_repeated_injection_clamps() {
    let mut buffers = StateBuffers::new(1);
    let mut landed = 0u64;
    for _ in 0..10 {
        landed += buffers.add_phosphorus(0, 10_000) as u64;
    }
    assert_eq!(buffers.active()[0].count, MAX_COUNT);
    assert_eq!(landed, MAX_COUNT as u64);
}

#[test]
fn test_retention_keeps_share_on_source() {
    let mut sim = SimBuilder::new(2, 1)
        .with_heights(|x, _| [5, 0][x])
        .with_rules(250, 0)
        .with_phosphorus(0, 100)
        .build();
    sim.tick();
    assert_counts!(sim, [25, 75]);
    sim.tick();
    // 25 * 250 / 1000 = 6 stays
    assert_counts!(sim, [6, 94]);
    assert_total!(sim, 100);
}

#[test]
fn test_decay_removes_units_everywhere() {
    let mut sim = SimBuilder::new(3, 1)
        .with_heights(|x, _| [10, 5, 0][x])
        .with_rules(0, 100)
        .with_phosphorus(0, 100)
        .with_phosphorus(2, 50)
        .build();
    let report = sim.tick();
    assert_eq!(report.decayed, 10 + 5);
    assert_counts!(sim, [0, 90, 45]);
}

#[test]
fn test_sources_feed_downhill_tiles() {
    let mut sim = SimBuilder::new(4, 1)
        .with_heights(|x, _| (40 - 10 * x) as u16)
        .with_source(0, 5, 1)
        .build();
    sim.run(6);
    let c = counts(&sim);
    // two injections still in flight, four have reached the sink
    assert_eq!(c, vec![0, 5, 5, 20]);
    assert_total!(sim, 30);
}
