use std::sync::atomic::AtomicU32;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use runoff_core::{
    add_phosphorus, evaluate_flow_field, tick, tick_parallel, HexTopology, TransportRules,
};
use runoff_data::{Direction, HexGridSize, TileInfo, TileState, MAX_COUNT};

#[derive(Debug, Clone)]
struct Map {
    grid: HexGridSize,
    tiles: Vec<TileInfo>,
    counts: Vec<TileState>,
}

prop_compose! {
    fn arb_dims()(width in 1u16..14, height in 1u16..14) -> (u16, u16) {
        (width, height)
    }
}

fn arb_map(max_count: u16) -> impl Strategy<Value = Map> {
    arb_dims().prop_flat_map(move |(w, h)| {
        let n = w as usize * h as usize;
        (
            prop::collection::vec(0u16..20, n),
            prop::collection::vec(0u16..=max_count, n),
        )
            .prop_map(move |(heights, counts)| {
                let grid = HexGridSize::new(w, h).unwrap();
                let mut tiles: Vec<TileInfo> =
                    heights.into_iter().map(|h| TileInfo::new(h, 0)).collect();
                evaluate_flow_field(&mut tiles, &grid);
                Map {
                    grid,
                    tiles,
                    counts: counts.into_iter().map(TileState::new).collect(),
                }
            })
    })
}

fn total(states: &[TileState]) -> u64 {
    states.iter().map(|s| s.count as u64).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_mass_conserved_without_saturation(map in arb_map(1000), seed in any::<u64>()) {
        let mut write = vec![TileState::default(); map.grid.size()];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let report = tick(&map.tiles, &map.counts, &mut write, &map.grid, &TransportRules::default(), &mut rng);

        prop_assert_eq!(report.saturated, 0);
        prop_assert_eq!(report.decayed, 0);
        prop_assert_eq!(total(&write), total(&map.counts));
    }

    #[test]
    fn test_mass_balances_with_rules(
        map in arb_map(MAX_COUNT),
        retain in 0u16..=1000,
        decay in 0u16..=1000,
        seed in any::<u64>()
    ) {
        let rules = TransportRules { retain_per_mille: retain, decay_per_mille: decay };
        let mut write = vec![TileState::default(); map.grid.size()];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let report = tick(&map.tiles, &map.counts, &mut write, &map.grid, &rules, &mut rng);

        prop_assert_eq!(
            total(&write) + report.decayed + report.saturated,
            total(&map.counts)
        );
    }

    #[test]
    fn test_parallel_mass_balances(map in arb_map(MAX_COUNT), seed in any::<u64>()) {
        let scratch: Vec<AtomicU32> = (0..map.grid.size()).map(|_| AtomicU32::new(0)).collect();
        let mut write = vec![TileState::default(); map.grid.size()];
        let report = tick_parallel(
            &map.tiles, &map.counts, &mut write, &map.grid, &TransportRules::default(), seed, &scratch,
        );
        prop_assert_eq!(total(&write) + report.saturated, total(&map.counts));

        let mut again = vec![TileState::default(); map.grid.size()];
        tick_parallel(
            &map.tiles, &map.counts, &mut again, &map.grid, &TransportRules::default(), seed, &scratch,
        );
        prop_assert_eq!(write, again);
    }

    #[test]
    fn test_tick_is_deterministic_for_seed(map in arb_map(300), seed in any::<u64>()) {
        let run = || {
            let mut write = vec![TileState::default(); map.grid.size()];
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            tick(&map.tiles, &map.counts, &mut write, &map.grid, &TransportRules::default(), &mut rng);
            write
        };
        prop_assert_eq!(run(), run());
    }

    #[test]
    fn test_masks_point_strictly_downhill_and_in_bounds(map in arb_map(0)) {
        for (i, tile) in map.tiles.iter().enumerate() {
            for dir in Direction::ALL {
                let neighbor = map.grid.neighbor_index(i, dir);
                let lower = neighbor.is_some_and(|n| map.tiles[n].height < tile.height);
                prop_assert_eq!(tile.flow_mask.contains(dir), lower,
                    "tile {} direction {:?}", i, dir);
            }
        }
    }

    #[test]
    fn test_neighbors_are_symmetric((w, h) in arb_dims(), pick in any::<prop::sample::Index>()) {
        let grid = HexGridSize::new(w, h).unwrap();
        let i = pick.index(grid.size());
        prop_assert_eq!(grid.coord_to_index(grid.index_to_coord(i)), Some(i));
        for (dir, n) in grid.neighbors(i) {
            prop_assert_eq!(grid.neighbor_index(n, dir.opposite()), Some(i));
            prop_assert_eq!(grid.is_neighbor(i, n), Some(dir));
        }
    }

    #[test]
    fn test_injection_never_wraps(amounts in prop::collection::vec(any::<u16>(), 1..40)) {
        let mut states = vec![TileState::default()];
        let mut expected = 0u64;
        for amount in amounts {
            let landed = add_phosphorus(&mut states, 0, amount);
            expected = (expected + amount as u64).min(MAX_COUNT as u64);
            prop_assert!(landed <= amount);
            prop_assert_eq!(states[0].count as u64, expected);
        }
    }
}
