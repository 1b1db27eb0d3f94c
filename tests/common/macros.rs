/// Asserts the active buffer holds exactly `$total` units.
#[macro_export]
macro_rules! assert_total {
    ($sim:expr, $total:expr) => {
        assert_eq!(
            $sim.total_phosphorus(),
            $total as u64,
            "Phosphorus total mismatch at tick {}",
            $sim.current_tick()
        );
    };
}

/// Asserts the active counts equal the given list.
#[macro_export]
macro_rules! assert_counts {
    ($sim:expr, [$($c:expr),* $(,)?]) => {
        let actual: Vec<u16> = $sim.counts().iter().map(|s| s.count).collect();
        assert_eq!(actual, vec![$($c as u16),*], "Counts mismatch at tick {}", $sim.current_tick());
    };
}

/// Asserts every tile of `$mask_owner` only points at strictly lower neighbors.
#[macro_export]
macro_rules! assert_downhill {
    ($tiles:expr, $grid:expr) => {
        for (i, tile) in $tiles.iter().enumerate() {
            for dir in tile.flow_mask.iter() {
                let n = runoff_core::HexTopology::neighbor_index($grid, i, dir)
                    .expect("flow mask points off the map");
                assert!(
                    $tiles[n].height < tile.height,
                    "Tile {} flows {:?} to tile {} which is not lower",
                    i,
                    dir,
                    n
                );
            }
        }
    };
}
