//! Property-based tests using proptest
//!
//! - Normalization: idempotent and periodic in width and height
//! - Template rotation: whole turns are the identity
//! - Largest areas: size filter, ordering and reproducibility
//!
//! Laid out like procedural-core's tests/property_tests.rs; unit tests stay
//! in `#[cfg(test)]` modules next to the code.

use proptest::prelude::*;

use region_sculptor::regions::Template;
use region_sculptor::WorldGrid;

fn template_strategy() -> impl Strategy<Value = Vec<Vec<u8>>> {
    (1usize..8, 1usize..8).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(prop::collection::vec(0u8..6, cols), rows)
    })
}

fn land_mask_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::collection::vec(any::<bool>(), 12).prop_map(|row| {
            row.into_iter().map(|land| if land { '.' } else { '~' }).collect::<String>()
        }),
        12,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_normalize_is_idempotent(w in 1usize..40, h in 1usize..40, x in -500i32..500, y in -500i32..500) {
        let grid = WorldGrid::new(w, h);
        let (nx, ny) = grid.normalize(x, y);
        prop_assert!(nx < w && ny < h);
        prop_assert_eq!(grid.normalize(nx as i32, ny as i32), (nx, ny));
    }

    #[test]
    fn prop_normalize_is_periodic(w in 1usize..40, h in 1usize..40, x in -500i32..500, y in -500i32..500, k in -3i32..3) {
        let grid = WorldGrid::new(w, h);
        let base = grid.normalize(x, y);
        prop_assert_eq!(grid.normalize(x + k * w as i32, y), base);
        prop_assert_eq!(grid.normalize(x, y + k * h as i32), base);
    }

    #[test]
    fn prop_whole_turns_are_identity(rows in template_strategy(), k in 0u32..4) {
        let refs: Vec<&[u8]> = rows.iter().map(|r| r.as_slice()).collect();
        let template = Template::from_rows(&refs);
        prop_assert_eq!(template.rotate(4 * k), template.clone());
    }

    #[test]
    fn prop_rotation_swaps_dimensions(rows in template_strategy()) {
        let refs: Vec<&[u8]> = rows.iter().map(|r| r.as_slice()).collect();
        let template = Template::from_rows(&refs);
        let turned = template.rotate(1);
        prop_assert_eq!(turned.rows(), template.cols());
        prop_assert_eq!(turned.cols(), template.rows());
    }

    #[test]
    fn prop_largest_areas_filtered_and_sorted(mask in land_mask_strategy(), n in 1usize..5, min in 1usize..20) {
        let refs: Vec<&str> = mask.iter().map(|s| s.as_str()).collect();
        let mut grid = WorldGrid::from_ascii(&refs);
        let areas = grid.largest_areas(n, &[], min);
        prop_assert!(areas.len() <= n);
        for area in &areas {
            prop_assert!(!area.is_water);
            prop_assert!(area.tile_count() >= min);
        }
        for pair in areas.windows(2) {
            prop_assert!(pair[0].tile_count() >= pair[1].tile_count());
        }
        prop_assert_eq!(grid.largest_areas(n, &[], min), areas);
    }
}

#[test]
fn test_single_turn_transposes() {
    let template = Template::from_rows(&[&[1, 2], &[3, 4]]);
    assert_eq!(template.rotate(1), Template::from_rows(&[&[1, 3], &[2, 4]]));
}
