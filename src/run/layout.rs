//! Seeded placement of obstacles and collectibles.
//!
//! Obstacles sit in fixed-width horizontal bands with random jitter inside
//! each band. Collectibles use their own bands and re-roll their position
//! while it lands too close to an obstacle, up to `PLACEMENT_ATTEMPTS` times.

use super::config::LevelConfig;
use super::types::{Bounds, Collectible, Obstacle};
use rand::Rng;
use tracing::warn;

/// Collectibles closer than this (horizontally) to an obstacle are re-rolled.
pub const COLLECTIBLE_CLEARANCE: f64 = 100.0;

/// Re-roll budget for a single collectible. The last roll is kept when exhausted.
pub const PLACEMENT_ATTEMPTS: u32 = 10;

/// Lay out every obstacle for a new run.
pub(crate) fn place_obstacles<R: Rng>(config: &LevelConfig, rng: &mut R) -> Vec<Obstacle> {
    let layout = &config.obstacles;
    let top = config.obstacle_top();

    (0..layout.count)
        .map(|i| {
            let x = layout.first_x + i as f64 * layout.spacing + rng.gen::<f64>() * layout.jitter;
            Obstacle {
                bounds: Bounds::new(x, top, layout.width, layout.height),
            }
        })
        .collect()
}

/// True if `x` is horizontally too close to any obstacle's left edge.
fn crowds_obstacle(x: f64, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .any(|o| (o.bounds.x - x).abs() < COLLECTIBLE_CLEARANCE)
}

/// Lay out one collectible per catalog entry, in catalog order.
///
/// Nothing is placed without lane heights; `LevelConfig::validate` rejects
/// that combination for a non-empty catalog.
pub(crate) fn place_collectibles<R: Rng>(
    config: &LevelConfig,
    obstacles: &[Obstacle],
    rng: &mut R,
) -> Vec<Collectible> {
    let layout = &config.collectibles;
    if config.lane_heights.is_empty() {
        return Vec::new();
    }

    config
        .catalog
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let band_start = layout.first_x + i as f64 * layout.spacing;
            let mut attempts = 0;
            let x = loop {
                let x = band_start + rng.gen::<f64>() * layout.jitter;
                attempts += 1;
                if !crowds_obstacle(x, obstacles) || attempts >= PLACEMENT_ATTEMPTS {
                    break x;
                }
            };
            if crowds_obstacle(x, obstacles) {
                warn!(item = %entry.id, x, "collectible placed next to an obstacle after exhausting re-rolls");
            }

            let y = config.lane_heights[rng.gen_range(0..config.lane_heights.len())];

            Collectible {
                id: entry.id.clone(),
                label: entry.label.clone(),
                bounds: Bounds::new(x, y, layout.width, layout.height),
                collected: false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::catalog::CatalogEntry;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    #[test]
    fn test_obstacles_stay_in_their_bands() {
        let config = LevelConfig::default();
        let mut rng = create_test_rng();
        let obstacles = place_obstacles(&config, &mut rng);

        assert_eq!(obstacles.len(), 8);
        for (i, obstacle) in obstacles.iter().enumerate() {
            let band_start = 800.0 + i as f64 * 600.0;
            assert!(obstacle.bounds.x >= band_start);
            assert!(obstacle.bounds.x < band_start + 400.0);
            assert!((obstacle.bounds.y - config.obstacle_top()).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_obstacles_never_overlap() {
        let config = LevelConfig::default();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let obstacles = place_obstacles(&config, &mut rng);
            for pair in obstacles.windows(2) {
                assert!(pair[0].bounds.right() <= pair[1].bounds.x);
            }
        }
    }

    #[test]
    fn test_collectibles_follow_catalog_and_lanes() {
        let config = LevelConfig::default();
        let mut rng = create_test_rng();
        let obstacles = place_obstacles(&config, &mut rng);
        let items = place_collectibles(&config, &obstacles, &mut rng);

        assert_eq!(items.len(), config.catalog.len());
        for (i, (item, entry)) in items.iter().zip(&config.catalog).enumerate() {
            assert_eq!(item.id, entry.id);
            assert_eq!(item.label, entry.label);
            assert!(!item.collected);
            assert!(config.lane_heights.contains(&item.bounds.y));
            let band_start = 700.0 + i as f64 * 500.0;
            assert!(item.bounds.x >= band_start && item.bounds.x < band_start + 300.0);
        }
    }

    #[test]
    fn test_collectibles_avoid_obstacles_when_possible() {
        let config = LevelConfig::default();
        let mut rng = create_test_rng();
        let obstacles = vec![Obstacle {
            bounds: Bounds::new(650.0, 370.0, 140.0, 140.0),
        }];
        let items = place_collectibles(&config, &obstacles, &mut rng);

        // Only 700..750 of band 0 is crowded, so a re-roll clears it.
        assert!(!crowds_obstacle(items[0].bounds.x, &obstacles));
    }

    #[test]
    fn test_exhausted_attempts_keep_last_roll() {
        let mut config = LevelConfig::default();
        config.catalog = vec![CatalogEntry::new("only", "Only item")];
        config.collectibles.jitter = 50.0;
        let mut rng = create_test_rng();
        // The whole band 700..750 is within clearance of an obstacle at 720.
        let obstacles = vec![Obstacle {
            bounds: Bounds::new(720.0, 370.0, 140.0, 140.0),
        }];
        let items = place_collectibles(&config, &obstacles, &mut rng);

        assert_eq!(items.len(), 1);
        assert!(items[0].bounds.x >= 700.0 && items[0].bounds.x < 750.0);
    }

    #[test]
    fn test_blocked_band_uses_exactly_ten_rolls() {
        let mut config = LevelConfig::default();
        config.catalog = vec![CatalogEntry::new("only", "Only item")];
        config.collectibles.jitter = 50.0;
        let obstacles = vec![Obstacle {
            bounds: Bounds::new(720.0, 370.0, 140.0, 140.0),
        }];
        let mut rng = create_test_rng();
        let items = place_collectibles(&config, &obstacles, &mut rng);

        // Replay the same stream: ten x rolls, the last one kept, then the lane
        let mut expected = create_test_rng();
        let rolls: Vec<f64> = (0..10)
            .map(|_| 700.0 + expected.gen::<f64>() * 50.0)
            .collect();
        let lane = config.lane_heights[expected.gen_range(0..config.lane_heights.len())];

        assert_eq!(PLACEMENT_ATTEMPTS, 10);
        assert!(rolls.iter().all(|x| crowds_obstacle(*x, &obstacles)));
        assert!((items[0].bounds.x - rolls[9]).abs() < f64::EPSILON);
        assert!((items[0].bounds.y - lane).abs() < f64::EPSILON);
        // Both streams consumed the same number of draws
        assert_eq!(rng.gen::<u64>(), expected.gen::<u64>());
    }

    #[test]
    fn test_no_lanes_places_nothing() {
        let mut config = LevelConfig::default();
        config.lane_heights.clear();
        let mut rng = create_test_rng();

        assert!(place_collectibles(&config, &[], &mut rng).is_empty());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let config = LevelConfig::default();
        let mut rng1 = ChaCha8Rng::seed_from_u64(99);
        let mut rng2 = ChaCha8Rng::seed_from_u64(99);

        let obstacles1 = place_obstacles(&config, &mut rng1);
        let obstacles2 = place_obstacles(&config, &mut rng2);
        assert_eq!(obstacles1, obstacles2);

        let items1 = place_collectibles(&config, &obstacles1, &mut rng1);
        let items2 = place_collectibles(&config, &obstacles2, &mut rng2);
        assert_eq!(items1, items2);
    }

    #[test]
    fn test_zero_jitter_is_deterministic() {
        let mut config = LevelConfig::default();
        config.obstacles.jitter = 0.0;
        let mut rng = create_test_rng();
        let obstacles = place_obstacles(&config, &mut rng);
        assert!((obstacles[0].bounds.x - 800.0).abs() < f64::EPSILON);
        assert!((obstacles[3].bounds.x - 2600.0).abs() < f64::EPSILON);
    }
}
