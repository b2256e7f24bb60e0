//! Obstacle scrolling, spawning and retirement
//!
//! Obstacles spawn at the right edge every `spawn_interval` ticks with a gap
//! at a uniformly random height, scroll left at a constant speed, and are
//! dropped once their trailing edge leaves the playfield.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::config::SimConfig;
use super::state::Obstacle;

/// Seeded source of new obstacles
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    rng: Pcg32,
    next_id: u32,
}

impl ObstacleGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Spawn one obstacle at the right edge, gap top in `[0, height / 2)`
    pub fn spawn(&mut self, config: &SimConfig) -> Obstacle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        let top_height = self.rng.random_range(0.0..config.bounds_height / 2.0);
        Obstacle::new(id, config.bounds_width, top_height, config)
    }

    /// Scroll, spawn on schedule, retire off-screen obstacles
    ///
    /// `frame` is the tick count before this tick's increment, so the first
    /// tick of a run (frame 0) spawns.
    pub fn tick(
        &mut self,
        frame: u64,
        mut obstacles: Vec<Obstacle>,
        config: &SimConfig,
    ) -> Vec<Obstacle> {
        for obstacle in &mut obstacles {
            obstacle.x -= config.scroll_speed;
        }

        if frame % config.spawn_interval == 0 {
            let obstacle = self.spawn(config);
            log::debug!(
                "Spawned obstacle {} at frame {} (top {:.1}, bottom {:.1})",
                obstacle.id,
                frame,
                obstacle.top_height,
                obstacle.bottom_height
            );
            obstacles.push(obstacle);
        }

        obstacles.retain(|o| {
            let keep = !o.is_offscreen();
            if !keep {
                log::debug!("Retired obstacle {}", o.id);
            }
            keep
        });
        obstacles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawns_on_interval_only() {
        let config = SimConfig::default();
        let mut generator = ObstacleGenerator::new(42);
        let mut obstacles = Vec::new();
        let mut spawn_frames = Vec::new();
        let mut last_id = 0;

        for frame in 0..=450 {
            obstacles = generator.tick(frame, obstacles, &config);
            if let Some(newest) = obstacles.last().filter(|o| o.id > last_id) {
                last_id = newest.id;
                spawn_frames.push(frame);
            }
        }

        assert_eq!(spawn_frames, vec![0, 150, 300, 450]);
    }

    #[test]
    fn test_spawn_at_right_edge() {
        let config = SimConfig::default();
        let mut generator = ObstacleGenerator::new(1);
        let obstacles = generator.tick(0, Vec::new(), &config);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].x, config.bounds_width);
        assert_eq!(obstacles[0].width, config.obstacle_width);
        assert!(!obstacles[0].passed);
    }

    #[test]
    fn test_scrolls_existing_obstacles() {
        let config = SimConfig::default();
        let mut generator = ObstacleGenerator::new(1);
        let obstacles = vec![Obstacle::new(99, 100.0, 10.0, &config)];
        let obstacles = generator.tick(1, obstacles, &config);
        assert_eq!(obstacles[0].x, 98.0);
    }

    #[test]
    fn test_retires_after_trailing_edge_leaves() {
        let config = SimConfig::default();
        let mut generator = ObstacleGenerator::new(1);

        // Trailing edge lands exactly on 0: still kept
        let obstacles = vec![Obstacle::new(1, -28.0, 10.0, &config)];
        let obstacles = generator.tick(1, obstacles, &config);
        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles[0].right(), 0.0);

        // One more tick: gone
        let obstacles = generator.tick(2, obstacles, &config);
        assert!(obstacles.is_empty());
    }

    #[test]
    fn test_retire_keeps_others_in_order() {
        let config = SimConfig::default();
        let mut generator = ObstacleGenerator::new(1);
        let obstacles = vec![
            Obstacle::new(1, -40.0, 10.0, &config),
            Obstacle::new(2, 120.0, 10.0, &config),
            Obstacle::new(3, 270.0, 10.0, &config),
        ];
        let obstacles = generator.tick(1, obstacles, &config);
        let ids: Vec<u32> = obstacles.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let config = SimConfig::default();
        let mut a = ObstacleGenerator::new(2024);
        let mut b = ObstacleGenerator::new(2024);
        for _ in 0..10 {
            assert_eq!(a.spawn(&config), b.spawn(&config));
        }
    }

    #[test]
    fn test_crossing_time() {
        // Narrow obstacle so the trailing edge is negative one tick after x reaches 0
        let config = SimConfig {
            obstacle_width: 1.0,
            spawn_interval: 1000,
            ..Default::default()
        };
        let mut generator = ObstacleGenerator::new(3);
        let mut obstacles = generator.tick(0, Vec::new(), &config);
        let ticks = (config.bounds_width / config.scroll_speed) as u64;
        for frame in 1..=ticks {
            obstacles = generator.tick(frame, obstacles, &config);
        }
        assert_eq!(obstacles.len(), 1);
        assert!(obstacles[0].x.abs() < 1e-3);

        obstacles = generator.tick(ticks + 1, obstacles, &config);
        assert!(obstacles.is_empty());
        assert_eq!(config.crossing_ticks().ceil() as u64, ticks + 1);
    }

    proptest! {
        #[test]
        fn prop_spawn_geometry(seed in any::<u64>()) {
            let config = SimConfig::default();
            let mut generator = ObstacleGenerator::new(seed);
            for _ in 0..20 {
                let o = generator.spawn(&config);
                prop_assert!(o.top_height >= 0.0);
                prop_assert!(o.top_height < config.bounds_height / 2.0);
                let total = o.top_height + config.gap_size + o.bottom_height;
                prop_assert!((total - config.bounds_height).abs() < 1e-3);
            }
        }
    }
}
