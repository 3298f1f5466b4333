//! Obstacle spawning

use glam::Vec3;
use rand::Rng;

use super::game::Game;
use super::state::{GamePhase, Obstacle};
use crate::catalog::WasteType;
use crate::consts::OBSTACLE_Y;
use crate::lane_x;
use crate::world::clear_of_stations;

impl Game {
    /// Whether enough distance has passed since the last spawn. Claims the
    /// spawn slot (moves the spawn mark) when it returns true. Never true
    /// outside an active run.
    pub fn should_spawn_obstacle(&mut self) -> bool {
        if !self.session.phase.is_active() {
            return false;
        }
        let tutorial = self.session.phase == GamePhase::Tutorial;
        if self.session.obstacles.len() >= self.tuning.max_obstacles(tutorial) {
            return false;
        }
        let since = self.session.distance_traveled - self.session.last_spawn_distance;
        if since < self.tuning.spawn_interval(tutorial) {
            return false;
        }
        self.session.last_spawn_distance = self.session.distance_traveled;
        true
    }

    /// Place a random obstacle ahead of the player, away from any station
    pub fn spawn_obstacle(&mut self) -> u32 {
        let trash_type = WasteType::ALL[self.rng.random_range(0..WasteType::ALL.len())];
        let lane = self.rng.random_range(0..WasteType::ALL.len());
        let (min, max) = (self.tuning.spawn_ahead_min, self.tuning.spawn_ahead_max);
        let ahead = min + self.rng.random::<f32>() * (max - min).max(0.0);
        let z = clear_of_stations(
            self.session.player_position.z + ahead,
            self.tuning.station_interval,
            self.tuning.station_buffer,
        );

        let id = self.session.next_obstacle_id();
        self.session.obstacles.push(Obstacle {
            id,
            trash_type,
            position: Vec3::new(lane_x(lane), OBSTACLE_Y, z),
            lane,
        });
        log::trace!(
            "Spawned obstacle {} ({}) in lane {} at z={:.1}",
            id,
            trash_type.as_str(),
            lane,
            z
        );
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::world::nearest_station;
    use proptest::prelude::*;

    fn game_in(phase: GamePhase) -> Game {
        let mut game = Game::new(Box::new(MemoryStore::new()), 11);
        match phase {
            GamePhase::Tutorial => game.start_tutorial(),
            _ => game.start_game(),
        }
        game
    }

    #[test]
    fn test_spawn_interval() {
        let mut game = game_in(GamePhase::Playing);
        game.session.distance_traveled = 7.9;
        assert!(!game.should_spawn_obstacle());
        game.session.distance_traveled = 8.0;
        assert!(game.should_spawn_obstacle());
        assert_eq!(game.session().last_spawn_distance, 8.0);
        assert!(!game.should_spawn_obstacle());
    }

    #[test]
    fn test_tutorial_spawns_sparser() {
        let mut game = game_in(GamePhase::Tutorial);
        game.session.distance_traveled = 10.0;
        assert!(!game.should_spawn_obstacle());
        game.session.distance_traveled = 12.0;
        assert!(game.should_spawn_obstacle());
    }

    #[test]
    fn test_no_spawn_outside_run() {
        let mut game = game_in(GamePhase::Playing);
        game.toggle_pause();
        game.session.distance_traveled = 20.0;
        assert!(!game.should_spawn_obstacle());
        assert_eq!(game.session().last_spawn_distance, 0.0);

        game.toggle_pause();
        game.end_game();
        assert!(!game.should_spawn_obstacle());
    }

    #[test]
    fn test_obstacle_cap() {
        let mut game = game_in(GamePhase::Tutorial);
        for _ in 0..8 {
            game.spawn_obstacle();
        }
        game.session.distance_traveled = 500.0;
        assert!(!game.should_spawn_obstacle());
        assert_eq!(game.session().last_spawn_distance, 0.0);
    }

    #[test]
    fn test_spawn_places_ahead_in_lane() {
        let mut game = game_in(GamePhase::Playing);
        let first = game.spawn_obstacle();
        let second = game.spawn_obstacle();
        assert!(second > first);
        for obstacle in &game.session().obstacles {
            assert_eq!(obstacle.position.x, lane_x(obstacle.lane));
            assert_eq!(obstacle.position.y, 0.3);
            assert!(obstacle.position.z >= 10.0);
        }
    }

    proptest! {
        #[test]
        fn test_obstacles_avoid_stations(seed in any::<u64>(), z in 0.0f32..2000.0) {
            let mut game = Game::new(Box::new(MemoryStore::new()), seed);
            game.start_game();
            game.session.player_position.z = z;
            game.spawn_obstacle();
            let obstacle = &game.session().obstacles[0];
            let station = nearest_station(obstacle.position.z, 40.0);
            prop_assert!((obstacle.position.z - station).abs() >= 5.0 - 1e-3);
            prop_assert!(obstacle.position.z > z);
        }
    }
}
