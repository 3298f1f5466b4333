//! Per-frame simulation update
//!
//! A frame first runs deferred effects that fell due, then applies the
//! frame's intents, then advances the world. The world update computes the
//! whole next state before writing any of it back.

use std::f32::consts::PI;

use super::game::Game;
use super::state::GameEvent;
use crate::lane_x;
use crate::world::approaching_station;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump straight to a lane (pointer/touch)
    pub lane: Option<i64>,
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    /// Pause toggle
    pub pause: bool,
    /// Skip to the next tutorial step
    pub continue_tutorial: bool,
}

/// Advance the game by one frame of `dt` seconds
pub fn tick(game: &mut Game, input: &TickInput, dt: f32) {
    game.advance_clock(dt);

    if input.pause {
        game.toggle_pause();
    }

    game.run_due_effects();

    if game.phase().is_active() {
        if let Some(lane) = input.lane {
            game.set_lane(lane);
        }
        if input.move_left {
            game.move_left();
        }
        if input.move_right {
            game.move_right();
        }
        if input.jump {
            game.jump();
        }
        if input.continue_tutorial {
            game.next_tutorial_step();
        }

        // Intents above can leave the run (finishing the tutorial)
        game.update_game(dt);
        if game.phase().is_active() && game.should_spawn_obstacle() {
            game.spawn_obstacle();
        }
    }

    game.update_world();
}

impl Game {
    /// Move the run forward by `delta` seconds: running, jump arc, automatic
    /// jumps at stations, obstacle collisions and cleanup
    pub fn update_game(&mut self, delta: f32) {
        if !self.session.phase.is_active() {
            return;
        }
        let delta = delta.max(0.0);
        let t = &self.tuning;
        let s = &self.session;

        let forward = s.running_speed * delta;
        let distance = s.distance_traveled + forward;
        let z = s.player_position.z + forward;
        let speed = (s.running_speed + t.running_acceleration * delta).min(t.max_running_speed);

        let mut y = s.player_position.y;
        let mut is_jumping = s.is_jumping;
        if is_jumping {
            let elapsed = (self.clock - s.jump_start_time) as f32;
            let fraction = elapsed / t.jump_duration;
            if fraction >= 1.0 {
                is_jumping = false;
                y = t.player_base_y;
            } else {
                y = t.player_base_y + t.jump_height * (PI * fraction.max(0.0)).sin();
            }
        }

        let auto_jump =
            !is_jumping && approaching_station(z, t.station_interval, t.auto_jump_distance);
        if auto_jump {
            is_jumping = true;
        }

        let player_x = lane_x(s.player_lane);
        let hit = if is_jumping {
            None
        } else {
            s.obstacles.iter().position(|o| {
                (o.position.x - player_x).abs() <= t.collision_lane_tolerance
                    && (o.position.z - z).abs() <= t.collision_depth_tolerance
            })
        };
        let cleanup_z = z - t.cleanup_distance;

        // Commit
        let s = &mut self.session;
        s.distance_traveled = distance;
        s.running_speed = speed;
        s.player_position.x = player_x;
        s.player_position.y = y;
        s.player_position.z = z;
        s.is_jumping = is_jumping;
        if auto_jump {
            s.jump_start_time = self.clock;
        }
        let collided = hit.map(|i| s.obstacles.remove(i));
        if collided.is_some() {
            s.lives = s.lives.saturating_sub(1);
            s.combo = 1;
        }
        s.obstacles.retain(|o| o.position.z > cleanup_z);
        let lives = s.lives;

        if auto_jump {
            log::debug!("Auto-jump at z={:.1}", z);
            self.events.push(GameEvent::Jump { auto: true });
            self.schedule_classify();
        }
        if let Some(obstacle) = collided {
            log::debug!("Hit obstacle {} at z={:.1}, {} lives left", obstacle.id, z, lives);
            self.events.push(GameEvent::Collision {
                obstacle: obstacle.id,
            });
            self.flash(format!("Ouch! You ran into {} trash", obstacle.trash_type.as_str()));
            if lives == 0 {
                self.schedule_game_over();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{WasteType, find_item};
    use crate::persistence::MemoryStore;
    use crate::sim::state::Obstacle;
    use crate::sim::GamePhase;
    use glam::Vec3;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn playing() -> Game {
        let mut game = Game::new(Box::new(MemoryStore::new()), 5);
        game.start_game();
        game
    }

    fn place_obstacle(game: &mut Game, lane: usize, z: f32) -> u32 {
        let id = game.session.next_obstacle_id();
        game.session.obstacles.push(Obstacle {
            id,
            trash_type: WasteType::Paper,
            position: Vec3::new(lane_x(lane), 0.3, z),
            lane,
        });
        id
    }

    #[test]
    fn test_runs_forward_and_accelerates() {
        let mut game = playing();
        game.update_game(1.0);
        let s = game.session();
        assert_eq!(s.distance_traveled, 5.0);
        assert_eq!(s.player_position.z, 5.0);
        assert!((s.running_speed - 5.2).abs() < 1e-5);
    }

    #[test]
    fn test_speed_caps() {
        let mut game = playing();
        game.session.running_speed = 11.99;
        game.update_game(1.0);
        assert_eq!(game.session().running_speed, 12.0);
    }

    #[test]
    fn test_no_update_outside_run() {
        let mut game = playing();
        game.toggle_pause();
        game.update_game(1.0);
        assert_eq!(game.session().distance_traveled, 0.0);
    }

    #[test]
    fn test_jump_arc_and_landing() {
        let mut game = playing();
        game.jump();
        game.advance_clock(0.4);
        game.update_game(0.0);
        assert!((game.session().player_position.y - 2.5).abs() < 1e-4);
        assert!(game.session().is_jumping);

        game.advance_clock(0.4);
        game.update_game(0.0);
        assert_eq!(game.session().player_position.y, 0.5);
        assert!(!game.session().is_jumping);
    }

    #[test]
    fn test_auto_jump_near_station() {
        let mut game = playing();
        let item = find_item("soda-can").unwrap();
        game.session.current_waste_item = Some(item);
        game.session.set_lane(item.correct_container.lane() as i64);
        game.session.player_position.z = 36.5;
        game.session.distance_traveled = 36.5;

        game.update_game(0.1);
        assert!(game.session().is_jumping);
        assert!(game.pending_classify.is_some());
        assert_eq!(game.session().score, 0, "classification is deferred");

        game.advance_clock(0.02);
        game.run_due_effects();
        assert_eq!(game.session().score, 10);
    }

    #[test]
    fn test_no_auto_jump_on_station() {
        let mut game = playing();
        game.session.running_speed = 2.0;
        game.session.player_position.z = 38.0;
        game.update_game(1.0);
        assert_eq!(game.session().player_position.z, 40.0);
        assert!(!game.session().is_jumping);
    }

    #[test]
    fn test_collision_costs_life() {
        let mut game = playing();
        game.session.combo = 3;
        let id = place_obstacle(&mut game, 1, 0.8);
        game.update_game(DT);
        let s = game.session();
        assert_eq!(s.lives, 2);
        assert_eq!(s.combo, 1);
        assert!(s.obstacles.iter().all(|o| o.id != id));
        assert!(game.session().message.is_some());
    }

    #[test]
    fn test_one_collision_per_frame() {
        let mut game = playing();
        place_obstacle(&mut game, 1, 0.5);
        place_obstacle(&mut game, 1, 0.9);
        game.update_game(DT);
        assert_eq!(game.session().lives, 2);
        assert_eq!(game.session().obstacles.len(), 1);
    }

    #[test]
    fn test_other_lane_and_jump_pass() {
        let mut game = playing();
        place_obstacle(&mut game, 2, 0.5);
        game.update_game(DT);
        assert_eq!(game.session().lives, 3);

        place_obstacle(&mut game, 1, 0.5);
        game.session.is_jumping = true;
        game.session.jump_start_time = game.clock();
        game.update_game(DT);
        assert_eq!(game.session().lives, 3);
    }

    #[test]
    fn test_cleanup_behind_player() {
        let mut game = playing();
        game.session.player_position.z = 20.0;
        place_obstacle(&mut game, 3, 14.0);
        place_obstacle(&mut game, 3, 16.0);
        game.update_game(DT);
        assert_eq!(game.session().obstacles.len(), 1);
        assert_eq!(game.session().obstacles[0].position.z, 16.0);
    }

    #[test]
    fn test_game_over_scheduled_once() {
        let mut game = playing();
        game.session.lives = 1;
        let item = find_item("apple-core").unwrap();
        game.session.current_waste_item = Some(item);
        game.session.set_lane(0);

        // Life lost to a wrong classification and then to a collision
        game.jump();
        game.session.is_jumping = false;
        place_obstacle(&mut game, 0, 0.1);
        game.update_game(0.0);
        assert_eq!(game.session().lives, 0);
        assert_eq!(game.scheduler.len(), 2, "one message timer, one game over");

        game.advance_clock(0.2);
        game.run_due_effects();
        game.end_game();
        assert_eq!(game.phase(), GamePhase::GameOver);
        let game_overs = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_tick_spawns_obstacles() {
        let mut game = playing();
        let input = TickInput::default();
        for _ in 0..120 {
            tick(&mut game, &input, DT);
        }
        // 2 s at ~5.2 units/s crosses the 8 unit spawn gap once
        assert_eq!(game.session().obstacles.len(), 1);
        assert_eq!(game.session().obstacles[0].id, 1);
        assert!(game.session().last_spawn_distance >= 8.0);
    }

    #[test]
    fn test_finishing_tutorial_does_not_spawn() {
        let mut game = Game::new(Box::new(MemoryStore::new()), 9);
        game.start_tutorial();
        for _ in 0..5 {
            game.next_tutorial_step();
        }
        assert_eq!(game.tutorial().current().map(|s| s.id), Some("classification"));
        game.session.obstacles.clear();
        game.session.distance_traveled = 20.0;

        let finish = TickInput {
            continue_tutorial: true,
            ..Default::default()
        };
        tick(&mut game, &finish, DT);
        assert_eq!(game.phase(), GamePhase::Menu);
        assert!(game.session().obstacles.is_empty());
        assert_eq!(game.session().last_spawn_distance, 0.0);
    }

    #[test]
    fn test_restart_cancels_deferred_effects() {
        let mut game = playing();
        game.session.lives = 0;
        game.schedule_game_over();
        game.schedule_classify();
        game.flash("Wrong container!");
        assert_eq!(game.scheduler.len(), 3);

        game.restart_game();
        assert!(game.scheduler.is_empty());
        assert!(game.pending_game_over.is_none());
        assert!(game.pending_classify.is_none());
        assert!(game.session().message.is_none());
        game.drain_events();

        let idle = TickInput::default();
        for _ in 0..180 {
            tick(&mut game, &idle, DT);
        }
        assert_eq!(game.phase(), GamePhase::Menu);
        assert_eq!(game.session().score, 0);
        assert_eq!(game.session().lives, 3);
        assert!(game.session().message.is_none());
        assert!(game.drain_events().is_empty());
        assert_eq!(game.wallet().high_score(), 0);
    }

    #[test]
    fn test_tick_pause_freezes_world() {
        let mut game = playing();
        tick(&mut game, &TickInput::default(), DT);
        let z = game.session().player_position.z;
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut game, &pause, DT);
        tick(&mut game, &TickInput::default(), DT);
        assert_eq!(game.phase(), GamePhase::Paused);
        assert_eq!(game.session().player_position.z, z);
        tick(&mut game, &pause, DT);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.session().player_position.z > z);
    }

    #[test]
    fn test_tick_intents() {
        let mut game = playing();
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        tick(&mut game, &input, DT);
        assert_eq!(game.session().player_lane, 2);
        let input = TickInput {
            lane: Some(0),
            jump: true,
            ..Default::default()
        };
        tick(&mut game, &input, DT);
        assert_eq!(game.session().player_lane, 0);
        assert!(game.session().is_jumping);
    }

    #[test]
    fn test_message_expires() {
        let mut game = playing();
        game.flash("hello");
        let input = TickInput::default();
        for _ in 0..119 {
            tick(&mut game, &input, DT);
        }
        assert!(game.session().message.is_some());
        for _ in 0..2 {
            tick(&mut game, &input, DT);
        }
        assert!(game.session().message.is_none());
    }

    #[test]
    fn test_tutorial_flow() {
        let mut game = Game::new(Box::new(MemoryStore::new()), 9);
        game.start_tutorial();
        let idle = TickInput::default();
        let step = |game: &Game| game.tutorial().current().map(|s| s.id);
        assert_eq!(step(&game), Some("welcome"));

        // Movement is ignored by steps without that goal
        game.move_left();
        tick(&mut game, &idle, 1.1);
        assert_eq!(step(&game), Some("welcome"));

        game.next_tutorial_step();
        assert_eq!(step(&game), Some("move-left"));
        game.move_left();
        tick(&mut game, &idle, 0.5);
        assert_eq!(step(&game), Some("move-left"));
        tick(&mut game, &idle, 0.6);
        assert_eq!(step(&game), Some("move-right"));

        game.move_right();
        tick(&mut game, &idle, 1.0);
        assert_eq!(step(&game), Some("jumping"));

        game.session.obstacles.clear();
        game.jump();
        tick(&mut game, &idle, 0.8);
        assert_eq!(step(&game), Some("trash-types"));

        game.next_tutorial_step();
        assert_eq!(step(&game), Some("classification"));
        let item = game.session().current_waste_item.unwrap();
        game.session.is_jumping = false;
        game.session.obstacles.clear();
        game.set_lane(item.correct_container.lane() as i64);
        game.jump();
        tick(&mut game, &idle, 1.0);

        assert_eq!(game.phase(), GamePhase::Menu);
        assert!(game.tutorial().is_completed());
        assert!(game.session().message_text().is_some_and(|m| m.starts_with("Tutorial complete")));
    }

    proptest! {
        #[test]
        fn test_distance_never_decreases(
            steps in prop::collection::vec((0.0f32..0.1, any::<bool>(), any::<bool>()), 1..200)
        ) {
            let mut game = playing();
            let mut last = 0.0;
            for (dt, left, jump) in steps {
                let input = TickInput {
                    move_left: left,
                    move_right: !left,
                    jump,
                    ..Default::default()
                };
                tick(&mut game, &input, dt);
                let s = game.session();
                prop_assert!(s.distance_traveled >= last);
                prop_assert!(s.player_lane < 4);
                prop_assert_eq!(s.player_position.x, lane_x(s.player_lane));
                prop_assert!(s.running_speed <= 12.0);
                prop_assert!(s.lives <= 3);
                prop_assert!((1..=5).contains(&s.combo));
                last = s.distance_traveled;
            }
        }
    }
}
