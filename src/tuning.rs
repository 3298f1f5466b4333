//! Data-driven game balance
//!
//! Every field has a default matching `consts`, so a partial JSON override
//! only needs to name what it changes. Persisted separately from progress.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{self, KeyValueStore, keys};

/// Balance values for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Running ===
    pub initial_running_speed: f32,
    pub max_running_speed: f32,
    /// Additive speed gain per second
    pub running_acceleration: f32,

    // === Jumping ===
    pub jump_duration: f32,
    pub jump_height: f32,
    pub player_base_y: f32,
    /// Auto-jump lookahead before a station
    pub auto_jump_distance: f32,
    /// Window before a station where a manual jump is accepted by the input layer
    pub manual_jump_distance: f32,

    // === Stations & obstacles ===
    pub station_interval: f32,
    pub station_buffer: f32,
    /// Max |dx| for an obstacle to share the player's lane
    pub collision_lane_tolerance: f32,
    /// Max |dz| for an obstacle to touch the player
    pub collision_depth_tolerance: f32,
    /// Obstacles further than this behind the player are dropped
    pub cleanup_distance: f32,
    pub spawn_interval_playing: f32,
    pub spawn_interval_tutorial: f32,
    pub max_obstacles_playing: usize,
    pub max_obstacles_tutorial: usize,
    pub spawn_ahead_min: f32,
    pub spawn_ahead_max: f32,

    // === Rewards ===
    pub points_per_combo: u64,
    pub coins_per_correct: u64,
    pub max_combo: u32,
    pub revive_cost: u64,

    // === Timers (seconds) ===
    pub message_duration: f64,
    pub tutorial_message_duration: f64,
    pub game_over_delay: f64,
    pub classify_delay: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_running_speed: INITIAL_RUNNING_SPEED,
            max_running_speed: MAX_RUNNING_SPEED,
            running_acceleration: RUNNING_ACCELERATION,

            jump_duration: JUMP_DURATION,
            jump_height: JUMP_HEIGHT,
            player_base_y: PLAYER_BASE_Y,
            auto_jump_distance: AUTO_JUMP_DISTANCE,
            manual_jump_distance: 8.0,

            station_interval: STATION_INTERVAL,
            station_buffer: STATION_BUFFER,
            collision_lane_tolerance: 0.5,
            collision_depth_tolerance: 1.0,
            cleanup_distance: 5.0,
            spawn_interval_playing: 8.0,
            spawn_interval_tutorial: 12.0,
            max_obstacles_playing: 15,
            max_obstacles_tutorial: 8,
            spawn_ahead_min: 10.0,
            spawn_ahead_max: 20.0,

            points_per_combo: 10,
            coins_per_correct: 10,
            max_combo: MAX_COMBO,
            revive_cost: REVIVAL_COST,

            message_duration: 2.0,
            tutorial_message_duration: 3.0,
            game_over_delay: 0.1,
            classify_delay: 0.01,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load tuning from storage, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let tuning: Self = persistence::load_json(store, keys::TUNING, Self::default);
        if tuning != Self::default() {
            log::info!("Loaded custom tuning");
        }
        tuning
    }

    /// Save tuning to storage (best effort)
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        persistence::save_json(store, keys::TUNING, self);
    }

    /// Obstacle spawn gap for the given mode
    pub fn spawn_interval(&self, tutorial: bool) -> f32 {
        if tutorial {
            self.spawn_interval_tutorial
        } else {
            self.spawn_interval_playing
        }
    }

    /// Obstacle cap for the given mode
    pub fn max_obstacles(&self, tutorial: bool) -> usize {
        if tutorial {
            self.max_obstacles_tutorial
        } else {
            self.max_obstacles_playing
        }
    }
}
