//! Session state and core simulation types
//!
//! The session is owned by `Game` and only mutated through its transitions
//! and the per-frame update.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::timers::TimerId;
use crate::catalog::{WasteItem, WasteType};
use crate::consts::{MAX_LIVES, START_LANE};
use crate::economy::{GameTheme, PlayerSkin};
use crate::tutorial::TutorialStep;
use crate::tuning::Tuning;
use crate::world::ContainerPlacement;
use crate::{clamp_lane, lane_x};

/// Which subsystems are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Menu,
    Tutorial,
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    /// Phases in which the world advances and intents are accepted
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Tutorial)
    }
}

/// A piece of trash on the road that costs a life when run into
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    pub id: u32,
    pub trash_type: WasteType,
    pub position: Vec3,
    pub lane: usize,
}

/// Transient feedback shown to the player until its timer fires
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub text: String,
    pub timer: TimerId,
}

/// Notable things that happened, for audio and HUD effects
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Jump { auto: bool },
    Correct { points: u64, coins: u64 },
    Incorrect { expected: WasteType },
    Collision { obstacle: u32 },
    GameOver { score: u64, new_high_score: bool },
    Revived,
    TutorialCompleted,
}

/// Authoritative state of one run
#[derive(Debug, Clone)]
pub struct Session {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub combo: u32,

    pub player_position: Vec3,
    pub player_lane: usize,
    pub is_jumping: bool,
    /// Game-clock time the current jump started
    pub jump_start_time: f64,

    pub distance_traveled: f32,
    pub last_spawn_distance: f32,
    pub running_speed: f32,

    /// In spawn order
    pub obstacles: Vec<Obstacle>,
    pub current_waste_item: Option<&'static WasteItem>,
    pub message: Option<Feedback>,

    next_obstacle_id: u32,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Menu,
            score: 0,
            lives: MAX_LIVES,
            combo: 1,
            player_position: Vec3::new(lane_x(START_LANE), tuning.player_base_y, 0.0),
            player_lane: START_LANE,
            is_jumping: false,
            jump_start_time: 0.0,
            distance_traveled: 0.0,
            last_spawn_distance: 0.0,
            running_speed: tuning.initial_running_speed,
            obstacles: Vec::new(),
            current_waste_item: None,
            message: None,
            next_obstacle_id: 1,
        }
    }

    /// Reset everything run-specific, keeping the phase
    pub fn reset_run(&mut self, tuning: &Tuning) {
        let phase = self.phase;
        *self = Self::new(tuning);
        self.phase = phase;
    }

    /// Move to a lane (clamped). The only path that sets the player's x.
    pub fn set_lane(&mut self, lane: i64) -> usize {
        self.player_lane = clamp_lane(lane);
        self.player_position.x = lane_x(self.player_lane);
        self.player_lane
    }

    /// Allocate an obstacle id (strictly increasing within a run)
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_obstacle_id;
        self.next_obstacle_id += 1;
        id
    }

    pub fn message_text(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }
}

/// Read-only view of everything rendering, HUD and audio need
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub coins: u64,
    pub combo: u32,
    pub high_score: u64,
    pub player_position: Vec3,
    pub player_lane: usize,
    pub is_jumping: bool,
    pub distance_traveled: f32,
    pub running_speed: f32,
    pub obstacles: Vec<Obstacle>,
    pub current_waste_item: Option<&'static WasteItem>,
    pub message: Option<String>,
    pub tutorial_step: Option<&'static TutorialStep>,
    pub tutorial_index: usize,
    pub tutorial_completed: bool,
    pub coin_multiplier: u64,
    pub stations: Vec<ContainerPlacement>,
    pub theme: &'static GameTheme,
    pub skin: &'static PlayerSkin,
    pub owned_themes: Vec<String>,
    pub owned_skins: Vec<String>,
}
