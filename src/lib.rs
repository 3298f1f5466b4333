//! EcoRunner - an endless runner where the player sorts waste into lanes
//!
//! Core modules:
//! - `sim`: Authoritative game session, state machine and per-frame update
//! - `world`: Deterministic chunk generation and container station placement
//! - `catalog`: Waste items and their correct containers
//! - `economy`: Coins, high score, power-ups, promo codes, skins and themes
//! - `tutorial`: Ordered tutorial steps gating player actions
//! - `persistence`: Opaque key-value storage with default fallback
//! - `tuning`: Data-driven game balance

pub mod catalog;
pub mod economy;
pub mod persistence;
pub mod sim;
pub mod tuning;
pub mod tutorial;
pub mod world;

pub use catalog::{WasteItem, WasteType};
pub use sim::{Game, GamePhase, Snapshot, TickInput, tick};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Max simulation steps per rendered frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Number of lanes (glass, organic, paper, plastic)
    pub const LANE_COUNT: usize = 4;
    /// World x position of each lane
    pub const LANE_POSITIONS: [f32; LANE_COUNT] = [-3.0, -1.0, 1.0, 3.0];
    /// Lane the player starts in (organic)
    pub const START_LANE: usize = 1;

    /// Player resting height
    pub const PLAYER_BASE_Y: f32 = 0.5;
    /// Jump arc duration (seconds)
    pub const JUMP_DURATION: f32 = 0.8;
    /// Jump apex above base height
    pub const JUMP_HEIGHT: f32 = 2.0;

    /// Running speed at the start of a run (units/s)
    pub const INITIAL_RUNNING_SPEED: f32 = 5.0;
    /// Hard cap on running speed (units/s)
    pub const MAX_RUNNING_SPEED: f32 = 12.0;
    /// Additive speed increase (units/s per second)
    pub const RUNNING_ACCELERATION: f32 = 0.2;

    pub const MAX_LIVES: u32 = 3;
    pub const MAX_COMBO: u32 = 5;

    /// Distance between classification stations
    pub const STATION_INTERVAL: f32 = 40.0;
    /// Auto-jump fires when the next station is this close
    pub const AUTO_JUMP_DISTANCE: f32 = 3.0;
    /// Obstacles never spawn this close to a station
    pub const STATION_BUFFER: f32 = 5.0;

    /// Obstacle height above the road
    pub const OBSTACLE_Y: f32 = 0.3;

    /// Coins required to revive after game over
    pub const REVIVAL_COST: u64 = 150;
    /// Coin balance when nothing has been saved yet
    pub const DEFAULT_COINS: u64 = 10;

    /// Length of a terrain chunk along z
    pub const CHUNK_SIZE: f32 = 30.0;
    /// Distance ahead of the player that chunks are kept for
    pub const RENDER_DISTANCE: f32 = 120.0;
    /// Chunks kept behind the player's chunk
    pub const CHUNKS_BEHIND: i64 = 2;
}

use consts::{LANE_COUNT, LANE_POSITIONS};

/// Clamp any lane index into the valid range
#[inline]
pub fn clamp_lane(lane: i64) -> usize {
    lane.clamp(0, LANE_COUNT as i64 - 1) as usize
}

/// World x position for a lane (clamped)
#[inline]
pub fn lane_x(lane: usize) -> f32 {
    LANE_POSITIONS[lane.min(LANE_COUNT - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_lane() {
        assert_eq!(clamp_lane(-4), 0);
        assert_eq!(clamp_lane(2), 2);
        assert_eq!(clamp_lane(9), 3);
    }

    #[test]
    fn test_lane_x() {
        assert_eq!(lane_x(0), -3.0);
        assert_eq!(lane_x(3), 3.0);
        assert_eq!(lane_x(42), 3.0);
    }
}
