//! Game simulation
//!
//! All gameplay logic lives here:
//! - One authoritative `Game` owns the session and progression
//! - Time only advances through `tick`, on the game clock
//! - Seeded RNG only, so a seed and an input stream replay the same run
//! - No rendering or platform dependencies

pub mod classify;
pub mod game;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timers;

pub use classify::Classification;
pub use game::Game;
pub use state::{Feedback, GameEvent, GamePhase, Obstacle, Session, Snapshot};
pub use tick::{TickInput, tick};
pub use timers::{Deferred, Scheduler, TimerId};
