//! Power-ups
//!
//! Coin multipliers are time-bounded and measured on the game clock. Stacked
//! multipliers don't add up: the largest active one wins.

use serde::Serialize;

use super::Rejection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    CoinMultiplier,
    /// One-shot, applied to the running session
    Lives,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUp {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    pub description: &'static str,
    pub kind: PowerUpKind,
    pub value: u32,
    /// Effect length in seconds (timed power-ups only)
    pub duration: Option<f64>,
}

pub static AVAILABLE_POWER_UPS: [PowerUp; 3] = [
    PowerUp {
        id: "coin_2x",
        name: "Coins x2",
        price: 3000,
        description: "Doubles coins earned for 30 seconds",
        kind: PowerUpKind::CoinMultiplier,
        value: 2,
        duration: Some(30.0),
    },
    PowerUp {
        id: "coin_5x",
        name: "Coins x5",
        price: 8000,
        description: "Multiplies coins earned by 5 for 30 seconds",
        kind: PowerUpKind::CoinMultiplier,
        value: 5,
        duration: Some(30.0),
    },
    PowerUp {
        id: "extra_life",
        name: "Extra life",
        price: 2000,
        description: "Adds one life to the current run",
        kind: PowerUpKind::Lives,
        value: 1,
        duration: None,
    },
];

pub fn find_power_up(id: &str) -> Option<&'static PowerUp> {
    AVAILABLE_POWER_UPS.iter().find(|p| p.id == id)
}

/// A running timed effect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePowerUp {
    pub id: &'static str,
    /// Absolute game-clock time the effect ends
    pub end_time: f64,
    pub value: u32,
}

/// Registry of active timed effects
#[derive(Debug, Clone, Default)]
pub struct PowerUps {
    active: Vec<ActivePowerUp>,
}

impl PowerUps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a timed power-up
    pub fn activate(&mut self, id: &str, now: f64) -> Result<&'static PowerUp, Rejection> {
        let power_up = find_power_up(id).ok_or(Rejection::UnknownItem)?;
        let Some(duration) = power_up.duration else {
            return Err(Rejection::NotTimed);
        };
        self.active.retain(|p| p.id != power_up.id);
        self.active.push(ActivePowerUp {
            id: power_up.id,
            end_time: now + duration,
            value: power_up.value,
        });
        log::info!("Activated {} until t={:.1}", power_up.id, now + duration);
        Ok(power_up)
    }

    /// Drop effects that ended at or before `now`
    pub fn clear_expired(&mut self, now: f64) {
        self.active.retain(|p| p.end_time > now);
    }

    /// Largest active coin multiplier, 1 when none
    pub fn coin_multiplier(&mut self, now: f64) -> u64 {
        self.clear_expired(now);
        self.peek_multiplier(now)
    }

    /// Same as `coin_multiplier` without pruning the registry
    pub fn peek_multiplier(&self, now: f64) -> u64 {
        self.active
            .iter()
            .filter(|p| p.end_time > now)
            .filter(|p| {
                find_power_up(p.id).is_some_and(|pu| pu.kind == PowerUpKind::CoinMultiplier)
            })
            .map(|p| p.value as u64)
            .max()
            .unwrap_or(1)
    }

    /// Power-ups still running at `now`
    pub fn active(&mut self, now: f64) -> Vec<&'static PowerUp> {
        self.clear_expired(now);
        self.active.iter().filter_map(|p| find_power_up(p.id)).collect()
    }
}
