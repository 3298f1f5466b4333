//! Economy and progression
//!
//! Coins, high score, cosmetics, power-ups and promo codes. Every entity is
//! persisted independently and saved as soon as it changes. Rejected actions
//! are reported as a `Rejection`, never as a panic.

pub mod power_ups;
pub mod promo;
pub mod skins;
pub mod themes;

pub use power_ups::{ActivePowerUp, PowerUp, PowerUpKind, PowerUps};
pub use promo::{PromoCode, PromoLedger};
pub use skins::{PlayerSkin, Wardrobe};
pub use themes::{GameTheme, Themes};

use serde::Serialize;
use thiserror::Error;

use crate::consts::DEFAULT_COINS;
use crate::persistence::{self, KeyValueStore, keys};

/// Why a requested action was refused
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    #[error("not enough coins: need {needed}, have {available}")]
    NotEnoughCoins { needed: u64, available: u64 },

    #[error("already owned")]
    AlreadyOwned,

    #[error("no such item")]
    UnknownItem,

    #[error("item not owned")]
    NotOwned,

    #[error("power-up has no duration to activate")]
    NotTimed,

    #[error("invalid or unknown code")]
    InvalidCode,

    #[error("this code has already been used")]
    CodeAlreadyUsed,

    #[error("only possible after game over")]
    NotGameOver,

    #[error("only possible during a run")]
    NotPlaying,

    #[error("lives are already full")]
    LivesFull,
}

/// Persisted coin balance and high score
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    coins: u64,
    high_score: u64,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            coins: DEFAULT_COINS,
            high_score: 0,
        }
    }
}

impl Wallet {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            coins: persistence::load_u64(store, keys::COINS, DEFAULT_COINS),
            high_score: persistence::load_u64(store, keys::HIGH_SCORE, 0),
        }
    }

    /// Replace the in-memory balance with the persisted one
    pub fn reload_coins(&mut self, store: &dyn KeyValueStore) {
        self.coins = persistence::load_u64(store, keys::COINS, DEFAULT_COINS);
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn can_afford(&self, price: u64) -> bool {
        self.coins >= price
    }

    pub fn add_coins(&mut self, amount: u64, store: &mut dyn KeyValueStore) -> u64 {
        self.set_coins(self.coins.saturating_add(amount), store);
        self.coins
    }

    /// Deduct `amount`, leaving the balance untouched when short
    pub fn spend(&mut self, amount: u64, store: &mut dyn KeyValueStore) -> Result<u64, Rejection> {
        if !self.can_afford(amount) {
            return Err(Rejection::NotEnoughCoins {
                needed: amount,
                available: self.coins,
            });
        }
        self.set_coins(self.coins - amount, store);
        Ok(self.coins)
    }

    pub fn set_coins(&mut self, coins: u64, store: &mut dyn KeyValueStore) {
        self.coins = coins;
        persistence::save_u64(store, keys::COINS, coins);
    }

    /// Record a finished run's score; returns true on a new high score
    pub fn record_score(&mut self, score: u64, store: &mut dyn KeyValueStore) -> bool {
        if score <= self.high_score {
            return false;
        }
        self.high_score = score;
        persistence::save_u64(store, keys::HIGH_SCORE, score);
        log::info!("New high score: {}", score);
        true
    }
}

/// Buy `id` into an owned-id list, deducting `price` from the wallet
pub(crate) fn purchase(
    owned: &mut Vec<String>,
    id: &str,
    price: u64,
    wallet: &mut Wallet,
    store: &mut dyn KeyValueStore,
) -> Result<(), Rejection> {
    if owned.iter().any(|o| o == id) {
        return Err(Rejection::AlreadyOwned);
    }
    wallet.spend(price, store)?;
    owned.push(id.to_string());
    Ok(())
}
