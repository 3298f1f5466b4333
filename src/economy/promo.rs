//! Promo code ledger
//!
//! Codes are fixed-length and match case-insensitively. Once a code is used
//! it stays used in that ledger for good.

use serde::{Deserialize, Serialize};

use super::Rejection;
use crate::persistence::{self, KeyValueStore, keys};

/// Length every valid code has
pub const PROMO_CODE_LENGTH: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub coins: u64,
    pub used: bool,
}

const DEFAULT_CODES: [(&str, u64); 16] = [
    ("CARLASANCHEZLANCHARES009", 10_000),
    ("RUN10KHJKL23456MNOPQRST0", 10_000),
    ("TRY10KTUVW89012XYZ345678", 10_000),
    ("WIN10K7ABCDEFGHIJKLMNOPQ", 10_000),
    ("PLY10KPQRSTUVW90123XYZAB", 10_000),
    ("CARLASANCHEZLANCHARES000", 100_000),
    ("ECO20K45678ABCDEFGHIJKLM", 20_000),
    ("RUN20KLMNOPQRS1234TUVWXY", 20_000),
    ("TRY20K56789XYZABCDEFGHIJ", 20_000),
    ("WIN20KIJKLMNOPQRST012345", 20_000),
    ("PLY20KUVWX456789YZABCDEF", 20_000),
    ("ECO50KMEGA9876XABCZYXWVU", 50_000),
    ("RUN50KGOLD54321DEFGHIJKL", 50_000),
    ("TRY50KKINGLMNOPQRS890123", 50_000),
    ("WIN50KSTARTUVW23456XYZMN", 50_000),
    ("PLY50KHERO7ABCDEFGHIJKLM", 50_000),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoLedger {
    codes: Vec<PromoCode>,
}

impl Default for PromoLedger {
    fn default() -> Self {
        Self {
            codes: DEFAULT_CODES
                .iter()
                .map(|&(code, coins)| PromoCode {
                    code: code.to_string(),
                    coins,
                    used: false,
                })
                .collect(),
        }
    }
}

impl PromoLedger {
    /// Load the ledger; a stored ledger with any malformed code is replaced
    /// by the defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let codes: Option<Vec<PromoCode>> = persistence::load_json(store, keys::PROMO_CODES, || None);
        match codes {
            Some(codes) if codes.iter().all(|c| c.code.len() == PROMO_CODE_LENGTH) => Self { codes },
            Some(_) => {
                log::warn!("Stored promo codes have invalid length, resetting to defaults");
                Self::default()
            }
            None => Self::default(),
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        persistence::save_json(store, keys::PROMO_CODES, &self.codes);
    }

    pub fn codes(&self) -> &[PromoCode] {
        &self.codes
    }

    /// Mark a code used and return its coin value. The caller credits the coins.
    pub fn redeem(&mut self, input: &str, store: &mut dyn KeyValueStore) -> Result<u64, Rejection> {
        let normalized = input.trim().to_uppercase();
        let entry = self
            .codes
            .iter_mut()
            .find(|c| c.code.to_uppercase() == normalized)
            .ok_or(Rejection::InvalidCode)?;

        if entry.used {
            return Err(Rejection::CodeAlreadyUsed);
        }

        entry.used = true;
        let coins = entry.coins;
        self.save(store);
        log::info!("Redeemed promo code for {} coins", coins);
        Ok(coins)
    }
}
