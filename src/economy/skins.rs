//! Player skins

use serde::Serialize;

use super::{Rejection, Wallet, purchase};
use crate::persistence::{self, KeyValueStore, keys};

pub const DEFAULT_SKIN: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinColors {
    pub head: &'static str,
    pub body: &'static str,
    pub arms: &'static str,
    pub legs: &'static str,
    pub hair: &'static str,
    pub eyes: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSkin {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    pub colors: SkinColors,
    /// Hat color, for skins that wear one
    pub hat: Option<&'static str>,
}

const SKIN_TONE: &str = "#FFD8B5";

const fn skin(
    id: &'static str,
    name: &'static str,
    price: u64,
    body: &'static str,
    legs: &'static str,
    hair: &'static str,
) -> PlayerSkin {
    PlayerSkin {
        id,
        name,
        price,
        colors: SkinColors {
            head: SKIN_TONE,
            body,
            arms: SKIN_TONE,
            legs,
            hair,
            eyes: "#000000",
        },
        hat: None,
    }
}

pub static AVAILABLE_SKINS: [PlayerSkin; 10] = [
    skin(DEFAULT_SKIN, "Classic", 0, "#FF6B6B", "#4ECDC4", "#8B4513"),
    skin("red", "Fire Red", 1500, "#DC143C", "#8B0000", "#000000"),
    skin("blue", "Ocean Blue", 1800, "#1E90FF", "#00008B", "#4169E1"),
    skin("green", "Forest Green", 2000, "#32CD32", "#006400", "#228B22"),
    skin("purple", "Mystic Purple", 2500, "#9370DB", "#4B0082", "#8A2BE2"),
    skin("pink", "Pastel Pink", 3000, "#FF69B4", "#FF1493", "#FFB6C1"),
    PlayerSkin {
        id: "summer",
        name: "Summer Mode",
        price: 2200,
        colors: SkinColors {
            head: "#D2691E",
            body: "#FFD700",
            arms: "#D2691E",
            legs: "#FF8C00",
            hair: "#FFA500",
            eyes: "#000000",
        },
        hat: None,
    },
    PlayerSkin {
        hat: Some("#DC143C"),
        ..skin("christmas", "Santa", 2800, "#DC143C", "#DC143C", "#FFFFFF")
    },
    PlayerSkin {
        colors: SkinColors {
            head: SKIN_TONE,
            body: "#FF8C00",
            arms: SKIN_TONE,
            legs: "#000000",
            hair: "#4B0082",
            eyes: "#FF0000",
        },
        ..skin("halloween", "Halloween", 2500, "#FF8C00", "#000000", "#4B0082")
    },
    PlayerSkin {
        id: "golden",
        name: "Golden Premium",
        price: 5000,
        colors: SkinColors {
            head: "#FFD700",
            body: "#FFD700",
            arms: "#FFD700",
            legs: "#000000",
            hair: "#000000",
            eyes: "#000000",
        },
        hat: Some("#000000"),
    },
];

pub fn find_skin(id: &str) -> Option<&'static PlayerSkin> {
    AVAILABLE_SKINS.iter().find(|s| s.id == id)
}

/// Owned and selected skins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wardrobe {
    purchased: Vec<String>,
    current: String,
}

impl Default for Wardrobe {
    fn default() -> Self {
        Self {
            purchased: vec![DEFAULT_SKIN.to_string()],
            current: DEFAULT_SKIN.to_string(),
        }
    }
}

impl Wardrobe {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            purchased: persistence::load_json(store, keys::PURCHASED_SKINS, || {
                vec![DEFAULT_SKIN.to_string()]
            }),
            current: persistence::load_string(store, keys::CURRENT_SKIN, DEFAULT_SKIN),
        }
    }

    pub fn is_purchased(&self, id: &str) -> bool {
        self.purchased.iter().any(|p| p == id)
    }

    pub fn purchased(&self) -> &[String] {
        &self.purchased
    }

    /// Selected skin, falling back to the default for unknown ids
    pub fn current(&self) -> &'static PlayerSkin {
        find_skin(&self.current).unwrap_or(&AVAILABLE_SKINS[0])
    }

    pub fn purchase(
        &mut self,
        id: &str,
        wallet: &mut Wallet,
        store: &mut dyn KeyValueStore,
    ) -> Result<&'static PlayerSkin, Rejection> {
        let skin = find_skin(id).ok_or(Rejection::UnknownItem)?;
        purchase(&mut self.purchased, skin.id, skin.price, wallet, store)?;
        persistence::save_json(store, keys::PURCHASED_SKINS, &self.purchased);
        log::info!("Purchased skin {}", skin.id);
        Ok(skin)
    }

    pub fn select(&mut self, id: &str, store: &mut dyn KeyValueStore) -> Result<(), Rejection> {
        if !self.is_purchased(id) {
            return Err(Rejection::NotOwned);
        }
        self.current = id.to_string();
        persistence::save_string(store, keys::CURRENT_SKIN, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn rich_wallet(store: &mut MemoryStore) -> Wallet {
        let mut wallet = Wallet::load(&*store);
        wallet.set_coins(4000, store);
        wallet
    }

    #[test]
    fn test_default_wardrobe() {
        let wardrobe = Wardrobe::load(&MemoryStore::new());
        assert!(wardrobe.is_purchased(DEFAULT_SKIN));
        assert_eq!(wardrobe.current().id, DEFAULT_SKIN);
    }

    #[test]
    fn test_purchase_and_select() {
        let mut store = MemoryStore::new();
        let mut wallet = rich_wallet(&mut store);
        let mut wardrobe = Wardrobe::load(&store);

        assert_eq!(wardrobe.purchase("red", &mut wallet, &mut store).map(|s| s.id), Ok("red"));
        assert_eq!(wallet.coins(), 2500);
        assert_eq!(wardrobe.purchase("red", &mut wallet, &mut store), Err(Rejection::AlreadyOwned));
        assert_eq!(wallet.coins(), 2500);

        wardrobe.select("red", &mut store).unwrap();
        let reloaded = Wardrobe::load(&store);
        assert_eq!(reloaded.current().id, "red");
        assert!(reloaded.is_purchased("red"));
    }

    #[test]
    fn test_purchase_rejections() {
        let mut store = MemoryStore::new();
        let mut wallet = rich_wallet(&mut store);
        let mut wardrobe = Wardrobe::load(&store);
        assert_eq!(wardrobe.purchase("rainbow", &mut wallet, &mut store), Err(Rejection::UnknownItem));
        assert!(matches!(
            wardrobe.purchase("golden", &mut wallet, &mut store),
            Err(Rejection::NotEnoughCoins { needed: 5000, .. })
        ));
        assert!(!wardrobe.is_purchased("golden"));
        assert_eq!(wardrobe.select("golden", &mut store), Err(Rejection::NotOwned));
    }

    #[test]
    fn test_unknown_selection_falls_back() {
        let mut store = MemoryStore::new();
        store.insert(keys::CURRENT_SKIN, "deleted-skin");
        assert_eq!(Wardrobe::load(&store).current().id, DEFAULT_SKIN);
    }

    #[test]
    fn test_hats() {
        assert_eq!(find_skin("christmas").and_then(|s| s.hat), Some("#DC143C"));
        assert_eq!(find_skin("halloween").map(|s| s.colors.eyes), Some("#FF0000"));
        assert!(find_skin("red").is_some_and(|s| s.hat.is_none()));
    }
}
