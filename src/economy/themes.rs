//! Map themes
//!
//! A theme changes lighting, background, the look of obstacles and the
//! decoration mode the chunk generator runs with.

use serde::{Deserialize, Serialize};

use super::{Rejection, Wallet, purchase};
use crate::persistence::{self, KeyValueStore, keys};
use crate::world::Decorations;

pub const DEFAULT_THEME: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lighting {
    pub ambient_intensity: f32,
    pub ambient_color: &'static str,
    pub sun_intensity: f32,
    pub sun_color: &'static str,
    pub fill_intensity: f32,
    pub fill_color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrashStyle {
    Normal,
    Pumpkin,
    Gift,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTheme {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u64,
    pub description: &'static str,
    pub lighting: Lighting,
    /// CSS background for the page behind the canvas
    pub background: &'static str,
    pub trash_style: TrashStyle,
    pub decorations: Decorations,
}

pub static AVAILABLE_THEMES: [GameTheme; 3] = [
    GameTheme {
        id: DEFAULT_THEME,
        name: "Classic",
        price: 0,
        description: "The classic city map",
        lighting: Lighting {
            ambient_intensity: 0.4,
            ambient_color: "#ffffff",
            sun_intensity: 1.0,
            sun_color: "#FFFACD",
            fill_intensity: 0.3,
            fill_color: "#87CEEB",
        },
        background: "linear-gradient(to bottom, #87CEEB, #98FB98)",
        trash_style: TrashStyle::Normal,
        decorations: Decorations::None,
    },
    GameTheme {
        id: "halloween",
        name: "Halloween",
        price: 5000,
        description: "A Halloween night with pumpkins and cobwebs",
        lighting: Lighting {
            ambient_intensity: 0.2,
            ambient_color: "#9966CC",
            sun_intensity: 0.3,
            sun_color: "#FF6600",
            fill_intensity: 0.4,
            fill_color: "#9966CC",
        },
        background: "linear-gradient(to bottom, #1a0033, #330066)",
        trash_style: TrashStyle::Pumpkin,
        decorations: Decorations::Webs,
    },
    GameTheme {
        id: "christmas",
        name: "Christmas",
        price: 7000,
        description: "A snowy Christmas map with colorful gifts",
        lighting: Lighting {
            ambient_intensity: 0.5,
            ambient_color: "#E0F7FF",
            sun_intensity: 0.8,
            sun_color: "#FFFFFF",
            fill_intensity: 0.4,
            fill_color: "#B3E5FC",
        },
        background: "linear-gradient(to bottom, #B3E5FC, #E1F5FE)",
        trash_style: TrashStyle::Gift,
        decorations: Decorations::Snow,
    },
];

pub fn find_theme(id: &str) -> Option<&'static GameTheme> {
    AVAILABLE_THEMES.iter().find(|t| t.id == id)
}

/// Owned and selected themes, persisted together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Themes {
    purchased: Vec<String>,
    current: String,
}

impl Default for Themes {
    fn default() -> Self {
        Self {
            purchased: vec![DEFAULT_THEME.to_string()],
            current: DEFAULT_THEME.to_string(),
        }
    }
}

impl Themes {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        persistence::load_json(store, keys::THEMES, Self::default)
    }

    fn save(&self, store: &mut dyn KeyValueStore) {
        persistence::save_json(store, keys::THEMES, self);
    }

    pub fn is_purchased(&self, id: &str) -> bool {
        self.purchased.iter().any(|p| p == id)
    }

    pub fn purchased(&self) -> &[String] {
        &self.purchased
    }

    /// Selected theme, falling back to the default for unknown ids
    pub fn current(&self) -> &'static GameTheme {
        find_theme(&self.current).unwrap_or(&AVAILABLE_THEMES[0])
    }

    pub fn purchase(
        &mut self,
        id: &str,
        wallet: &mut Wallet,
        store: &mut dyn KeyValueStore,
    ) -> Result<&'static GameTheme, Rejection> {
        let theme = find_theme(id).ok_or(Rejection::UnknownItem)?;
        purchase(&mut self.purchased, theme.id, theme.price, wallet, store)?;
        self.save(store);
        log::info!("Purchased theme {}", theme.id);
        Ok(theme)
    }

    pub fn select(&mut self, id: &str, store: &mut dyn KeyValueStore) -> Result<(), Rejection> {
        if !self.is_purchased(id) {
            return Err(Rejection::NotOwned);
        }
        self.current = id.to_string();
        self.save(store);
        Ok(())
    }
}
