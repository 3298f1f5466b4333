//! Waste classification
//!
//! The lane the player is in when a jump starts is the container the current
//! item is thrown into.

use super::game::Game;
use super::state::GameEvent;
use crate::catalog::{WasteType, random_item};
use crate::tutorial::TutorialAction;

/// Result of throwing the current item into a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Correct {
        points: u64,
        coins: u64,
    },
    Incorrect {
        expected: WasteType,
        chosen: WasteType,
    },
}

impl Game {
    /// Classify the current item against the player's lane and draw the next
    /// one. Nothing happens outside an active run or without a current item.
    pub fn classify_current_waste(&mut self) -> Option<Classification> {
        if !self.session.phase.is_active() {
            return None;
        }
        let item = self.session.current_waste_item?;
        let chosen = WasteType::from_lane(self.session.player_lane);

        let outcome = if item.correct_container == chosen {
            let combo = self.session.combo;
            let points = self.tuning.points_per_combo * combo as u64;
            let coins = self.tuning.coins_per_correct * self.power_ups.coin_multiplier(self.clock);

            self.session.score += points;
            self.session.combo = (combo + 1).min(self.tuning.max_combo);
            self.wallet.add_coins(coins, self.store.as_mut());
            self.events.push(GameEvent::Correct { points, coins });
            log::debug!("{} -> {}: +{} points, +{} coins", item.id, chosen.as_str(), points, coins);

            self.flash(format!("Correct! +{} points, +{} coins", points, coins));
            Classification::Correct { points, coins }
        } else {
            self.session.lives = self.session.lives.saturating_sub(1);
            self.session.combo = 1;
            self.events.push(GameEvent::Incorrect {
                expected: item.correct_container,
            });
            log::debug!(
                "{} -> {}: wrong, belongs in {}",
                item.id,
                chosen.as_str(),
                item.correct_container.as_str()
            );

            self.flash(format!(
                "Wrong! {} goes in the {} container",
                item.name,
                item.correct_container.as_str()
            ));
            if self.session.lives == 0 {
                self.schedule_game_over();
            }
            Classification::Incorrect {
                expected: item.correct_container,
                chosen,
            }
        };

        self.session.current_waste_item = Some(random_item(&mut self.rng));

        if matches!(outcome, Classification::Correct { .. }) {
            self.observe_tutorial(TutorialAction::ClassifyCorrect);
        }
        Some(outcome)
    }
}
