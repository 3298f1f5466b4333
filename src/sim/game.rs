//! Game session owner
//!
//! `Game` holds the session together with everything that outlives a run
//! (wallet, cosmetics, power-ups, promo ledger) and the storage they persist
//! to. Phase transitions and player intents are methods here; the per-frame
//! update lives in `tick`, classification in `classify`, spawning in `spawn`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::{Feedback, GameEvent, GamePhase, Session, Snapshot};
use super::timers::{Deferred, Scheduler, TimerId};
use crate::catalog::random_item;
use crate::consts::MAX_LIVES;
use crate::economy::power_ups::find_power_up;
use crate::economy::{
    GameTheme, PlayerSkin, PowerUp, PowerUpKind, PowerUps, PromoLedger, Rejection, Themes, Wallet,
    Wardrobe,
};
use crate::persistence::KeyValueStore;
use crate::tuning::Tuning;
use crate::tutorial::{Tutorial, TutorialAction, TutorialProgress};
use crate::world::{ChunkCache, approaching_station, visible_stations};

pub struct Game {
    pub(super) session: Session,
    pub(super) tuning: Tuning,
    pub(super) wallet: Wallet,
    pub(super) power_ups: PowerUps,
    pub(super) promo: PromoLedger,
    pub(super) wardrobe: Wardrobe,
    pub(super) themes: Themes,
    pub(super) tutorial: Tutorial,
    pub(super) scheduler: Scheduler,
    pub(super) chunks: ChunkCache,
    pub(super) rng: Pcg32,
    pub(super) store: Box<dyn KeyValueStore>,
    /// Seconds of game time since creation
    pub(super) clock: f64,
    pub(super) events: Vec<GameEvent>,

    pub(super) pending_game_over: Option<TimerId>,
    pub(super) pending_classify: Option<TimerId>,
    pub(super) pending_tutorial: Option<TimerId>,
}

impl Game {
    /// Create a game in the menu, loading tuning and progression from `store`
    pub fn new(store: Box<dyn KeyValueStore>, seed: u64) -> Self {
        let tuning = Tuning::load(&*store);
        Self::with_tuning(store, seed, tuning)
    }

    pub fn with_tuning(store: Box<dyn KeyValueStore>, seed: u64, tuning: Tuning) -> Self {
        let wallet = Wallet::load(&*store);
        let promo = PromoLedger::load(&*store);
        let wardrobe = Wardrobe::load(&*store);
        let themes = Themes::load(&*store);
        let mut chunks = ChunkCache::new(themes.current().decorations);
        chunks.update(0.0, themes.current().decorations);

        log::info!(
            "Game ready: {} coins, high score {}, theme {}, skin {}",
            wallet.coins(),
            wallet.high_score(),
            themes.current().id,
            wardrobe.current().id
        );

        Self {
            session: Session::new(&tuning),
            tuning,
            wallet,
            power_ups: PowerUps::new(),
            promo,
            wardrobe,
            themes,
            tutorial: Tutorial::new(),
            scheduler: Scheduler::new(),
            chunks,
            rng: Pcg32::seed_from_u64(seed),
            store,
            clock: 0.0,
            events: Vec::new(),
            pending_game_over: None,
            pending_classify: None,
            pending_tutorial: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Replace and persist the balance. Takes effect for speeds and timers
    /// immediately, for the starting speed on the next run.
    pub fn set_tuning(&mut self, tuning: Tuning) {
        tuning.save(self.store.as_mut());
        self.tuning = tuning;
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    pub fn tutorial(&self) -> &Tutorial {
        &self.tutorial
    }

    pub fn chunks(&self) -> &ChunkCache {
        &self.chunks
    }

    pub fn promo_ledger(&self) -> &PromoLedger {
        &self.promo
    }

    pub fn wardrobe(&self) -> &Wardrobe {
        &self.wardrobe
    }

    pub fn themes(&self) -> &Themes {
        &self.themes
    }

    pub fn current_skin(&self) -> &'static PlayerSkin {
        self.wardrobe.current()
    }

    pub fn current_theme(&self) -> &'static GameTheme {
        self.themes.current()
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Clock and deferred effects ---

    pub(super) fn advance_clock(&mut self, dt: f32) {
        self.clock += dt.max(0.0) as f64;
    }

    /// Run every deferred effect due at the current clock
    pub(super) fn run_due_effects(&mut self) {
        for (id, effect) in self.scheduler.take_due(self.clock) {
            match effect {
                Deferred::ClearMessage => {
                    if self.session.message.as_ref().is_some_and(|m| m.timer == id) {
                        self.session.message = None;
                    }
                }
                Deferred::EndGame => {
                    self.pending_game_over = None;
                    self.end_game();
                }
                Deferred::Classify => {
                    self.pending_classify = None;
                    if self.session.phase == GamePhase::Paused {
                        // Resolve once play resumes
                        self.pending_classify =
                            Some(self.scheduler.schedule(self.clock, 0.0, Deferred::Classify));
                    } else {
                        self.classify_current_waste();
                    }
                }
                Deferred::AdvanceTutorial => {
                    self.pending_tutorial = None;
                    self.next_tutorial_step();
                }
            }
        }
    }

    pub(super) fn schedule_game_over(&mut self) {
        let pending = self.pending_game_over.is_some_and(|id| self.scheduler.is_pending(id));
        if pending || self.session.phase == GamePhase::GameOver {
            return;
        }
        log::debug!("Out of lives, game over in {}s", self.tuning.game_over_delay);
        self.pending_game_over = Some(self.scheduler.schedule(
            self.clock,
            self.tuning.game_over_delay,
            Deferred::EndGame,
        ));
    }

    pub(super) fn schedule_classify(&mut self) {
        if self.pending_classify.is_some_and(|id| self.scheduler.is_pending(id)) {
            return;
        }
        self.pending_classify = Some(self.scheduler.schedule(
            self.clock,
            self.tuning.classify_delay,
            Deferred::Classify,
        ));
    }

    fn cancel_pending(&mut self) {
        for id in [
            self.pending_game_over.take(),
            self.pending_classify.take(),
            self.pending_tutorial.take(),
        ]
        .into_iter()
        .flatten()
        {
            self.scheduler.cancel(id);
        }
    }

    /// Drop every timer and the message shown
    fn reset_timers(&mut self) {
        self.scheduler.clear();
        self.pending_game_over = None;
        self.pending_classify = None;
        self.pending_tutorial = None;
        self.session.message = None;
    }

    // --- Messages ---

    /// Show feedback for `duration` seconds, replacing any current message
    pub fn show_message(&mut self, text: impl Into<String>, duration: f64) {
        if let Some(previous) = self.session.message.take() {
            self.scheduler.cancel(previous.timer);
        }
        let timer = self.scheduler.schedule(self.clock, duration, Deferred::ClearMessage);
        self.session.message = Some(Feedback {
            text: text.into(),
            timer,
        });
    }

    pub(super) fn flash(&mut self, text: impl Into<String>) {
        self.show_message(text, self.tuning.message_duration);
    }

    // --- Phase transitions ---

    fn begin_run(&mut self, phase: GamePhase) {
        self.reset_timers();
        self.session.reset_run(&self.tuning);
        self.session.phase = phase;
        self.session.current_waste_item = Some(random_item(&mut self.rng));
        self.wallet.reload_coins(&*self.store);
        self.chunks
            .update(self.session.player_position.z, self.themes.current().decorations);
    }

    /// Start a fresh run
    pub fn start_game(&mut self) {
        if !matches!(self.session.phase, GamePhase::Menu | GamePhase::GameOver) {
            log::debug!("start_game ignored in {:?}", self.session.phase);
            return;
        }
        self.begin_run(GamePhase::Playing);
        log::info!("Run started");
    }

    /// Start a run in tutorial mode from the first step
    pub fn start_tutorial(&mut self) {
        if !matches!(self.session.phase, GamePhase::Menu | GamePhase::GameOver) {
            log::debug!("start_tutorial ignored in {:?}", self.session.phase);
            return;
        }
        self.begin_run(GamePhase::Tutorial);
        self.tutorial.reset();
        log::info!("Tutorial started");
    }

    pub fn toggle_pause(&mut self) {
        self.session.phase = match self.session.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    /// Finish the run and record the score. Repeated calls do nothing.
    pub fn end_game(&mut self) {
        if matches!(self.session.phase, GamePhase::GameOver | GamePhase::Menu) {
            return;
        }
        self.cancel_pending();
        self.session.phase = GamePhase::GameOver;
        let score = self.session.score;
        let new_high_score = self.wallet.record_score(score, self.store.as_mut());
        self.events.push(GameEvent::GameOver {
            score,
            new_high_score,
        });
        log::info!(
            "Game over: score {}, distance {:.0}",
            score,
            self.session.distance_traveled
        );
    }

    /// Back to the menu with a fresh session
    pub fn restart_game(&mut self) {
        self.reset_timers();
        self.session = Session::new(&self.tuning);
        self.wallet.reload_coins(&*self.store);
        self.chunks.clear();
        self.update_world();
    }

    pub fn can_revive(&self) -> bool {
        self.session.phase == GamePhase::GameOver && self.wallet.can_afford(self.tuning.revive_cost)
    }

    /// Pay to continue the run with full lives
    pub fn revive_player(&mut self) -> Result<(), Rejection> {
        if self.session.phase != GamePhase::GameOver {
            return Err(Rejection::NotGameOver);
        }
        self.wallet.spend(self.tuning.revive_cost, self.store.as_mut())?;
        self.session.lives = MAX_LIVES;
        self.session.phase = GamePhase::Playing;
        self.session.current_waste_item = Some(random_item(&mut self.rng));
        self.events.push(GameEvent::Revived);
        self.flash("Revived! Keep going");
        log::info!("Player revived, {} coins left", self.wallet.coins());
        Ok(())
    }

    // --- Player intents ---

    /// Move to a lane, clamped to the road
    pub fn set_lane(&mut self, lane: i64) {
        if !self.session.phase.is_active() {
            return;
        }
        self.session.set_lane(lane);
    }

    pub fn move_left(&mut self) {
        if !self.session.phase.is_active() {
            return;
        }
        self.session.set_lane(self.session.player_lane as i64 - 1);
        self.observe_tutorial(TutorialAction::MoveLeft);
    }

    pub fn move_right(&mut self) {
        if !self.session.phase.is_active() {
            return;
        }
        self.session.set_lane(self.session.player_lane as i64 + 1);
        self.observe_tutorial(TutorialAction::MoveRight);
    }

    /// Whether a station is close enough for a manual jump to count
    pub fn jump_allowed(&self) -> bool {
        approaching_station(
            self.session.player_position.z,
            self.tuning.station_interval,
            self.tuning.manual_jump_distance,
        )
    }

    /// Start a jump and classify against the current lane.
    /// Returns false when already airborne or not in an active phase.
    pub fn jump(&mut self) -> bool {
        if !self.session.phase.is_active() || self.session.is_jumping {
            return false;
        }
        self.session.is_jumping = true;
        self.session.jump_start_time = self.clock;
        self.events.push(GameEvent::Jump { auto: false });
        self.classify_current_waste();
        self.observe_tutorial(TutorialAction::Jump);
        true
    }

    // --- Tutorial ---

    pub(super) fn observe_tutorial(&mut self, action: TutorialAction) {
        if self.session.phase != GamePhase::Tutorial {
            return;
        }
        let Some(step) = self.tutorial.observe(action) else {
            return;
        };
        log::debug!("Tutorial goal met: {}", step.id);
        if let Some(text) = step.completion_message {
            self.flash(text);
        }
        if self.pending_tutorial.is_none() {
            self.pending_tutorial = Some(self.scheduler.schedule(
                self.clock,
                action.advance_delay(),
                Deferred::AdvanceTutorial,
            ));
        }
    }

    /// Move the tutorial on; past the last step the tutorial completes
    pub fn next_tutorial_step(&mut self) {
        if self.session.phase != GamePhase::Tutorial {
            return;
        }
        if let Some(id) = self.pending_tutorial.take() {
            self.scheduler.cancel(id);
        }
        match self.tutorial.advance() {
            TutorialProgress::Step(index) => log::debug!("Tutorial step {}", index),
            TutorialProgress::Completed => self.complete_tutorial(),
        }
    }

    /// Leave the tutorial for the menu
    pub fn complete_tutorial(&mut self) {
        if self.session.phase != GamePhase::Tutorial {
            return;
        }
        self.cancel_pending();
        self.tutorial.finish();
        self.session.phase = GamePhase::Menu;
        self.events.push(GameEvent::TutorialCompleted);
        self.show_message(
            "Tutorial complete! You are ready to play",
            self.tuning.tutorial_message_duration,
        );
        log::info!("Tutorial completed");
    }

    // --- Shop ---

    pub fn coin_multiplier(&mut self) -> u64 {
        self.power_ups.coin_multiplier(self.clock)
    }

    pub fn active_power_ups(&mut self) -> Vec<&'static PowerUp> {
        self.power_ups.active(self.clock)
    }

    /// Buy a skin and wear it
    pub fn purchase_skin(&mut self, id: &str) -> Result<&'static PlayerSkin, Rejection> {
        let skin = self.wardrobe.purchase(id, &mut self.wallet, self.store.as_mut())?;
        self.wardrobe.select(skin.id, self.store.as_mut())?;
        Ok(skin)
    }

    pub fn select_skin(&mut self, id: &str) -> Result<(), Rejection> {
        self.wardrobe.select(id, self.store.as_mut())
    }

    /// Buy a theme and switch to it
    pub fn purchase_theme(&mut self, id: &str) -> Result<&'static GameTheme, Rejection> {
        let theme = self.themes.purchase(id, &mut self.wallet, self.store.as_mut())?;
        self.select_theme(theme.id)?;
        Ok(theme)
    }

    pub fn select_theme(&mut self, id: &str) -> Result<(), Rejection> {
        self.themes.select(id, self.store.as_mut())?;
        self.chunks
            .update(self.session.player_position.z, self.themes.current().decorations);
        Ok(())
    }

    /// Buy a power-up. Timed ones start on the game clock; an extra life
    /// applies to the run in progress.
    pub fn purchase_power_up(&mut self, id: &str) -> Result<&'static PowerUp, Rejection> {
        let power_up = find_power_up(id).ok_or(Rejection::UnknownItem)?;
        match power_up.kind {
            PowerUpKind::Lives => {
                if !matches!(
                    self.session.phase,
                    GamePhase::Playing | GamePhase::Paused | GamePhase::Tutorial
                ) {
                    return Err(Rejection::NotPlaying);
                }
                if self.session.lives >= MAX_LIVES {
                    return Err(Rejection::LivesFull);
                }
                self.wallet.spend(power_up.price, self.store.as_mut())?;
                self.session.lives = (self.session.lives + power_up.value).min(MAX_LIVES);
            }
            PowerUpKind::CoinMultiplier => {
                self.wallet.spend(power_up.price, self.store.as_mut())?;
                self.power_ups.activate(power_up.id, self.clock)?;
            }
        }
        log::info!("Purchased power-up {}", power_up.id);
        Ok(power_up)
    }

    /// Redeem a promo code and credit its coins
    pub fn redeem_code(&mut self, code: &str) -> Result<u64, Rejection> {
        let coins = self.promo.redeem(code, self.store.as_mut())?;
        self.wallet.add_coins(coins, self.store.as_mut());
        Ok(coins)
    }

    // --- World ---

    /// Keep the chunk window around the player current
    pub(super) fn update_world(&mut self) {
        let decorations = self.themes.current().decorations;
        self.chunks.update(self.session.player_position.z, decorations);
    }

    pub fn snapshot(&self) -> Snapshot {
        let s = &self.session;
        Snapshot {
            phase: s.phase,
            score: s.score,
            lives: s.lives,
            coins: self.wallet.coins(),
            combo: s.combo,
            high_score: self.wallet.high_score(),
            player_position: s.player_position,
            player_lane: s.player_lane,
            is_jumping: s.is_jumping,
            distance_traveled: s.distance_traveled,
            running_speed: s.running_speed,
            obstacles: s.obstacles.clone(),
            current_waste_item: s.current_waste_item,
            message: s.message_text().map(str::to_string),
            tutorial_step: if s.phase == GamePhase::Tutorial {
                self.tutorial.current()
            } else {
                None
            },
            tutorial_index: self.tutorial.index(),
            tutorial_completed: self.tutorial.is_completed(),
            coin_multiplier: self.power_ups.peek_multiplier(self.clock),
            stations: visible_stations(
                s.distance_traveled,
                s.player_position.z,
                self.tuning.station_interval,
            ),
            theme: self.themes.current(),
            skin: self.wardrobe.current(),
            owned_themes: self.themes.purchased().to_vec(),
            owned_skins: self.wardrobe.purchased().to_vec(),
        }
    }
}
