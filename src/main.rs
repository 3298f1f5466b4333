//! EcoRunner entry point
//!
//! On the web this exposes the game to the page's renderer and input
//! handlers. Natively it runs a headless autoplay session and prints the
//! final snapshot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use eco_runner::consts::{MAX_SUBSTEPS, SIM_DT};
    use eco_runner::economy::Rejection;
    use eco_runner::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use eco_runner::sim::{Game, TickInput, tick};
    use eco_runner::tuning::Tuning;

    fn reject(rejection: Rejection) -> JsValue {
        match serde_json::to_string(&rejection) {
            Ok(json) => JsValue::from_str(&json),
            Err(_) => JsValue::from_str(&rejection.to_string()),
        }
    }

    /// Game instance driven by the page's animation frame loop
    #[wasm_bindgen]
    pub struct WebGame {
        game: Game,
        input: TickInput,
        accumulator: f32,
    }

    #[wasm_bindgen]
    impl WebGame {
        #[wasm_bindgen(constructor)]
        pub fn new() -> WebGame {
            let store: Box<dyn KeyValueStore> = match LocalStore::open() {
                Ok(store) => Box::new(store),
                Err(e) => {
                    log::warn!("{}, progress will not be saved", e);
                    Box::new(MemoryStore::new())
                }
            };
            let seed = js_sys::Date::now() as u64;
            log::info!("New game with seed: {}", seed);
            WebGame {
                game: Game::new(store, seed),
                input: TickInput::default(),
                accumulator: 0.0,
            }
        }

        /// Run simulation steps for `dt` seconds of wall time
        pub fn update(&mut self, dt: f32) {
            self.accumulator += dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.game, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input = TickInput::default();
            }
        }

        pub fn move_left(&mut self) {
            self.input.move_left = true;
        }

        pub fn move_right(&mut self) {
            self.input.move_right = true;
        }

        pub fn set_lane(&mut self, lane: i32) {
            self.input.lane = Some(lane as i64);
        }

        pub fn jump(&mut self) {
            self.input.jump = true;
        }

        pub fn jump_allowed(&self) -> bool {
            self.game.jump_allowed()
        }

        pub fn toggle_pause(&mut self) {
            self.input.pause = true;
        }

        pub fn next_tutorial_step(&mut self) {
            self.input.continue_tutorial = true;
        }

        /// Skip the rest of the tutorial
        pub fn complete_tutorial(&mut self) {
            self.game.complete_tutorial();
        }

        pub fn start_game(&mut self) {
            self.game.start_game();
        }

        pub fn start_tutorial(&mut self) {
            self.game.start_tutorial();
        }

        pub fn restart_game(&mut self) {
            self.game.restart_game();
        }

        pub fn revive_player(&mut self) -> Result<(), JsValue> {
            self.game.revive_player().map_err(reject)
        }

        pub fn purchase_skin(&mut self, id: &str) -> Result<(), JsValue> {
            self.game.purchase_skin(id).map(|_| ()).map_err(reject)
        }

        pub fn select_skin(&mut self, id: &str) -> Result<(), JsValue> {
            self.game.select_skin(id).map_err(reject)
        }

        pub fn purchase_theme(&mut self, id: &str) -> Result<(), JsValue> {
            self.game.purchase_theme(id).map(|_| ()).map_err(reject)
        }

        pub fn select_theme(&mut self, id: &str) -> Result<(), JsValue> {
            self.game.select_theme(id).map_err(reject)
        }

        pub fn purchase_power_up(&mut self, id: &str) -> Result<(), JsValue> {
            self.game.purchase_power_up(id).map(|_| ()).map_err(reject)
        }

        /// Coins credited
        pub fn redeem_code(&mut self, code: &str) -> Result<f64, JsValue> {
            self.game.redeem_code(code).map(|c| c as f64).map_err(reject)
        }

        /// Replace the balance from (partial) JSON and persist it
        pub fn set_tuning_json(&mut self, json: &str) -> Result<(), JsValue> {
            let tuning = Tuning::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
            self.game.set_tuning(tuning);
            Ok(())
        }

        pub fn snapshot_json(&self) -> String {
            serde_json::to_string(&self.game.snapshot()).unwrap_or_default()
        }

        /// Environment chunks around the player
        pub fn chunks_json(&self) -> String {
            let chunks: Vec<_> = self.game.chunks().chunks().collect();
            serde_json::to_string(&chunks).unwrap_or_default()
        }

        pub fn drain_events_json(&mut self) -> String {
            serde_json::to_string(&self.game.drain_events()).unwrap_or_default()
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("EcoRunner starting...");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("EcoRunner (native) starting...");
    log::info!("Native mode runs a headless autoplay session - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    autoplay(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a run with a simple bot: stand in the right container's lane and
/// sidestep obstacles between stations
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64) {
    use eco_runner::consts::SIM_DT;
    use eco_runner::persistence::MemoryStore;
    use eco_runner::sim::{Game, GamePhase, TickInput, tick};
    use eco_runner::world::next_station;

    const MAX_SECONDS: f32 = 120.0;

    let mut game = Game::new(Box::new(MemoryStore::new()), seed);
    game.start_game();

    let mut elapsed = 0.0;
    while game.phase() != GamePhase::GameOver && elapsed < MAX_SECONDS {
        let s = game.session();
        let z = s.player_position.z;
        let interval = game.tuning().station_interval;
        let target = s
            .current_waste_item
            .map(|item| item.correct_container.lane())
            .unwrap_or(s.player_lane);

        let blocked = |lane: usize| {
            s.obstacles
                .iter()
                .any(|o| o.lane == lane && o.position.z > z && o.position.z - z < 4.0)
        };
        let lane = if next_station(z, interval) - z > 6.0 && blocked(target) {
            [target.saturating_sub(1), target + 1]
                .into_iter()
                .find(|&l| l < 4 && l != target && !blocked(l))
                .unwrap_or(target)
        } else {
            target
        };

        let input = TickInput {
            lane: Some(lane as i64),
            ..Default::default()
        };
        tick(&mut game, &input, SIM_DT);
        elapsed += SIM_DT;

        for event in game.drain_events() {
            log::debug!("{:?}", event);
        }
    }

    let snapshot = game.snapshot();
    log::info!(
        "Run finished after {:.0}s: score {}, distance {:.0}, lives {}",
        elapsed,
        snapshot.score,
        snapshot.distance_traveled,
        snapshot.lives
    );
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}
