//! Browser host binding
//!
//! JS owns the canvas, sprites, tweens and input. Each frame it calls
//! `update`, then drains the queued presenter commands and scene changes
//! (JSON) and applies them to its renderer.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::{Game, HostInput, Scene, SceneDirector};
use crate::platform::LocalStorageStore;
use crate::settings::Settings;
use crate::sim::RecordingPresenter;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Snoo Jump starting...");
}

/// Scene change for the JS side
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "scene", rename_all = "snake_case")]
enum SceneChange {
    Run,
    GameOver { score: u64, high_score: u64 },
    Title,
    Menu,
}

#[derive(Debug, Default)]
struct QueueDirector {
    changes: Vec<SceneChange>,
}

impl SceneDirector for QueueDirector {
    fn start_run(&mut self) {
        self.changes.push(SceneChange::Run);
    }

    fn end_run(&mut self, score: u64, high_score: u64) {
        self.changes.push(SceneChange::GameOver { score, high_score });
    }

    fn return_to_title(&mut self) {
        self.changes.push(SceneChange::Title);
    }

    fn return_to_menu(&mut self) {
        self.changes.push(SceneChange::Menu);
    }
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Game session exported to JS
#[wasm_bindgen]
pub struct WebGame {
    game: Game<RecordingPresenter, LocalStorageStore, QueueDirector>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WebGame, JsValue> {
        let game = Game::new(
            Settings::with_viewport(width, height),
            RecordingPresenter::new(),
            LocalStorageStore,
            QueueDirector::default(),
        )
        .map_err(to_js)?;
        Ok(Self { game })
    }

    pub fn update(&mut self, left: bool, right: bool, primary: bool, menu: bool) -> Result<(), JsValue> {
        let input = HostInput {
            left,
            right,
            primary,
            menu,
            autopilot: false,
        };
        self.game.update(&input).map_err(to_js)
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.game.resize(width, height).map_err(to_js)
    }

    /// Presenter commands since the last drain, as a JSON array
    pub fn drain_commands(&mut self) -> Result<String, JsValue> {
        let calls = self.game.presenter_mut().drain();
        serde_json::to_string(&calls).map_err(to_js)
    }

    /// Scene changes since the last drain, as a JSON array
    pub fn drain_scene_changes(&mut self) -> Result<String, JsValue> {
        let changes = std::mem::take(&mut self.game.director_mut().changes);
        serde_json::to_string(&changes).map_err(to_js)
    }

    pub fn scene(&self) -> String {
        match self.game.scene() {
            Scene::Title => "title",
            Scene::Playing => "playing",
            Scene::GameOver(_) => "game_over",
        }
        .to_string()
    }

    pub fn score(&self) -> f64 {
        self.game.run().map_or(0.0, |r| r.score as f64)
    }

    pub fn high_score(&self) -> f64 {
        self.game.high_score() as f64
    }
}
