//! Scene flow around the simulation
//!
//! Title → Playing → GameOver, then either PLAY AGAIN (a brand new run) or
//! MAIN MENU (back to the title). `Game` owns the collaborators and the
//! current run, feeds one tick per frame and reacts to the run's events.

use crate::error::ConfigError;
use crate::highscores::{HighScoreStore, load_high_score, save_high_score};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameOverReport, GameState, Presenter, TickInput, tick};

/// Where the host currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scene {
    Title,
    Playing,
    GameOver(GameOverReport),
}

/// Raw host input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostInput {
    pub left: bool,
    pub right: bool,
    /// Tap/click/space: start from the title, play again after game over
    pub primary: bool,
    /// Back to the title from the game-over screen
    pub menu: bool,
    /// Let the autopilot steer
    pub autopilot: bool,
}

impl HostInput {
    fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            autopilot: self.autopilot,
        }
    }
}

/// Scene transitions requested by the core
pub trait SceneDirector {
    fn start_run(&mut self);
    fn end_run(&mut self, score: u64, high_score: u64);
    fn return_to_title(&mut self);
    fn return_to_menu(&mut self);
}

/// Director for hosts that render scenes from `Game::scene` alone
#[derive(Debug, Default)]
pub struct NullDirector;

impl SceneDirector for NullDirector {
    fn start_run(&mut self) {}
    fn end_run(&mut self, _score: u64, _high_score: u64) {}
    fn return_to_title(&mut self) {}
    fn return_to_menu(&mut self) {}
}

/// A play session: collaborators plus the current run
pub struct Game<P: Presenter, S: HighScoreStore, D: SceneDirector> {
    settings: Settings,
    presenter: P,
    store: S,
    director: D,
    scene: Scene,
    run: Option<GameState>,
    runs_started: u64,
    /// Best score seen by this session, shown on the title screen
    high_score: u64,
}

impl<P: Presenter, S: HighScoreStore, D: SceneDirector> Game<P, S, D> {
    /// Create a session sitting on the title scene
    pub fn new(settings: Settings, presenter: P, mut store: S, director: D) -> Result<Self, ConfigError> {
        settings.validate()?;
        let high_score = load_high_score(&mut store);
        Ok(Self {
            settings,
            presenter,
            store,
            director,
            scene: Scene::Title,
            run: None,
            runs_started: 0,
            high_score,
        })
    }

    pub fn scene(&self) -> Scene {
        self.scene
    }

    /// Current (or just finished) run
    pub fn run(&self) -> Option<&GameState> {
        self.run.as_ref()
    }

    pub fn run_mut(&mut self) -> Option<&mut GameState> {
        self.run.as_mut()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn director(&self) -> &D {
        &self.director
    }

    pub fn director_mut(&mut self) -> &mut D {
        &mut self.director
    }

    /// Live high score of the current run, or the last known one between runs
    pub fn high_score(&self) -> u64 {
        self.run.as_ref().map_or(self.high_score, |run| run.high_score)
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Discard any previous run and start a fresh one
    pub fn start_run(&mut self) -> Result<(), ConfigError> {
        self.discard_run();

        let high_score = load_high_score(&mut self.store).max(self.high_score);
        self.high_score = high_score;
        let seed = self.settings.seed.unwrap_or_else(rand::random);
        let state = GameState::new(
            self.settings.width,
            self.settings.height,
            seed,
            high_score,
            &mut self.presenter,
        )?;

        self.run = Some(state);
        self.runs_started += 1;
        self.scene = Scene::Playing;
        self.director.start_run();
        Ok(())
    }

    /// Advance one frame
    pub fn update(&mut self, input: &HostInput) -> Result<(), ConfigError> {
        match self.scene {
            Scene::Title => {
                if input.primary {
                    self.start_run()?;
                }
            }
            Scene::Playing => self.step(input),
            Scene::GameOver(_) => {
                if input.primary {
                    self.start_run()?;
                } else if input.menu {
                    self.discard_run();
                    self.scene = Scene::Title;
                    self.director.return_to_menu();
                }
            }
        }
        Ok(())
    }

    /// Abandon the current run and go back to the title
    pub fn abandon(&mut self) {
        if self.run.is_none() && self.scene == Scene::Title {
            return;
        }
        log::info!("Run abandoned");
        self.discard_run();
        self.scene = Scene::Title;
        self.director.return_to_title();
    }

    /// The host viewport changed size
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        crate::settings::validate_viewport(width, height)?;
        self.settings.width = width;
        self.settings.height = height;
        if let Some(run) = self.run.as_mut() {
            run.resize(width, height)?;
        }
        Ok(())
    }

    fn step(&mut self, input: &HostInput) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        tick(run, &input.tick_input(), &mut self.presenter);

        for event in run.drain_events() {
            match event {
                GameEvent::HighScore(score) => {
                    self.high_score = score;
                    save_high_score(&mut self.store, score);
                }
                GameEvent::GameOver(report) => {
                    self.high_score = report.high_score;
                    save_high_score(&mut self.store, report.high_score);
                    self.director.end_run(report.score, report.high_score);
                    self.scene = Scene::GameOver(report);
                }
                GameEvent::PlatformBroken(_)
                | GameEvent::PowerUpCollected { .. }
                | GameEvent::ShieldExpired => {}
            }
        }
    }

    fn discard_run(&mut self) {
        if let Some(mut run) = self.run.take() {
            run.teardown(&mut self.presenter);
        }
    }
}
