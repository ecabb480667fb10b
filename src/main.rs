//! Snoo Jump entry point
//!
//! Native builds run a headless autopilot demo and keep the high score in a
//! JSON file. The browser build is driven from JS through `snoo_jump::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use snoo_jump::game::NullDirector;
    use snoo_jump::platform::FileStore;
    use snoo_jump::sim::HeadlessPresenter;
    use snoo_jump::{Game, HostInput, Scene, Settings};

    env_logger::init();
    log::info!("Snoo Jump (native) starting...");

    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "snoo-jump.json".to_string());
    let settings = match Settings::load_from(&settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Bad settings file {}: {}", settings_path, e);
            std::process::exit(1);
        }
    };

    let store = FileStore::new(settings.high_score_path.clone());
    let demo_ticks = settings.demo_ticks;
    let mut game = match Game::new(settings, HeadlessPresenter::default(), store, NullDirector) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Refusing to start: {}", e);
            std::process::exit(1);
        }
    };

    let autopilot = HostInput {
        autopilot: true,
        ..Default::default()
    };
    let mut runs = Vec::new();
    for _ in 0..demo_ticks {
        let input = match game.scene() {
            Scene::Title => HostInput {
                primary: true,
                ..autopilot
            },
            Scene::Playing => autopilot,
            Scene::GameOver(report) => {
                runs.push(report);
                HostInput {
                    primary: true,
                    ..autopilot
                }
            }
        };
        if let Err(e) = game.update(&input) {
            log::error!("Run failed to start: {}", e);
            std::process::exit(1);
        }
    }

    if let Some(run) = game.run() {
        if !run.is_over() {
            println!("Unfinished run: score {} (tick {})", run.score, run.time_ticks);
        }
    }
    for (i, report) in runs.iter().enumerate() {
        let banner = if report.new_high_score { " NEW HIGH SCORE!" } else { "" };
        println!(
            "Run {}: score {}, high score {}{}",
            i + 1,
            report.score,
            report.high_score,
            banner
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
