use clap::Parser;
use log::{error, info};

mod animation;
mod app;
mod config;
mod error;
mod geometry;
mod graphics;
mod math;
mod render;
mod scene;
mod state;
mod terminal;
mod vertex;

use app::{Lifecycle, Runner, STARTUP_DELAY};
use config::{Args, Config};
use scene::Scene;
use state::AppState;
use terminal::TerminalPlatform;

/// Main function
fn main() {
    let args = Args::parse();
    env_logger::init();
    let config = Config::from(args);

    let mut platform = TerminalPlatform::new();
    match Lifecycle::Uninitialized.start(&mut platform, STARTUP_DELAY) {
        Lifecycle::Running(surface) => {
            let mut rng = config.rng();
            let scene = Scene::new(&mut rng);
            info!(
                "Animating {} objects at {:.0} fps",
                scene.objects.len(),
                1.0 / config.frame_interval.as_secs_f64()
            );

            let mut runner = Runner::new(surface, AppState::new(scene), config);
            let result = runner.run();
            // Restore the terminal before reporting anything
            drop(runner);
            if let Err(e) = result {
                error!("Rendering stopped: {e}");
            }
        }
        Lifecycle::Failed | Lifecycle::Uninitialized => {}
    }
}
