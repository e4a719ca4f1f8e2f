//! Trapfall headless entry point
//!
//! Runs one autopilot session on the configured layout and logs the report.

use trapfall::sim::{GameState, RenderSnapshot};
use trapfall::{Autopilot, Layout, Settings, run_session};

fn main() {
    env_logger::init();
    log::info!("Trapfall (headless) starting...");

    let settings = Settings::load_or_default();

    let layout = match &settings.layout_path {
        Some(path) => Layout::load(path).unwrap_or_else(|e| {
            log::error!("Failed to load layout: {e}, using the stock arena");
            Layout::default()
        }),
        None => Layout::default(),
    };

    let seed = settings.effective_seed();
    log::info!(
        "Seed {seed}, frame cap {}, pacing {:?}",
        settings.max_frames,
        settings.pacing()
    );

    let mut state = GameState::new(&layout, seed);
    let mut pilot = Autopilot::new(settings.max_frames);
    let report = run_session(&mut state, &mut pilot, &mut (), settings.pacing());

    match serde_json::to_string(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize report: {e}"),
    }

    if log::log_enabled!(log::Level::Debug) {
        match RenderSnapshot::capture(&state).to_json() {
            Ok(json) => log::debug!("Final frame: {json}"),
            Err(e) => log::warn!("Failed to serialize final frame: {e}"),
        }
    }
}
