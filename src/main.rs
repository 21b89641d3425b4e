mod app;
mod color;
mod state;
mod ui;

use app::HappinessApp;
use clap::Parser;
use eframe::egui;

use happiness_atlas::config::{Cli, Config};

fn main() -> eframe::Result {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}; falling back to defaults");
            Config::default()
        }
    };
    config.apply_cli(&cli);
    log::info!("data sources: url={:?} local={:?}", config.data.url, config.data.local_paths);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "World Happiness Atlas",
        options,
        Box::new(|_cc| Ok(Box::new(HappinessApp::new(config)))),
    )
}
