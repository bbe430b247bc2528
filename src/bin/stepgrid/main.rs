//! stepgrid - terminal step sequencer
//!
//! Run with: cargo run -- [session.ron]

mod app;
mod ui;

use app::App;
use color_eyre::eyre::WrapErr;
use stepgrid::config::SessionConfig;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // Silent unless RUST_LOG is set; stderr would otherwise scribble over the TUI
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SessionConfig::load(&path).wrap_err_with(|| format!("loading {path}"))?,
        None => SessionConfig::default(),
    };

    App::new(config).run()
}
