//! audiolab - terminal audio workstation
//!
//! Run with: cargo run --bin audiolab
//!
//! Logging goes to stderr; redirect it when raising the level, e.g.
//! `RUST_LOG=debug cargo run 2> audiolab.log`.

mod app;
mod ui;

use audiolab::{io::OutputDevice, LabConfig, Studio};
use color_eyre::eyre::WrapErr;

use app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let device = OutputDevice::default_output().wrap_err("failed to open the audio device")?;
    let config = LabConfig::new().sample_rate(device.sample_rate() as f32);
    let (studio, lab) = Studio::new(config).wrap_err("invalid lab configuration")?;
    let _player = device.start(lab).wrap_err("failed to start audio output")?;

    let mut terminal = ratatui::init();
    let result = App::new(studio).run(&mut terminal);
    ratatui::restore();
    result
}
