//! glkit terminal demos.
//!
//! Controls:
//!   - Space: pause / resume the animation
//!   - R: reset the animation
//!   - Q/ESC: quit

use anyhow::Context;
use clap::Parser;
use glkit_terminal::cli::CliArgs;
use glkit_terminal::logging::{init_logging, LoggingConfig};
use glkit_terminal::{build_scene, DemoConfig, TerminalApp};

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => DemoConfig::load(path)?,
        None => DemoConfig::default(),
    };
    if let Some(demo) = args.demo {
        config.demo = demo;
    }
    config.validate()?;

    let scene = build_scene(&config, args.mesh.as_deref())?;

    let mut app = TerminalApp::new(scene, &config).context("failed to set up the terminal")?;
    app.run()?;
    Ok(())
}
