//! Example: Load an STL file and show it in the shading demo
//!
//! Usage: cargo run --example load_stl -- path/to/file.stl

use anyhow::Context;
use glkit_core::stl::load_stl;
use glkit_terminal::logging::{init_logging, LoggingConfig};
use glkit_terminal::{build_scene, DemoConfig, DemoKind, TerminalApp};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: load_stl <stl-file>");
        return Ok(());
    };

    // Parse once up front so problems show before the screen switches
    let mesh = load_stl(&path).with_context(|| format!("failed to load {}", path.display()))?;
    let bounds = mesh.bounds().context("the STL file has no triangles")?;
    println!("Loaded {} triangles, bounds {:?} .. {:?}", mesh.triangles.len(), bounds.0, bounds.1);

    let config = DemoConfig {
        demo: DemoKind::Shading,
        ..DemoConfig::default()
    };
    let scene = build_scene(&config, Some(&path))?;
    let mut app = TerminalApp::new(scene, &config)?;
    app.run()?;
    Ok(())
}
