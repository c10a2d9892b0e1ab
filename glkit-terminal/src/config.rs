//! Demo settings, loaded from JSON.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "demo": "shading", "degrees_per_second": 90.0, "cell_aspect": 0.45 }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use glkit_core::{Mat4, MathError, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid projection settings: {0}")]
    Projection(#[from] MathError),
    #[error("`{0}` must be a positive number")]
    NotPositive(&'static str),
}

#[derive(Default, Serialize, Deserialize, clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DemoKind {
    #[default]
    Triforce,
    Shading,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    pub demo: DemoKind,
    /// Animation speed of every spinning object.
    pub degrees_per_second: f32,
    pub target_fps: u32,
    /// Width over height of one terminal cell.
    pub cell_aspect: f32,
    /// Vertical field of view of the shading demo, in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub light_position: [f32; 3],
    pub view_position: [f32; 3],
    /// Euler angles in degrees, applied Z then Y then X.
    pub view_rotation: [f32; 3],
    /// Edge length of the centre mesh; STL files are rescaled to it.
    pub mesh_size: f32,
    /// Both demos open paused; space starts the animation.
    pub start_paused: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            demo: DemoKind::default(),
            degrees_per_second: 45.0,
            target_fps: 30,
            cell_aspect: 0.5,
            fov_y: 60.0,
            near: 0.1,
            far: 10000.0,
            light_position: [-35.0, 35.0, 35.0],
            view_position: [0.0, 0.0, -100.0],
            view_rotation: [45.0, 0.0, 0.0],
            mesh_size: 30.0,
            start_paused: true,
        }
    }
}

impl DemoConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str::<DemoConfig>(json)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::NotPositive("target_fps"));
        }
        if !(self.cell_aspect > 0.0 && self.cell_aspect.is_finite()) {
            return Err(ConfigError::NotPositive("cell_aspect"));
        }
        if !(self.mesh_size > 0.0 && self.mesh_size.is_finite()) {
            return Err(ConfigError::NotPositive("mesh_size"));
        }
        Mat4::try_perspective(self.fov_y, 1.0, self.near, self.far)?;
        Ok(())
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps.max(1) as f64)
    }

    pub fn light_position(&self) -> Vec3 {
        self.light_position.into()
    }

    pub fn view_position(&self) -> Vec3 {
        self.view_position.into()
    }
}
