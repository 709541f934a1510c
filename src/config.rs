use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::creature::CreatureParams;
use crate::error::GameError;
use crate::viewport::Viewport;

/// Escape speed always tracks base speed at this ratio when tuned live.
pub const ESCAPE_SPEED_RATIO: f32 = 2.2;

/// Startup configuration. Every field has a default matching the shipped game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: Viewport,
    /// Intrinsic camera resolution used by the demo camera.
    pub video_size: (u32, u32),
    /// Required continuous hand contact before a catch (seconds).
    pub catch_time_secs: f32,
    pub creatures: Vec<CreatureParams>,
    /// Seed for the simulation RNG. Random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            video_size: (640, 480),
            catch_time_secs: 0.5,
            creatures: vec![CreatureParams::default()],
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_ron(text: &str) -> Result<Self, GameError> {
        let config: Self = ron::from_str(text).map_err(|e| GameError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_ron(&text)
            .with_context(|| format!("Failed to parse RON config: {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let vp = &self.viewport;
        if !(vp.width > 0.0 && vp.height > 0.0) {
            return Err(GameError::Config(format!(
                "viewport must have a positive size, got {}x{}",
                vp.width, vp.height
            )));
        }
        if self.video_size.0 == 0 || self.video_size.1 == 0 {
            return Err(GameError::Config("video_size must be non-zero".into()));
        }
        if !(self.catch_time_secs >= 0.0) {
            return Err(GameError::Config("catch_time_secs must be >= 0".into()));
        }
        for c in &self.creatures {
            if c.rotate_every == 0 {
                return Err(GameError::Config(format!("{}: rotate_every must be >= 1", c.id)));
            }
            if c.catch_radius > c.avoidance_radius {
                log::warn!(
                    "{}: catch radius {} exceeds avoidance radius {}, catches need an escape first",
                    c.id,
                    c.catch_radius,
                    c.avoidance_radius
                );
            }
        }
        Ok(())
    }
}

/// The two knobs exposed to the player at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub base_speed: f32,
    pub catch_time_ms: f64,
}

impl Tuning {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            base_speed: config
                .creatures
                .first()
                .map(|c| c.base_speed)
                .unwrap_or(CreatureParams::default().base_speed),
            catch_time_ms: config.catch_time_secs as f64 * 1000.0,
        }
    }

    pub fn escape_speed(&self) -> f32 {
        self.base_speed * ESCAPE_SPEED_RATIO
    }

    pub fn set_catch_time_secs(&mut self, secs: f32) {
        self.catch_time_ms = secs.max(0.0) as f64 * 1000.0;
    }
}
