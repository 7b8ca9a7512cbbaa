//! Runtime configuration for the showcase.
//!
//! Every field has a default taken from `constants.rs`, so a catalog file only
//! needs to mention what it overrides. An empty JSON object is a valid config.

use crate::constants::*;
use crate::error::LoadError;
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub initial_camera: Vec3,
    pub focus_offset: Vec3,
    pub spin_period_sec: f32,
    pub settle_sec: f32,
    pub camera_move_sec: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            initial_camera: INITIAL_CAMERA_POSITION,
            focus_offset: FOCUS_OFFSET,
            spin_period_sec: SPIN_PERIOD_SEC,
            settle_sec: SETTLE_SEC,
            camera_move_sec: CAMERA_MOVE_SEC,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevitationConfig {
    pub amplitude: f32,
    /// Inclusive `[min, max]` range a per-object half-cycle duration is drawn from.
    pub duration_sec: [f32; 2],
    /// Inclusive `[min, max]` range a per-object start delay is drawn from.
    pub delay_sec: [f32; 2],
}

impl Default for LevitationConfig {
    fn default() -> Self {
        Self {
            amplitude: LEVITATE_AMPLITUDE,
            duration_sec: LEVITATE_DURATION_SEC,
            delay_sec: LEVITATE_DELAY_SEC,
        }
    }
}

/// One object placed on the shelf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exhibit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// URL of a GLB model. `None` places a primitive cube instead.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    /// Base color for primitive exhibits.
    #[serde(default = "cube_color")]
    pub color: [f32; 4],
}

fn unit_scale() -> f32 {
    1.0
}

fn cube_color() -> [f32; 4] {
    CUBE_COLOR
}

/// Six face images of the scene background, in +X, -X, +Y, -Y, +Z, -Z order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundConfig {
    pub faces: [String; 6],
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            faces: BACKGROUND_FACES.map(String::from),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowcaseConfig {
    pub interaction: InteractionConfig,
    pub levitation: LevitationConfig,
    /// `null` keeps the plain clear color.
    pub background: Option<BackgroundConfig>,
    pub exhibits: Vec<Exhibit>,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            interaction: InteractionConfig::default(),
            levitation: LevitationConfig::default(),
            background: Some(BackgroundConfig::default()),
            exhibits: default_exhibits(),
        }
    }
}

impl ShowcaseConfig {
    /// Parse and validate a JSON catalog.
    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        let lev = &self.levitation;
        check_range("levitation.duration_sec", lev.duration_sec)?;
        check_range("levitation.delay_sec", lev.delay_sec)?;
        if lev.duration_sec[0] <= 0.0 {
            return Err(LoadError::InvalidConfig(
                "levitation.duration_sec must be positive".into(),
            ));
        }
        let ix = &self.interaction;
        if !(ix.spin_period_sec > 0.0) {
            return Err(LoadError::InvalidConfig(
                "interaction.spin_period_sec must be positive".into(),
            ));
        }
        if ix.settle_sec < 0.0 || ix.camera_move_sec < 0.0 {
            return Err(LoadError::InvalidConfig(
                "interaction durations must not be negative".into(),
            ));
        }
        if let Some(bg) = &self.background {
            if bg.faces.iter().any(|f| f.trim().is_empty()) {
                return Err(LoadError::InvalidConfig(
                    "background.faces entries must be non-empty URLs".into(),
                ));
            }
        }
        for exhibit in &self.exhibits {
            if exhibit.name.trim().is_empty() {
                return Err(LoadError::InvalidConfig("exhibit without a name".into()));
            }
        }
        Ok(())
    }
}

fn check_range(field: &str, [lo, hi]: [f32; 2]) -> Result<(), LoadError> {
    if lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi {
        Ok(())
    } else {
        Err(LoadError::InvalidConfig(format!(
            "{field} must be an ordered, non-negative range (got [{lo}, {hi}])"
        )))
    }
}

pub fn default_exhibits() -> Vec<Exhibit> {
    vec![
        Exhibit {
            name: "NES Zapper".into(),
            description: Some(
                "Light gun released with the Nintendo Entertainment System in 1985. \
                 Pulling the trigger blanks the screen and flashes each target white; \
                 a photodiode in the barrel reports whether it saw the flash."
                    .into(),
            ),
            model: Some("assets/models/nes_zapper.glb".into()),
            position: Vec3::new(-1.5, 0.3, 0.0),
            scale: 1.0,
            color: CUBE_COLOR,
        },
        Exhibit {
            name: "Game Boy".into(),
            description: Some(
                "Nintendo's 1989 handheld. A Sharp LR35902 at 4.19 MHz, a four-shade \
                 reflective LCD and four AA batteries good for roughly thirty hours."
                    .into(),
            ),
            model: Some("assets/models/game_boy.glb".into()),
            position: Vec3::new(0.0, 0.35, 0.0),
            scale: 1.0,
            color: CUBE_COLOR,
        },
        Exhibit {
            name: "Cube".into(),
            description: Some(
                "A plain red unit cube, built in code rather than loaded from a file. \
                 It stays on the shelf even when every model download fails."
                    .into(),
            ),
            model: None,
            position: Vec3::new(1.5, 0.3, 0.0),
            scale: 0.4,
            color: CUBE_COLOR,
        },
    ]
}
