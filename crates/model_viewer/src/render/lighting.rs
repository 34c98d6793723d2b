//! Lighting system
//!
//! The viewer runs exactly one light at a time. [`LightFactory`] maps the
//! user-selected [`LightMode`] to that light; switching modes replaces the
//! light outright, there is no blending between rigs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::foundation::math::Vec3;

/// Light presets selectable from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightMode {
    /// Uniform light from everywhere
    #[default]
    Ambient,
    /// Parallel rays (like sunlight)
    Directional,
    /// Radiates in all directions from a position
    Point,
}

impl LightMode {
    /// Every mode, in UI order
    pub const ALL: [Self; 3] = [Self::Ambient, Self::Directional, Self::Point];

    /// Identifier used by the UI layer and config files
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ambient => "ambient",
            Self::Directional => "directional",
            Self::Point => "point",
        }
    }
}

impl fmt::Display for LightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown light mode identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown light mode: {0}")]
pub struct ParseLightModeError(String);

impl FromStr for LightMode {
    type Err = ParseLightModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseLightModeError(s.to_string()))
    }
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    /// Which preset produced this light
    pub mode: LightMode,
    /// Light color
    pub color: Vec3,
    /// Light intensity
    pub intensity: f32,
    /// World position (directional and point lights)
    pub position: Option<Vec3>,
    /// Point the light aims at (directional lights)
    pub target: Option<Vec3>,
    /// Falloff distance for point lights, 0 for none
    pub range: f32,
}

impl Light {
    /// Unit direction the light travels in, for directional lights
    pub fn direction(&self) -> Option<Vec3> {
        match (self.position, self.target) {
            (Some(from), Some(to)) => (to - from).try_normalize(f32::EPSILON),
            _ => None,
        }
    }
}

/// Factory functions for the viewer's lighting rigs
pub struct LightFactory;

impl LightFactory {
    /// Intensity shared by every preset
    pub const INTENSITY: f32 = 1.0;

    /// Directional light position
    pub const DIRECTIONAL_POSITION: [f32; 3] = [10.0, 10.0, 5.0];

    /// Directional light target
    pub const DIRECTIONAL_TARGET: [f32; 3] = [-5.0, 0.0, 0.0];

    /// Point light position
    pub const POINT_POSITION: [f32; 3] = [50.0, 50.0, 50.0];

    /// The light for a UI-selected mode
    pub fn for_mode(mode: LightMode) -> Light {
        let white = Vec3::new(1.0, 1.0, 1.0);
        match mode {
            LightMode::Ambient => Self::ambient(white, Self::INTENSITY),
            LightMode::Directional => Self::directional(
                Vec3::from(Self::DIRECTIONAL_POSITION),
                Vec3::from(Self::DIRECTIONAL_TARGET),
                white,
                Self::INTENSITY,
            ),
            LightMode::Point => Self::point(Vec3::from(Self::POINT_POSITION), white, Self::INTENSITY, 0.0),
        }
    }

    /// Create an ambient light
    pub fn ambient(color: Vec3, intensity: f32) -> Light {
        Light {
            mode: LightMode::Ambient,
            color,
            intensity,
            position: None,
            target: None,
            range: 0.0,
        }
    }

    /// Create a directional light shining from `position` towards `target`
    pub fn directional(position: Vec3, target: Vec3, color: Vec3, intensity: f32) -> Light {
        Light {
            mode: LightMode::Directional,
            color,
            intensity,
            position: Some(position),
            target: Some(target),
            range: 0.0,
        }
    }

    /// Create a point light
    pub fn point(position: Vec3, color: Vec3, intensity: f32, range: f32) -> Light {
        Light {
            mode: LightMode::Point,
            color,
            intensity,
            position: Some(position),
            target: None,
            range,
        }
    }
}
