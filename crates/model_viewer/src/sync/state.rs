//! Interactive view state
//!
//! [`ViewState`] is the single source of truth for what the user asked to
//! see. The controller mutates it; the scene builder and the render loop only
//! read it.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use thiserror::Error;

use crate::assets::AssetHandle;
use crate::config::ViewerConfig;
use crate::foundation::color::Color;
use crate::render::lighting::LightMode;

/// Accumulated object rotation in radians
///
/// Angles accumulate without wrapping, so ten quarter turns read as
/// `5π`, not `π`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rotation {
    /// Pitch around X
    pub x: f32,
    /// Yaw around Y
    pub y: f32,
}

impl Rotation {
    /// No rotation
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a rotation
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Rotation {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Rotation {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Rotate buttons of the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateDirection {
    /// +X
    Up,
    /// −X
    Down,
    /// +Y
    Left,
    /// −Y
    Right,
}

impl RotateDirection {
    /// Rotation delta of one step of `angle` radians
    pub fn delta(self, angle: f32) -> Rotation {
        match self {
            Self::Up => Rotation::new(angle, 0.0),
            Self::Down => Rotation::new(-angle, 0.0),
            Self::Left => Rotation::new(0.0, angle),
            Self::Right => Rotation::new(0.0, -angle),
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for RotateDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown rotate direction identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown rotate direction: {0}")]
pub struct ParseDirectionError(String);

impl FromStr for RotateDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Up, Self::Down, Self::Left, Self::Right]
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDirectionError(s.to_string()))
    }
}

/// Everything the user can change about the view
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Asset to show, if one was picked
    pub asset: Option<AssetHandle>,
    /// Absolute uniform scale, always positive
    pub scale: f32,
    /// Clear color of the render target
    pub background_color: Color,
    /// Active lighting rig
    pub light_mode: LightMode,
    /// Accumulated object rotation
    pub rotation: Rotation,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            asset: None,
            scale: 1.0,
            background_color: Color::WHITE,
            light_mode: LightMode::Ambient,
            rotation: Rotation::ZERO,
        }
    }
}

impl ViewState {
    /// Initial state for a configured viewer
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            background_color: config.initial_background,
            light_mode: config.initial_light_mode,
            ..Self::default()
        }
    }

    /// Switch to a new asset, resetting scale and rotation
    pub fn reset_for_asset(&mut self, asset: AssetHandle) {
        self.asset = Some(asset);
        self.scale = 1.0;
        self.rotation = Rotation::ZERO;
    }
}
