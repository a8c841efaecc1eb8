use glam::Vec2;

use crate::behaviour::Behaviour;
use crate::sensor::Sensor;

/// World position in terrain pixels.
#[derive(Debug, Clone, Copy)]
pub struct Position(pub Vec2);

/// Velocity in pixels/tick.
#[derive(Debug, Clone, Copy)]
pub struct Velocity(pub Vec2);

/// Rotation state.
#[derive(Debug, Clone, Copy, Default)]
pub struct Spin {
    /// Radians/tick.
    pub omega: f32,
    /// Orientation, radians.
    pub phi: f32,
}

/// Rigid sphere properties.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    /// Pixels.
    pub radius: f32,
    /// Traction multiplier; higher rolls more, skids less.
    pub friction: f32,
    pub color: [u8; 3],
}

/// Result of the last ground contact test.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Unit vector towards the contacted ground, or zero.
    pub direction: Vec2,
    /// Nearest ground pixel found; equals the radius when nothing was hit.
    pub closest_pixel_distance: f32,
    pub touching: bool,
}

impl Contact {
    pub fn clear(radius: f32) -> Self {
        Self {
            direction: Vec2::ZERO,
            closest_pixel_distance: radius,
            touching: false,
        }
    }
}

/// Bound control input: turn intensity in [-1, 1], negative is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct Drive {
    pub axis: f32,
}

impl Drive {
    /// Drive input is applied this tick.
    pub fn is_accelerating(&self) -> bool {
        self.axis != 0.0
    }
}

/// Sensors owned by a bot, in toggle-key order.
#[derive(Debug, Clone, Default)]
pub struct Sensors(pub Vec<Sensor>);

/// Scripts owned by a bot.
#[derive(Debug, Clone, Default)]
pub struct Behaviours(pub Vec<Behaviour>);

/// Display name.
#[derive(Debug, Clone)]
pub struct BotName(pub String);

/// The camera may focus this bot.
#[derive(Debug, Clone, Copy)]
pub struct CameraEligible;
