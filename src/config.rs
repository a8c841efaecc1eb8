use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Tunable simulation parameters.
///
/// Physics constants are per tick, not per second: the integrator takes one
/// step per tick regardless of `dt`. Only the camera and the thermal model use
/// elapsed wall time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Target ticks per second. Also sizes sensor buffers.
    pub tick_rate: u32,
    /// Vertical acceleration in px/tick².
    pub gravity: f32,
    /// Multiple of the normal velocity removed on impact (2.0 = elastic).
    pub restitution: f32,
    /// Linear velocity factor applied every tick.
    pub linear_damping: f32,
    /// Angular velocity factor applied every tick.
    pub angular_damping: f32,
    /// Fraction of the gap to the target spin closed per tick under drive.
    pub drive_blend: f32,
    /// Scales the drive axis before blending.
    pub drive_gain: f32,
    /// Fallback ambient temperature (°C) when a bot is off the raster.
    pub ambient_temperature: f32,
    pub camera_kp: f32,
    pub camera_ki: f32,
    /// Kept at zero so switching focus does not produce a derivative kick.
    pub camera_kd: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Seed for the simulation RNG. `None` draws one from the OS.
    pub rng_seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            gravity: 0.2,
            restitution: 1.5,
            linear_damping: 0.99,
            angular_damping: 0.95,
            drive_blend: 0.1,
            drive_gain: 1.0,
            ambient_temperature: 25.0,
            camera_kp: 1.0,
            camera_ki: 0.1,
            camera_kd: 0.0,
            viewport_width: 1600.0,
            viewport_height: 900.0,
            rng_seed: None,
        }
    }
}

impl SimConfig {
    /// Parse a JSON document. Missing fields fall back to defaults.
    pub fn from_json_str(text: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.tick_rate == 0 {
            return Err(SimError::InvalidConfig("tick_rate must be non-zero".into()));
        }
        let finite = [
            ("gravity", self.gravity),
            ("restitution", self.restitution),
            ("linear_damping", self.linear_damping),
            ("angular_damping", self.angular_damping),
            ("drive_blend", self.drive_blend),
            ("drive_gain", self.drive_gain),
            ("ambient_temperature", self.ambient_temperature),
            ("camera_kp", self.camera_kp),
            ("camera_ki", self.camera_ki),
            ("camera_kd", self.camera_kd),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!("{name} must be finite")));
            }
        }
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            return Err(SimError::InvalidConfig(
                "viewport dimensions must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Simulation RNG, seeded when a seed is configured.
    pub fn rng(&self) -> fastrand::Rng {
        match self.rng_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(r#"{ "gravity": 0.4, "rng_seed": 7 }"#).unwrap();
        assert_eq!(config.gravity, 0.4);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.tick_rate, 60);
    }

    #[test]
    fn zero_tick_rate_rejected() {
        let err = SimConfig::from_json_str(r#"{ "tick_rate": 0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn malformed_json_rejected() {
        let err = SimConfig::from_json_str("{ gravity: }").unwrap_err();
        assert!(matches!(err, SimError::ConfigParse(_)));
    }

    #[test]
    fn seeded_rngs_agree() {
        let config = SimConfig {
            rng_seed: Some(42),
            ..SimConfig::default()
        };
        assert_eq!(config.rng().u64(..), config.rng().u64(..));
    }
}
