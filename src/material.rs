//! Physical meaning of terrain pixel channels.
//!
//! The red channel is ambient temperature in °C, the green channel is how
//! transparent a pixel is to laser light, and pure black is solid ground.

use glam::Vec2;
use once_cell::sync::Lazy;

use crate::terrain::{Rgba, Terrain};

/// Channel carrying ambient temperature.
pub const HEAT_CHANNEL: usize = 0;
/// Channel carrying scatter transparency: 0 always scatters, 255 never does.
pub const SCATTER_CHANNEL: usize = 1;
/// Highest RGB channel value still classified as ground.
pub const GROUND_CHANNEL_MAX: u8 = 0;

static SCATTER_TABLE: Lazy<[f32; 256]> = Lazy::new(|| {
    let mut table = [0.0; 256];
    for (value, slot) in table.iter_mut().enumerate() {
        let transparency = value as f32 / 255.0;
        *slot = (1.0 - transparency) * (1.0 - transparency);
    }
    table
});

/// Solid, collidable pixel.
pub fn is_ground(color: Rgba) -> bool {
    color[0] <= GROUND_CHANNEL_MAX
        && color[1] <= GROUND_CHANNEL_MAX
        && color[2] <= GROUND_CHANNEL_MAX
}

/// `(1 - value/255)^2`, from a precomputed table.
pub fn scattering_probability(value: u8) -> f32 {
    SCATTER_TABLE[value as usize]
}

/// Bernoulli draw: does this pixel scatter a laser passing through it?
pub fn is_light_scattering(color: Rgba, rng: &mut fastrand::Rng) -> bool {
    rng.f32() < scattering_probability(color[SCATTER_CHANNEL])
}

/// Ambient temperature under `point`, or `None` off the raster.
pub fn temperature_at(point: Vec2, terrain: &Terrain) -> Option<f32> {
    terrain
        .sample(point)
        .map(|color| f32::from(color[HEAT_CHANNEL]))
}
