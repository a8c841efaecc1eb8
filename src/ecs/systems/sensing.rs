use crate::config::SimConfig;
use crate::ecs::components::{Body, Position, Sensors, Spin};
use crate::material;
use crate::overlay::Overlays;
use crate::sensor::SensorInput;
use crate::terrain::Terrain;

/// Heat, measure and log every sensor of every bot.
///
/// Ambient temperature comes from the terrain under the bot; off the raster
/// it falls back to the configured ambient.
pub fn update(
    world: &mut hecs::World,
    terrain: &Terrain,
    overlays: &mut Overlays,
    config: &SimConfig,
    dt: f32,
    rng: &mut fastrand::Rng,
) {
    for (_, (pos, spin, body, sensors)) in
        world.query_mut::<(&Position, &Spin, &Body, &mut Sensors)>()
    {
        let input = SensorInput {
            position: pos.0,
            phi: spin.phi,
            radius: body.radius,
            dt,
            ambient: material::temperature_at(pos.0, terrain).unwrap_or(config.ambient_temperature),
        };
        for sensor in &mut sensors.0 {
            sensor.run(&input, terrain, overlays, rng);
        }
    }
}
