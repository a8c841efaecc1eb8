pub mod behaviour;
pub mod contact;
pub mod movement;
pub mod sensing;

use crate::config::SimConfig;
use crate::overlay::Overlays;
use crate::stats::{PhaseTimings, SystemPhase};
use crate::terrain::Terrain;

/// Per-tick inputs shared by every system.
pub struct TickContext<'a> {
    pub terrain: &'a Terrain,
    pub config: &'a SimConfig,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Simulated seconds since start.
    pub elapsed: f32,
}

/// Run all bot systems for one tick.
///
/// Every bot is independent of the others, so running each phase over the
/// whole world keeps the per-bot order: contact, movement, behaviour, sensing.
pub fn tick(
    world: &mut hecs::World,
    ctx: &TickContext<'_>,
    overlays: &mut Overlays,
    rng: &mut fastrand::Rng,
    timers: &mut PhaseTimings,
) {
    // 1. Touch test, collision response, rolling
    timers.measure(SystemPhase::Contact, || {
        contact::update(world, ctx.terrain, ctx.config.restitution)
    });

    // 2. Drive, damping, gravity, integration
    timers.measure(SystemPhase::Movement, || movement::integrate(world, ctx.config));

    // 3. Sensor scripts
    timers.measure(SystemPhase::Behaviour, || behaviour::update(world, ctx.elapsed));

    // 4. Heat, rays, buffers, overlays
    timers.measure(SystemPhase::Sensing, || {
        sensing::update(world, ctx.terrain, overlays, ctx.config, ctx.dt, rng)
    });
}
