//! Demo cast and a procedural map for them to roll around in.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use crate::behaviour::Behaviour;
use crate::error::SimError;
use crate::sensor::Sensor;
use crate::sim::{BotSpec, SimulationContext};
use crate::terrain::{Rgba, Terrain};

pub mod palette {
    pub const DARK: [u8; 3] = [40, 40, 40];
    pub const PINK: [u8; 3] = [219, 112, 147];
    pub const ORANGE: [u8; 3] = [255, 165, 0];
    pub const BLUE: [u8; 3] = [0, 191, 255];
    pub const YELLOW: [u8; 3] = [255, 255, 0];
}

/// Clear air at room temperature.
const SKY: Rgba = [25, 255, 200, 255];
/// Scattering medium.
const FOG: Rgba = [25, 40, 200, 255];
const WARM: Rgba = [90, 255, 120, 255];
const ROCK: Rgba = [0, 0, 0, 255];

/// Thickness of the side walls.
const WALL: u32 = 8;

/// A bowl-shaped basin with walls, a floating ledge, a fog band and a warm
/// pocket on the right.
pub fn demo_terrain(width: u32, height: u32) -> Terrain {
    let w = width as f32;
    let h = height as f32;
    let cx = w / 2.0;
    Terrain::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f32, y as f32);
        let u = (fx - cx) / cx;
        let floor = h * (0.9 - 0.35 * u * u);
        let on_ledge = (0.12..0.32).contains(&(fx / w)) && (0.5..0.52).contains(&(fy / h));

        if x < WALL || x >= width.saturating_sub(WALL) || fy >= floor || on_ledge {
            ROCK
        } else if (0.33..0.42).contains(&(fy / h)) {
            FOG
        } else if (0.68..0.88).contains(&(fx / w)) {
            WARM
        } else {
            SKY
        }
    })
}

/// Entities created by [`spawn_demo`].
#[derive(Debug, Clone)]
pub struct Roster {
    /// The bot bound to the primary controls.
    pub player: hecs::Entity,
    /// Every spawned bot, player first.
    pub all: Vec<hecs::Entity>,
}

/// Spawn the demo cast onto a simulation built over [`demo_terrain`].
///
/// Positions are relative to the terrain size.
pub fn spawn_demo(sim: &mut SimulationContext) -> Result<Roster, SimError> {
    let size = Vec2::new(sim.terrain().width() as f32, sim.terrain().height() as f32);
    let at = |fx: f32, fy: f32| Vec2::new(fx, fy) * size;

    let player = sim.spawn_bot(
        BotSpec::new("player", at(0.5, 0.22), 20.0)
            .color(palette::DARK)
            .sensor(Sensor::inertial_tracker().color(palette::YELLOW))
            .sensor(Sensor::rangefinder().color(palette::BLUE).disabled())
            .sensor(Sensor::lidar(16).color(palette::BLUE))
            .controllable()
            .focusable(),
    )?;

    let mut lx1s = BotSpec::new("player two", at(0.44, 0.3), 20.0);
    for i in 0..3 {
        lx1s = lx1s.sensor(Sensor::rangefinder().mount_angle(i as f32 * PI / 3.0));
    }
    let player_two = sim.spawn_bot(lx1s.controllable().focusable())?;

    let aros = sim.spawn_bot(
        BotSpec::new("Aros", at(0.4, 0.3), 30.0)
            .color([10, 10, 10])
            .sensor(Sensor::lidar(16).color(palette::ORANGE))
            .sensor(Sensor::inertial_tracker().color(palette::ORANGE))
            .behaviour(Behaviour::blinking(0, 0.5, 0.2)?)
            .controllable()
            .focusable(),
    )?;

    let skiv = sim.spawn_bot(
        BotSpec::new("Skiv", at(0.22, 0.46), 10.0)
            .color([20, 20, 20])
            .sensor(Sensor::inertial_tracker().color(palette::PINK))
            .sensor(Sensor::inertial_tracker().color(palette::PINK).mount_angle(PI))
            .sensor(Sensor::rangefinder().color(palette::PINK).mount_angle(FRAC_PI_2))
            .sensor(
                Sensor::rangefinder()
                    .color(palette::PINK)
                    .mount_angle(3.0 * FRAC_PI_2),
            )
            .focusable(),
    )?;

    let sweep = 20f32.to_radians();
    let elevator = sim.spawn_bot(
        BotSpec::new("elevator", at(0.78, 0.45), 15.0)
            .color([50, 50, 50])
            .sensor(
                Sensor::rangefinder()
                    .color(palette::YELLOW)
                    .retention_period(0.5)
                    .mount_angle(FRAC_PI_2),
            )
            .sensor(
                Sensor::rangefinder()
                    .color(palette::YELLOW)
                    .retention_period(0.5)
                    .mount_angle(3.0 * FRAC_PI_2),
            )
            .behaviour(Behaviour::oscillate(0, 2.0, FRAC_PI_2 - sweep, FRAC_PI_2 + sweep)?)
            .behaviour(Behaviour::oscillate(
                1,
                2.0,
                3.0 * FRAC_PI_2 - sweep,
                3.0 * FRAC_PI_2 + sweep,
            )?)
            .focusable(),
    )?;

    Ok(Roster {
        player,
        all: vec![player, player_two, aros, skiv, elevator],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::material;
    use glam::IVec2;

    #[test]
    fn terrain_layout() {
        let t = demo_terrain(1600, 900);
        assert!(t.is_ground(IVec2::new(800, 899)));
        assert!(t.is_ground(IVec2::new(2, 100)));
        assert!(!t.is_ground(IVec2::new(800, 100)));
        // Basin floor is lower in the middle than at the rim.
        assert!(!t.is_ground(IVec2::new(800, 700)));
        assert!(t.is_ground(IVec2::new(100, 700)));

        let fog = t.get(IVec2::new(800, 340)).unwrap();
        assert!(material::scattering_probability(fog[material::SCATTER_CHANNEL]) > 0.5);
        let warm = material::temperature_at(Vec2::new(1200.0, 200.0), &t).unwrap();
        assert_eq!(warm, 90.0);
    }

    #[test]
    fn demo_cast_spawns_and_falls() {
        let config = SimConfig {
            rng_seed: Some(1),
            ..SimConfig::default()
        };
        let mut sim = SimulationContext::new(config, demo_terrain(1600, 900)).unwrap();
        let roster = spawn_demo(&mut sim).unwrap();
        assert_eq!(roster.all.len(), 5);
        assert_eq!(roster.all[0], roster.player);
        assert_eq!(sim.camera().targets().len(), 5);

        let mut landed = false;
        for _ in 0..300 {
            sim.tick(1.0 / 60.0);
            landed |= sim.bots()[0].touching;
        }
        assert!(landed);
        sim.set_drive(roster.player, -1.0).unwrap();
        sim.tick(1.0 / 60.0);
    }
}
