use glam::{IVec2, Vec2};

use crate::geometry::{ray_endpoint, rasterize_line};
use crate::material;
use crate::terrain::Terrain;

/// What stops a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// First ground pixel.
    Ground,
    /// Each pixel scatters with its material's probability.
    Scattering,
}

/// Walk from `origin` along `angle` for up to `range` pixels.
///
/// Returns the pixel that stopped the ray, or `None` when the ray reached its
/// end or left the raster first.
pub fn cast(
    terrain: &Terrain,
    origin: Vec2,
    angle: f32,
    range: f32,
    termination: Termination,
    rng: &mut fastrand::Rng,
) -> Option<IVec2> {
    let end = ray_endpoint(origin, range, angle);
    for pixel in rasterize_line(origin, end) {
        let color = terrain.get(pixel)?;
        let stop = match termination {
            Termination::Ground => material::is_ground(color),
            Termination::Scattering => material::is_light_scattering(color, rng),
        };
        if stop {
            return Some(pixel);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    const AIR: [u8; 4] = [20, 255, 255, 255];
    const ROCK: [u8; 4] = [0, 0, 0, 255];

    fn wall_at_x(x_wall: u32) -> Terrain {
        Terrain::from_fn(100, 50, |x, _| if x >= x_wall { ROCK } else { AIR })
    }

    #[test]
    fn ground_ray_hits_first_solid_pixel() {
        let mut rng = fastrand::Rng::with_seed(0);
        let terrain = wall_at_x(60);
        let hit = cast(&terrain, Vec2::new(20.5, 25.5), 0.0, 80.0, Termination::Ground, &mut rng);
        assert_eq!(hit, Some(IVec2::new(60, 25)));
    }

    #[test]
    fn short_ray_misses() {
        let mut rng = fastrand::Rng::with_seed(0);
        let terrain = wall_at_x(60);
        let hit = cast(&terrain, Vec2::new(20.5, 25.5), 0.0, 30.0, Termination::Ground, &mut rng);
        assert_eq!(hit, None);
    }

    #[test]
    fn ray_leaving_raster_yields_nothing() {
        let mut rng = fastrand::Rng::with_seed(0);
        let terrain = wall_at_x(60);
        let hit = cast(&terrain, Vec2::new(20.5, 25.5), PI, 500.0, Termination::Ground, &mut rng);
        assert_eq!(hit, None);
        let hit = cast(&terrain, Vec2::new(20.5, 25.5), FRAC_PI_2, 500.0, Termination::Ground, &mut rng);
        assert_eq!(hit, None);
    }

    #[test]
    fn clear_air_never_scatters() {
        let mut rng = fastrand::Rng::with_seed(5);
        let terrain = Terrain::from_fn(64, 64, |_, _| AIR);
        for _ in 0..50 {
            let hit = cast(&terrain, Vec2::new(32.0, 32.0), 1.0, 20.0, Termination::Scattering, &mut rng);
            assert_eq!(hit, None);
        }
    }

    #[test]
    fn fog_scatters_before_the_wall() {
        let mut rng = fastrand::Rng::with_seed(5);
        // Dense fog from x=30, rock from x=90.
        let terrain = Terrain::from_fn(100, 10, |x, _| match x {
            0..=29 => AIR,
            30..=89 => [20, 40, 255, 255],
            _ => ROCK,
        });
        let mut early = 0;
        for _ in 0..100 {
            let hit = cast(&terrain, Vec2::new(5.0, 5.0), 0.0, 94.0, Termination::Scattering, &mut rng)
                .expect("rock stops every ray");
            assert!(hit.x >= 30);
            if hit.x < 90 {
                early += 1;
            }
        }
        assert!(early > 90);
    }
}
