use glam::Vec2;

use crate::config::SimConfig;
use crate::ecs::components::{Drive, Position, Spin, Velocity};

/// Blend spin towards full left/right rotation by the drive axis.
pub fn apply_drive(spin: &mut Spin, drive: &Drive, config: &SimConfig) {
    if !drive.is_accelerating() {
        return;
    }
    let axis = drive.axis.clamp(-1.0, 1.0);
    let target = axis.signum();
    let gain = axis.abs() * config.drive_gain;
    spin.omega += gain * (target - spin.omega) * config.drive_blend;
}

/// One semi-implicit Euler step: drive, damping, gravity, then integrate
/// orientation and position.
pub fn step(pos: &mut Vec2, vel: &mut Vec2, spin: &mut Spin, drive: Option<&Drive>, config: &SimConfig) {
    if let Some(drive) = drive {
        apply_drive(spin, drive, config);
    }

    // Drag
    *vel *= config.linear_damping;
    spin.omega *= config.angular_damping;

    vel.y += config.gravity;

    spin.phi += spin.omega;
    *pos += *vel;
}

/// Integrate every bot, in contact or not.
pub fn integrate(world: &mut hecs::World, config: &SimConfig) {
    for (_, (pos, vel, spin, drive)) in
        world.query_mut::<(&mut Position, &mut Velocity, &mut Spin, Option<&Drive>)>()
    {
        step(&mut pos.0, &mut vel.0, spin, drive, config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn weightless() -> SimConfig {
        SimConfig {
            gravity: 0.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn damping_decays_velocity() {
        let config = weightless();
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::new(5.0, -3.0);
        let mut spin = Spin {
            omega: 0.8,
            phi: 0.0,
        };
        for _ in 0..2000 {
            step(&mut pos, &mut vel, &mut spin, None, &config);
        }
        assert!(vel.length() < 1e-6);
        assert!(spin.omega.abs() < 1e-6);
        // Geometric series: 5 * 0.99 / 0.01
        assert_relative_eq!(pos.x, 495.0, max_relative = 1e-3);
    }

    #[test]
    fn gravity_accumulates() {
        let config = SimConfig::default();
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::ZERO;
        let mut spin = Spin::default();
        step(&mut pos, &mut vel, &mut spin, None, &config);
        step(&mut pos, &mut vel, &mut spin, None, &config);
        assert_relative_eq!(vel.y, 0.2 * 0.99 + 0.2, epsilon = 1e-6);
        assert_relative_eq!(pos.y, 0.2 + 0.398, epsilon = 1e-6);
    }

    #[test]
    fn drive_pulls_spin_towards_target() {
        let config = weightless();
        let mut spin = Spin::default();
        apply_drive(&mut spin, &Drive { axis: 1.0 }, &config);
        assert_relative_eq!(spin.omega, 0.1);
        apply_drive(&mut spin, &Drive { axis: -0.5 }, &config);
        assert_relative_eq!(spin.omega, 0.1 + 0.5 * (-1.0 - 0.1) * 0.1);
    }

    #[test]
    fn idle_drive_changes_nothing() {
        let config = weightless();
        let mut spin = Spin {
            omega: 0.3,
            phi: 0.0,
        };
        apply_drive(&mut spin, &Drive::default(), &config);
        assert_eq!(spin.omega, 0.3);
    }

    #[test]
    fn held_drive_saturates_below_unit_spin() {
        let config = weightless();
        let mut pos = Vec2::ZERO;
        let mut vel = Vec2::ZERO;
        let mut spin = Spin::default();
        let drive = Drive { axis: 1.0 };
        for _ in 0..500 {
            step(&mut pos, &mut vel, &mut spin, Some(&drive), &config);
        }
        // Fixed point of omega = 0.95 * (omega + 0.1 * (1 - omega)).
        assert_relative_eq!(spin.omega, 0.095 / 0.145, max_relative = 1e-4);
        assert!(spin.phi > 0.0);
    }
}
