//! Autonomous scripts that drive a bot's sensors from the simulation clock.

use std::f32::consts::{PI, TAU};

use crate::error::SimError;
use crate::sensor::Sensor;

/// Highest harmonic in the square-wave series (odd terms only).
const SQUARE_WAVE_TERMS: u32 = 8;

/// Band-limited pulse train in 0..1 with the given duty cycle.
///
/// Sums the odd harmonics up to [`SQUARE_WAVE_TERMS`]; the result overshoots
/// and has rounded edges, so the fraction of time above 0.5 only
/// approximates `duty_cycle`.
pub fn square_wave(t: f32, period: f32, duty_cycle: f32) -> f32 {
    let mut f = duty_cycle;
    for n in (1..=SQUARE_WAVE_TERMS).step_by(2) {
        let n = n as f32;
        f += 2.0 * (n * PI * duty_cycle).sin() / (n * PI) * (TAU * n * t / period).cos();
    }
    f
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behaviour {
    /// Switches a sensor on and off.
    Blinking {
        sensor_index: usize,
        /// Seconds per on/off cycle.
        period: f32,
        /// Fraction of the period spent enabled.
        duty_cycle: f32,
    },
    /// Sweeps a sensor's mount angle between two bounds.
    Oscillate {
        sensor_index: usize,
        period: f32,
        phi_min: f32,
        phi_max: f32,
    },
}

impl Behaviour {
    pub fn blinking(sensor_index: usize, period: f32, duty_cycle: f32) -> Result<Self, SimError> {
        check_period(period)?;
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(SimError::InvalidDutyCycle(duty_cycle));
        }
        Ok(Behaviour::Blinking {
            sensor_index,
            period,
            duty_cycle,
        })
    }

    pub fn oscillate(
        sensor_index: usize,
        period: f32,
        phi_min: f32,
        phi_max: f32,
    ) -> Result<Self, SimError> {
        check_period(period)?;
        Ok(Behaviour::Oscillate {
            sensor_index,
            period,
            phi_min,
            phi_max,
        })
    }

    pub fn sensor_index(&self) -> usize {
        match *self {
            Behaviour::Blinking { sensor_index, .. } | Behaviour::Oscillate { sensor_index, .. } => {
                sensor_index
            }
        }
    }

    /// Apply the script for simulation time `elapsed` (seconds).
    pub fn tick(&self, elapsed: f32, sensors: &mut [Sensor]) {
        let Some(sensor) = sensors.get_mut(self.sensor_index()) else {
            return;
        };
        match *self {
            Behaviour::Blinking {
                period, duty_cycle, ..
            } => {
                if square_wave(elapsed, period, duty_cycle) > 0.5 {
                    sensor.enable();
                } else {
                    sensor.disable();
                }
            }
            Behaviour::Oscillate {
                period,
                phi_min,
                phi_max,
                ..
            } => {
                let phase = (elapsed * TAU / period).sin();
                sensor.mount_angle = phi_min + (phase + 1.0) * (phi_max - phi_min) / 2.0;
            }
        }
    }
}

fn check_period(period: f32) -> Result<(), SimError> {
    if period > 0.0 && period.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidPeriod(period))
    }
}
