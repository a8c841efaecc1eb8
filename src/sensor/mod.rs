//! Sensors carried by bots.
//!
//! Every sensor heats up while it runs and cools towards the terrain's
//! ambient temperature. Enabled sensors produce [`Reading`]s each tick, log
//! them into a fixed-size [`DataBuffer`] and mirror that buffer into an
//! overlay raster.

pub mod buffer;
pub mod ray;
pub mod thermal;

use std::f32::consts::{PI, TAU};

use glam::{IVec2, Vec2};

use crate::error::SimError;
use crate::overlay::{Layer, Overlays};
use crate::terrain::Terrain;
use buffer::{DataBuffer, RetentionPolicy};
use ray::Termination;
use thermal::ThermalModel;

/// One logged measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    /// A ray from the bot to the pixel that stopped it.
    Segment { origin: IVec2, hit: IVec2 },
    /// A position fix.
    Point(IVec2),
}

/// How the mount angle relates to the bot's spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount {
    /// Turns with the body: ray angle = mount angle + phi.
    BodyFixed,
    /// Holds its heading: ray angle = mount angle.
    Gyrostabilized,
}

/// Angular spread of a multi-ray sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    /// Rays spaced over [0, 2π).
    Omni,
    /// Rays spaced over [0, π), starting at the mount angle.
    Fan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorKind {
    /// SpectraScan LX1: single laser, stops on ground only.
    Rangefinder { range: f32 },
    /// SpectraScan SX30: laser array, light scatters in the medium.
    Lidar {
        range: f32,
        laser_count: u32,
        sweep: Sweep,
    },
    /// NAV1 InertiaCore: logs a point `reach` body radii from the center.
    InertialTracker { reach: f32 },
}

impl SensorKind {
    pub fn model(&self) -> &'static str {
        match self {
            SensorKind::Rangefinder { .. } => "SpectraScan LX1",
            SensorKind::Lidar { .. } => "SpectraScan SX30",
            SensorKind::InertialTracker { .. } => "NAV1 InertiaCore",
        }
    }

    /// Readings an enabled sensor can produce per tick.
    pub fn samples_per_tick(&self) -> usize {
        match *self {
            SensorKind::Rangefinder { .. } | SensorKind::InertialTracker { .. } => 1,
            SensorKind::Lidar { laser_count, .. } => laser_count as usize,
        }
    }

    pub fn termination(&self) -> Option<Termination> {
        match self {
            SensorKind::Rangefinder { .. } => Some(Termination::Ground),
            SensorKind::Lidar { .. } => Some(Termination::Scattering),
            SensorKind::InertialTracker { .. } => None,
        }
    }

    /// Overlay the readings are drawn into.
    pub fn layer(&self) -> Layer {
        match self {
            SensorKind::InertialTracker { .. } => Layer::Memory,
            _ => Layer::Interpretation,
        }
    }

    /// Ray headings for a sensor pointing at `heading`.
    pub fn ray_angles(&self, heading: f32) -> Vec<f32> {
        match *self {
            SensorKind::Rangefinder { .. } => vec![heading],
            SensorKind::Lidar {
                laser_count, sweep, ..
            } => {
                let span = match sweep {
                    Sweep::Omni => TAU,
                    Sweep::Fan => PI,
                };
                let step = span / laser_count as f32;
                (0..laser_count).map(|i| heading + i as f32 * step).collect()
            }
            SensorKind::InertialTracker { .. } => Vec::new(),
        }
    }

    fn validate(&self) -> Result<(), SimError> {
        let model = self.model();
        match *self {
            SensorKind::Rangefinder { range } => check_range(model, range),
            SensorKind::Lidar {
                range, laser_count, ..
            } => {
                check_range(model, range)?;
                if laser_count == 0 {
                    return Err(SimError::ZeroRayCount { model });
                }
                Ok(())
            }
            SensorKind::InertialTracker { reach } => {
                if !reach.is_finite() {
                    return Err(SimError::ZeroRange { model, range: reach });
                }
                Ok(())
            }
        }
    }
}

fn check_range(model: &'static str, range: f32) -> Result<(), SimError> {
    if range > 0.0 && range.is_finite() {
        Ok(())
    } else {
        Err(SimError::ZeroRange { model, range })
    }
}

/// Bot state a sensor needs for one tick.
#[derive(Debug, Clone, Copy)]
pub struct SensorInput {
    pub position: Vec2,
    pub phi: f32,
    pub radius: f32,
    /// Seconds since the previous tick.
    pub dt: f32,
    /// Ambient temperature under the bot.
    pub ambient: f32,
}

/// Configures a [`Sensor`] before it is validated.
#[derive(Debug, Clone)]
pub struct SensorBuilder {
    kind: SensorKind,
    mount: Mount,
    mount_angle: f32,
    retention_period: f32,
    policy: RetentionPolicy,
    thermal: ThermalModel,
    enabled: bool,
    color: [u8; 3],
}

impl SensorBuilder {
    pub fn mount_angle(mut self, radians: f32) -> Self {
        self.mount_angle = radians;
        self
    }

    pub fn mount(mut self, mount: Mount) -> Self {
        self.mount = mount;
        self
    }

    /// Seconds of readings to keep.
    pub fn retention_period(mut self, seconds: f32) -> Self {
        self.retention_period = seconds;
        self
    }

    pub fn policy(mut self, policy: RetentionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn thermal(mut self, thermal: ThermalModel) -> Self {
        self.thermal = thermal;
        self
    }

    pub fn range(mut self, new_range: f32) -> Self {
        match &mut self.kind {
            SensorKind::Rangefinder { range } | SensorKind::Lidar { range, .. } => {
                *range = new_range
            }
            SensorKind::InertialTracker { .. } => {}
        }
        self
    }

    pub fn sweep(mut self, new_sweep: Sweep) -> Self {
        if let SensorKind::Lidar { sweep, .. } = &mut self.kind {
            *sweep = new_sweep;
        }
        self
    }

    pub fn color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Validate and allocate the data buffer for `tick_rate` ticks/second.
    pub fn build(self, tick_rate: u32) -> Result<Sensor, SimError> {
        let model = self.kind.model();
        self.kind.validate()?;
        if !self.thermal.is_valid() {
            return Err(SimError::InvalidThermal { model });
        }
        let slots =
            self.retention_period * tick_rate as f32 * self.kind.samples_per_tick() as f32;
        let capacity = if slots.is_finite() && slots > 0.0 {
            slots.round() as usize
        } else {
            0
        };
        let buffer =
            DataBuffer::new(capacity, self.policy).ok_or(SimError::EmptyBuffer {
                model,
                retention_period: self.retention_period,
                tick_rate,
            })?;
        Ok(Sensor {
            kind: self.kind,
            mount: self.mount,
            mount_angle: self.mount_angle,
            enabled: self.enabled,
            thermal: self.thermal,
            buffer,
            color: self.color,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Sensor {
    kind: SensorKind,
    mount: Mount,
    /// Radians, relative to the bot for body-fixed mounts.
    pub mount_angle: f32,
    enabled: bool,
    thermal: ThermalModel,
    buffer: DataBuffer<Reading>,
    color: [u8; 3],
}

impl Sensor {
    /// Single-laser rangefinder.
    pub fn rangefinder() -> SensorBuilder {
        SensorBuilder {
            kind: SensorKind::Rangefinder { range: 600.0 },
            mount: Mount::Gyrostabilized,
            mount_angle: 0.0,
            retention_period: 2.0,
            policy: RetentionPolicy::RoundRobin,
            thermal: ThermalModel::new(0.5, 0.05, 900.0, 0.25),
            enabled: true,
            color: [0, 191, 255],
        }
    }

    /// Scattering laser array with `laser_count` rays.
    pub fn lidar(laser_count: u32) -> SensorBuilder {
        SensorBuilder {
            kind: SensorKind::Lidar {
                range: 400.0,
                laser_count,
                sweep: Sweep::Omni,
            },
            mount: Mount::BodyFixed,
            mount_angle: 0.0,
            retention_period: 1.0,
            policy: RetentionPolicy::PickRandom,
            thermal: ThermalModel::new(4.0, 0.2, 900.0, 0.5),
            enabled: true,
            color: [0, 255, 128],
        }
    }

    /// Position logger; leaves a trail in the memory overlay.
    pub fn inertial_tracker() -> SensorBuilder {
        SensorBuilder {
            kind: SensorKind::InertialTracker { reach: 0.7 },
            mount: Mount::BodyFixed,
            mount_angle: 0.0,
            retention_period: 10.0,
            policy: RetentionPolicy::RoundRobin,
            thermal: ThermalModel::new(0.2, 0.02, 900.0, 0.1),
            enabled: true,
            color: [255, 255, 0],
        }
    }

    pub fn kind(&self) -> &SensorKind {
        &self.kind
    }

    pub fn model(&self) -> &'static str {
        self.kind.model()
    }

    pub fn mount(&self) -> Mount {
        self.mount
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn temperature(&self) -> f32 {
        self.thermal.temperature
    }

    pub fn thermal(&self) -> &ThermalModel {
        &self.thermal
    }

    pub fn buffer(&self) -> &DataBuffer<Reading> {
        &self.buffer
    }

    /// Heading of the sensor in world space.
    pub fn heading(&self, phi: f32) -> f32 {
        match self.mount {
            Mount::BodyFixed => self.mount_angle + phi,
            Mount::Gyrostabilized => self.mount_angle,
        }
    }

    /// Take this tick's measurements without logging them.
    pub fn measure(
        &self,
        input: &SensorInput,
        terrain: &Terrain,
        rng: &mut fastrand::Rng,
    ) -> Vec<Reading> {
        let heading = self.heading(input.phi);
        match self.kind {
            SensorKind::InertialTracker { reach } => {
                let at = input.position + Vec2::from_angle(heading) * (reach * input.radius);
                vec![Reading::Point(at.floor().as_ivec2())]
            }
            SensorKind::Rangefinder { range } | SensorKind::Lidar { range, .. } => {
                let Some(termination) = self.kind.termination() else {
                    return Vec::new();
                };
                let origin = input.position.floor().as_ivec2();
                self.kind
                    .ray_angles(heading)
                    .into_iter()
                    .filter_map(|angle| {
                        ray::cast(terrain, input.position, angle, range, termination, rng)
                    })
                    .map(|hit| Reading::Segment { origin, hit })
                    .collect()
            }
        }
    }

    /// Log a reading, erasing whatever it displaces from the overlay.
    pub fn log(&mut self, reading: Reading, overlays: &mut Overlays, rng: &mut fastrand::Rng) {
        let overlay = overlays.layer_mut(self.kind.layer());
        let slot = self.buffer.next_slot(rng);
        if let Some(old) = self.buffer.evict(slot) {
            overlay.erase(&old);
        }
        overlay.stamp(&reading);
        self.buffer.write(slot, reading);
    }

    /// One tick: thermal step always, measurements only while enabled.
    pub fn run(
        &mut self,
        input: &SensorInput,
        terrain: &Terrain,
        overlays: &mut Overlays,
        rng: &mut fastrand::Rng,
    ) {
        self.thermal.step(input.dt, input.ambient, self.enabled);
        if !self.enabled {
            return;
        }
        for reading in self.measure(input, terrain, rng) {
            self.log(reading, overlays, rng);
        }
    }

    /// Forget every logged reading and its overlay marks.
    pub fn clear(&mut self, overlays: &mut Overlays) {
        let overlay = overlays.layer_mut(self.kind.layer());
        for old in self.buffer.drain() {
            overlay.erase(&old);
        }
    }
}
