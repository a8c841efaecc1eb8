//! The simulation context: world, terrain, overlays, camera and RNG.

use glam::Vec2;
use serde::Serialize;

use crate::behaviour::Behaviour;
use crate::camera::{Camera, FocusTarget};
use crate::config::SimConfig;
use crate::ecs::components::{
    Behaviours, Body, BotName, CameraEligible, Contact, Drive, Position, Sensors, Spin, Velocity,
};
use crate::ecs::systems::{self, TickContext};
use crate::error::SimError;
use crate::geometry::ViewTransform;
use crate::overlay::Overlays;
use crate::sensor::{Reading, SensorBuilder};
use crate::stats::{FrameStats, PhaseTimings, Performance, SystemPhase};
use crate::terrain::Terrain;

/// Everything needed to spawn one bot.
#[derive(Debug, Clone)]
pub struct BotSpec {
    pub name: String,
    pub position: Vec2,
    pub radius: f32,
    pub friction: f32,
    pub color: [u8; 3],
    /// Built at spawn time against the simulation's tick rate.
    pub sensors: Vec<SensorBuilder>,
    pub behaviours: Vec<Behaviour>,
    /// Accepts drive input.
    pub controllable: bool,
    /// Joins the camera's focus cycle.
    pub focusable: bool,
}

impl BotSpec {
    pub fn new(name: impl Into<String>, position: Vec2, radius: f32) -> Self {
        Self {
            name: name.into(),
            position,
            radius,
            friction: 1.0,
            color: [128, 128, 128],
            sensors: Vec::new(),
            behaviours: Vec::new(),
            controllable: false,
            focusable: false,
        }
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn sensor(mut self, sensor: SensorBuilder) -> Self {
        self.sensors.push(sensor);
        self
    }

    pub fn behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviours.push(behaviour);
        self
    }

    pub fn controllable(mut self) -> Self {
        self.controllable = true;
        self
    }

    pub fn focusable(mut self) -> Self {
        self.focusable = true;
        self
    }

    fn validate(&self) -> Result<(), SimError> {
        if !(self.radius >= 1.0 && self.radius.is_finite()) {
            return Err(SimError::InvalidConfig(format!(
                "{}: radius must be at least one pixel, got {}",
                self.name, self.radius
            )));
        }
        if !self.position.is_finite() || !self.friction.is_finite() {
            return Err(SimError::InvalidConfig(format!(
                "{}: position and friction must be finite",
                self.name
            )));
        }
        for behaviour in &self.behaviours {
            let index = behaviour.sensor_index();
            if index >= self.sensors.len() {
                return Err(SimError::NoSuchSensor {
                    index,
                    count: self.sensors.len(),
                });
            }
        }
        Ok(())
    }
}

/// Read-only view of one sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorView {
    pub model: &'static str,
    pub enabled: bool,
    /// °C, rounded to one decimal.
    pub temperature: f32,
    /// Logged readings, oldest first.
    pub readings: Vec<Reading>,
}

/// Read-only view of one bot, for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct BotView {
    pub entity: hecs::Entity,
    pub name: String,
    pub position: Vec2,
    pub phi: f32,
    pub radius: f32,
    pub color: [u8; 3],
    pub touching: bool,
    /// In the camera's focus cycle.
    pub focusable: bool,
    pub sensors: Vec<SensorView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorHousekeeping {
    pub model: &'static str,
    pub enabled: bool,
    pub temperature: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BotHousekeeping {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub omega: f32,
    pub phi: f32,
    pub sensors: Vec<SensorHousekeeping>,
}

/// Serializable status snapshot. Figures are rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Housekeeping {
    pub ticks: u64,
    pub elapsed: f32,
    pub bots: Vec<BotHousekeeping>,
    pub performance: Performance,
}

fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

pub struct SimulationContext {
    world: hecs::World,
    /// Spawn order; bots are never despawned.
    bots: Vec<hecs::Entity>,
    terrain: Terrain,
    overlays: Overlays,
    camera: Camera,
    rng: fastrand::Rng,
    config: SimConfig,
    elapsed: f32,
    ticks: u64,
    frame_stats: FrameStats,
    timers: PhaseTimings,
}

impl SimulationContext {
    pub fn new(config: SimConfig, terrain: Terrain) -> Result<Self, SimError> {
        config.validate()?;
        let overlays = Overlays::new(terrain.width(), terrain.height());
        let center = Vec2::new(terrain.width() as f32, terrain.height() as f32) / 2.0;
        let camera = Camera::from_config(center, &config);
        log::info!(
            "Simulation ready: {}x{} terrain, {} ticks/s, seed {:?}",
            terrain.width(),
            terrain.height(),
            config.tick_rate,
            config.rng_seed,
        );
        Ok(Self {
            world: hecs::World::new(),
            bots: Vec::new(),
            terrain,
            overlays,
            camera,
            rng: config.rng(),
            config,
            elapsed: 0.0,
            ticks: 0,
            frame_stats: FrameStats::new(),
            timers: PhaseTimings::new(),
        })
    }

    /// Add a bot. Focusable bots join the end of the camera cycle; the first
    /// one also snaps the camera onto itself.
    pub fn spawn_bot(&mut self, spec: BotSpec) -> Result<hecs::Entity, SimError> {
        spec.validate()?;
        let body = Body {
            radius: spec.radius,
            friction: spec.friction,
            color: spec.color,
        };
        let sensors = spec
            .sensors
            .into_iter()
            .map(|sensor| sensor.build(self.config.tick_rate))
            .collect::<Result<Vec<_>, _>>()?;
        let sensor_count = sensors.len();

        let mut builder = hecs::EntityBuilder::new();
        builder
            .add(Position(spec.position))
            .add(Velocity(Vec2::ZERO))
            .add(Spin::default())
            .add(body)
            .add(Contact::clear(spec.radius))
            .add(Sensors(sensors))
            .add(Behaviours(spec.behaviours))
            .add(BotName(spec.name.clone()));
        if spec.controllable {
            builder.add(Drive::default());
        }
        if spec.focusable {
            builder.add(CameraEligible);
        }
        let entity = self.world.spawn(builder.build());
        self.bots.push(entity);

        if self
            .world
            .entity(entity)
            .is_ok_and(|bot| bot.has::<CameraEligible>())
        {
            self.camera.register(FocusTarget::Bot(entity));
            if self.camera.targets().len() == 1 {
                self.camera.aim(&self.world);
                self.camera.position = self.camera.goal;
            }
        }

        log::info!(
            "Spawned {} at ({:.0}, {:.0}) with {} sensors",
            spec.name,
            spec.position.x,
            spec.position.y,
            sensor_count,
        );
        Ok(entity)
    }

    /// Advance the simulation by one tick of `dt` seconds.
    ///
    /// Physics takes one fixed step per call; `dt` feeds the camera, the
    /// thermal model and the behaviour clock. A negative or non-finite `dt`
    /// is treated as zero, so the clock and temperatures hold still.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            log::warn!("Ignoring tick duration {dt}");
            0.0
        };
        self.frame_stats.record_frame(f64::from(dt));
        self.elapsed += dt;
        self.ticks += 1;

        let camera = &mut self.camera;
        let world = &self.world;
        self.timers.measure(SystemPhase::Camera, || {
            camera.aim(world);
            camera.update(dt);
        });

        let ctx = TickContext {
            terrain: &self.terrain,
            config: &self.config,
            dt,
            elapsed: self.elapsed,
        };
        systems::tick(
            &mut self.world,
            &ctx,
            &mut self.overlays,
            &mut self.rng,
            &mut self.timers,
        );
    }

    /// Set the turn intensity of a controllable bot, clamped to [-1, 1].
    pub fn set_drive(&mut self, entity: hecs::Entity, axis: f32) -> Result<(), SimError> {
        let mut drive = self
            .world
            .get::<&mut Drive>(entity)
            .map_err(|_| SimError::NotABot)?;
        drive.axis = if axis.is_nan() {
            log::warn!("Ignoring NaN drive input");
            0.0
        } else {
            axis.clamp(-1.0, 1.0)
        };
        Ok(())
    }

    /// Flip sensor `index` of a bot on or off.
    pub fn toggle_sensor(&mut self, entity: hecs::Entity, index: usize) -> Result<(), SimError> {
        let mut query = self
            .world
            .query_one::<(&BotName, &mut Sensors)>(entity)
            .map_err(|_| SimError::NotABot)?;
        let (name, sensors) = query.get().ok_or(SimError::NotABot)?;
        let count = sensors.0.len();
        let Some(sensor) = sensors.0.get_mut(index) else {
            log::warn!("{}: no sensor {} to toggle (has {})", name.0, index, count);
            return Err(SimError::NoSuchSensor { index, count });
        };
        sensor.toggle();
        log::debug!(
            "{}: sensor {} ({}) {}",
            name.0,
            index,
            sensor.model(),
            if sensor.is_enabled() { "enabled" } else { "disabled" },
        );
        Ok(())
    }

    pub fn focus_next(&mut self) {
        self.camera.focus_next(&self.world);
    }

    pub fn focus_previous(&mut self) {
        self.camera.focus_previous(&self.world);
    }

    /// All bots in spawn order.
    pub fn bots(&self) -> Vec<BotView> {
        self.bots
            .iter()
            .filter_map(|&entity| {
                let mut query = self
                    .world
                    .query_one::<(
                        &BotName,
                        &Position,
                        &Spin,
                        &Body,
                        &Contact,
                        &Sensors,
                        Option<&CameraEligible>,
                    )>(entity)
                    .ok()?;
                let (name, pos, spin, body, contact, sensors, eligible) = query.get()?;
                let view = BotView {
                    entity,
                    name: name.0.clone(),
                    position: pos.0,
                    phi: spin.phi,
                    radius: body.radius,
                    color: body.color,
                    touching: contact.touching,
                    focusable: eligible.is_some(),
                    sensors: sensors
                        .0
                        .iter()
                        .map(|s| SensorView {
                            model: s.model(),
                            enabled: s.is_enabled(),
                            temperature: round1(s.temperature()),
                            readings: s.buffer().chronological().into_iter().copied().collect(),
                        })
                        .collect(),
                };
                Some(view)
            })
            .collect()
    }

    pub fn housekeeping(&self) -> Housekeeping {
        let bots = self
            .bots
            .iter()
            .filter_map(|&entity| {
                let mut query = self
                    .world
                    .query_one::<(&BotName, &Position, &Velocity, &Spin, &Sensors)>(entity)
                    .ok()?;
                let (name, pos, vel, spin, sensors) = query.get()?;
                let bot = BotHousekeeping {
                    name: name.0.clone(),
                    x: round1(pos.0.x),
                    y: round1(pos.0.y),
                    vx: round1(vel.0.x),
                    vy: round1(vel.0.y),
                    omega: round1(spin.omega),
                    phi: round1(spin.phi),
                    sensors: sensors
                        .0
                        .iter()
                        .map(|s| SensorHousekeeping {
                            model: s.model(),
                            enabled: s.is_enabled(),
                            temperature: round1(s.temperature()),
                        })
                        .collect(),
                };
                Some(bot)
            })
            .collect();
        let perf = self.frame_stats.performance();
        Housekeeping {
            ticks: self.ticks,
            elapsed: round1(self.elapsed),
            bots,
            performance: Performance {
                fps: round1(perf.fps),
                fps_min: round1(perf.fps_min),
                fps_max: round1(perf.fps_max),
            },
        }
    }

    pub fn world_offset(&self) -> Vec2 {
        self.camera.world_offset(self.config.viewport())
    }

    pub fn view(&self) -> ViewTransform {
        self.camera.view(self.config.viewport())
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn overlays(&self) -> &Overlays {
        &self.overlays
    }

    /// For clearing overlays between frames.
    pub fn overlays_mut(&mut self) -> &mut Overlays {
        &mut self.overlays
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Simulated seconds since start.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn timers(&self) -> &PhaseTimings {
        &self.timers
    }
}
