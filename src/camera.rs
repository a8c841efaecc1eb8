//! PID-driven camera that follows a cycle of focus targets.

use glam::Vec2;

use crate::config::SimConfig;
use crate::ecs::components::Position;
use crate::geometry::ViewTransform;

/// Something the camera can look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusTarget {
    Bot(hecs::Entity),
    Point(Vec2),
}

impl FocusTarget {
    /// Where the target is now; `None` for a bot that no longer has a position.
    pub fn resolve(&self, world: &hecs::World) -> Option<Vec2> {
        match *self {
            FocusTarget::Bot(entity) => world.get::<&Position>(entity).ok().map(|p| p.0),
            FocusTarget::Point(p) => Some(p),
        }
    }
}

/// One axis of the position controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PidAxis {
    pub integral: f32,
    pub prev_error: f32,
}

impl PidAxis {
    fn step(&mut self, error: f32, dt: f32, (kp, ki, kd): (f32, f32, f32)) -> f32 {
        self.integral += error * dt;
        let derivative = (error - self.prev_error) / dt;
        self.prev_error = error;
        (kp * error + ki * self.integral + kd * derivative) * dt
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec2,
    pub goal: Vec2,
    kp: f32,
    ki: f32,
    kd: f32,
    x: PidAxis,
    y: PidAxis,
    targets: Vec<FocusTarget>,
    current: usize,
}

impl Camera {
    pub fn new(position: Vec2, kp: f32, ki: f32, kd: f32) -> Self {
        Self {
            position,
            goal: position,
            kp,
            ki,
            kd,
            x: PidAxis::default(),
            y: PidAxis::default(),
            targets: Vec::new(),
            current: 0,
        }
    }

    pub fn from_config(position: Vec2, config: &SimConfig) -> Self {
        Self::new(position, config.camera_kp, config.camera_ki, config.camera_kd)
    }

    /// Append a target. The first registered target becomes current.
    pub fn register(&mut self, target: FocusTarget) {
        self.targets.push(target);
    }

    pub fn targets(&self) -> &[FocusTarget] {
        &self.targets
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_target(&self) -> Option<FocusTarget> {
        self.targets.get(self.current).copied()
    }

    /// Point the goal at the current target's position.
    pub fn aim(&mut self, world: &hecs::World) {
        if let Some(at) = self.current_target().and_then(|t| t.resolve(world)) {
            self.goal = at;
        }
    }

    pub fn focus_next(&mut self, world: &hecs::World) {
        if self.targets.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.targets.len();
        self.refocus(world);
    }

    pub fn focus_previous(&mut self, world: &hecs::World) {
        if self.targets.is_empty() {
            return;
        }
        self.current = self
            .current
            .checked_sub(1)
            .unwrap_or(self.targets.len() - 1);
        self.refocus(world);
    }

    fn refocus(&mut self, world: &hecs::World) {
        self.aim(world);
        log::info!(
            "Camera focus -> target {}/{} ({:?})",
            self.current + 1,
            self.targets.len(),
            self.targets[self.current],
        );
    }

    /// Advance both PID axes by `dt` seconds. A non-positive `dt` does nothing.
    ///
    /// The goal is used as-is; switching targets produces a derivative kick
    /// when `kd` is non-zero.
    pub fn update(&mut self, dt: f32) {
        if dt.is_nan() || dt <= 0.0 {
            return;
        }
        let gains = (self.kp, self.ki, self.kd);
        let error = self.goal - self.position;
        self.position.x += self.x.step(error.x, dt, gains);
        self.position.y += self.y.step(error.y, dt, gains);
    }

    /// Translation that centers the camera position in a viewport.
    pub fn world_offset(&self, viewport: Vec2) -> Vec2 {
        -self.position + viewport / 2.0
    }

    pub fn view(&self, viewport: Vec2) -> ViewTransform {
        ViewTransform::new(self.world_offset(viewport))
    }
}
