/// First-order heat balance of a sensor housing.
///
/// Each step adds `power_draw * dt` while enabled and loses heat to the
/// surroundings in proportion to the temperature difference. Explicit Euler,
/// no clamping: a very large `dt` can overshoot and diverge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalModel {
    /// °C.
    pub temperature: f32,
    /// Watts while enabled.
    pub power_draw: f32,
    /// kg.
    pub mass: f32,
    /// J/(kg·°C).
    pub heat_capacity: f32,
    /// W/°C.
    pub dissipation_rate: f32,
}

/// Starting housing temperature.
pub const BASELINE_TEMPERATURE: f32 = 20.0;

impl ThermalModel {
    pub fn new(power_draw: f32, mass: f32, heat_capacity: f32, dissipation_rate: f32) -> Self {
        Self {
            temperature: BASELINE_TEMPERATURE,
            power_draw,
            mass,
            heat_capacity,
            dissipation_rate,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.mass > 0.0
            && self.heat_capacity > 0.0
            && self.power_draw.is_finite()
            && self.dissipation_rate.is_finite()
    }

    /// Advance by `dt` seconds against `ambient` °C.
    pub fn step(&mut self, dt: f32, ambient: f32, enabled: bool) {
        let heating = if enabled { self.power_draw * dt } else { 0.0 };
        let cooling = self.dissipation_rate * (self.temperature - ambient) * dt;
        self.temperature += (heating - cooling) / (self.mass * self.heat_capacity);
    }

    /// Temperature the model settles at while enabled.
    pub fn equilibrium(&self, ambient: f32) -> f32 {
        if self.dissipation_rate == 0.0 {
            return f32::INFINITY;
        }
        ambient + self.power_draw / self.dissipation_rate
    }
}
