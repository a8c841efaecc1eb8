use thiserror::Error;

/// Errors raised while building or configuring a simulation.
///
/// Everything here is a construction-time failure. Once a
/// [`SimulationContext`](crate::sim::SimulationContext) exists, a tick never
/// fails: off-raster samples and degenerate vectors are local no-ops.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("{model}: sensor range must be positive and finite, got {range}")]
    ZeroRange { model: &'static str, range: f32 },
    #[error("{model}: sensor needs at least one ray")]
    ZeroRayCount { model: &'static str },
    #[error("{model}: retention of {retention_period}s at {tick_rate} ticks/s leaves no buffer slots")]
    EmptyBuffer {
        model: &'static str,
        retention_period: f32,
        tick_rate: u32,
    },
    #[error("{model}: thermal mass and heat capacity must be positive")]
    InvalidThermal { model: &'static str },
    #[error("behaviour targets sensor {index} but the bot only has {count}")]
    NoSuchSensor { index: usize, count: usize },
    #[error("behaviour period must be positive, got {0}")]
    InvalidPeriod(f32),
    #[error("duty cycle must be within 0..=1, got {0}")]
    InvalidDutyCycle(f32),
    #[error("terrain of {width}x{height} needs {expected} bytes, got {actual}")]
    TerrainSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("entity is not a bot")]
    NotABot,
}
