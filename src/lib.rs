//! Sphere-bot physics and sensing over a color-coded terrain raster.
//!
//! Bots are `hecs` entities that roll under gravity, collide with black
//! ground pixels and carry sensors that cast rays through the terrain. A
//! [`SimulationContext`](sim::SimulationContext) owns the world and advances
//! it one tick at a time.

pub mod behaviour;
pub mod camera;
pub mod config;
pub mod ecs;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod material;
pub mod overlay;
pub mod roster;
pub mod sensor;
pub mod sim;
pub mod stats;
pub mod terrain;

pub use config::SimConfig;
pub use error::SimError;
pub use sim::{BotSpec, BotView, Housekeeping, SensorView, SimulationContext};
pub use terrain::Terrain;
