//! Daisyworld: a tick-driven planetary climate simulation in which two
//! colonising daisy species with different albedos regulate the surface
//! temperature of a grid-shaped world.

pub mod clock;
pub mod controls;
pub mod day_night;
pub mod engine;
pub mod equilibrium;
pub mod error;
pub mod params;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod stats;
pub mod systems;
pub mod topology;
pub mod world;

pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use error::ConfigError;
pub use params::Parameters;
pub use scenario::{Scenario, ScenarioLoader};
pub use world::{Cell, Grid, TemperatureField, World, WorldSnapshot};
