mod bookkeeping;
mod day_night;
mod population;
pub(crate) mod thermal;

pub use bookkeeping::BookkeepingSystem;
pub use day_night::DayNightSystem;
pub use population::{growth_rate, PopulationSystem, PopulationUpdater};
pub use thermal::{ThermalSystem, ThermalUpdater};
