//! Physical and ecological constants for a run.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::topology::Neighborhood;

/// Fixed pixel pitch used to derive grid dimensions from a map size.
pub const CELL_SIZE: u32 = 20;

fn default_map_width() -> u32 {
    1000
}

fn default_map_height() -> u32 {
    400
}

fn default_cell_size() -> u32 {
    CELL_SIZE
}

fn default_heating_rate() -> f64 {
    0.2
}

fn default_albedo_black() -> f64 {
    0.25
}

fn default_albedo_white() -> f64 {
    0.75
}

fn default_albedo_bare() -> f64 {
    0.5
}

fn default_albedo_water() -> f64 {
    0.9
}

fn default_space_temperature() -> f64 {
    2.7
}

fn default_solar_constant() -> f64 {
    1900.0
}

fn default_optimal_temperature() -> f64 {
    500.0
}

fn default_tolerance_low() -> f64 {
    50.0
}

fn default_tolerance_high() -> f64 {
    70.0
}

fn default_spread_chance() -> f64 {
    0.2
}

fn default_death_chance() -> f64 {
    0.05
}

fn default_cooling_coefficient() -> f64 {
    9e-9
}

fn default_day_speed() -> f64 {
    30.0
}

fn default_solver_max_iters() -> u32 {
    200
}

fn default_solver_threshold() -> f64 {
    1.0
}

fn default_stats_threshold() -> f64 {
    1.0
}

fn default_influence_level() -> u32 {
    2
}

fn default_ambient_temperature() -> f64 {
    500.0
}

fn default_time_flow() -> f64 {
    100.0
}

fn default_peak_growth() -> f64 {
    100.0
}

fn default_tick_seconds() -> f64 {
    1.0 / 60.0
}

fn default_cumulative_window() -> usize {
    500
}

/// Constants bundle. Build it from a scenario (or [`Parameters::default`]),
/// then call [`Parameters::validate`] before handing it to an engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    pub map_width: u32,
    pub map_height: u32,
    pub cell_size: u32,
    /// Relaxation rate toward the solar target; also scales the integration step.
    pub heating_rate: f64,
    pub albedo_black: f64,
    pub albedo_white: f64,
    pub albedo_bare: f64,
    pub albedo_water: f64,
    /// Deep-space reference temperature for radiative loss.
    pub space_temperature: f64,
    /// Solar forcing magnitude at full intensity.
    pub solar_constant: f64,
    pub optimal_temperature: f64,
    pub tolerance_low: f64,
    pub tolerance_high: f64,
    pub spread_chance: f64,
    pub death_chance: f64,
    pub cooling_coefficient: f64,
    /// Columns per unit of simulated time the dawn line travels.
    pub day_speed: f64,
    pub solver_max_iters: u32,
    pub solver_threshold: f64,
    /// Minimum temperature delta used when normalising a collapsed range.
    pub stats_threshold: f64,
    pub influence_level: u32,
    pub ambient_temperature: f64,
    /// Percentage; snapped onto the time-flow ladder by the clock.
    pub time_flow: f64,
    /// Percentage of the spread chance available at the optimum.
    pub peak_growth: f64,
    /// Wall-clock seconds represented by one tick at 100% time flow.
    pub tick_seconds: f64,
    /// Ticks summed by the census cumulative net-change windows.
    pub cumulative_window: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            map_width: default_map_width(),
            map_height: default_map_height(),
            cell_size: default_cell_size(),
            heating_rate: default_heating_rate(),
            albedo_black: default_albedo_black(),
            albedo_white: default_albedo_white(),
            albedo_bare: default_albedo_bare(),
            albedo_water: default_albedo_water(),
            space_temperature: default_space_temperature(),
            solar_constant: default_solar_constant(),
            optimal_temperature: default_optimal_temperature(),
            tolerance_low: default_tolerance_low(),
            tolerance_high: default_tolerance_high(),
            spread_chance: default_spread_chance(),
            death_chance: default_death_chance(),
            cooling_coefficient: default_cooling_coefficient(),
            day_speed: default_day_speed(),
            solver_max_iters: default_solver_max_iters(),
            solver_threshold: default_solver_threshold(),
            stats_threshold: default_stats_threshold(),
            influence_level: default_influence_level(),
            ambient_temperature: default_ambient_temperature(),
            time_flow: default_time_flow(),
            peak_growth: default_peak_growth(),
            tick_seconds: default_tick_seconds(),
            cumulative_window: default_cumulative_window(),
        }
    }
}

impl Parameters {
    pub fn grid_width(&self) -> usize {
        if self.cell_size == 0 {
            return 0;
        }
        (self.map_width / self.cell_size) as usize
    }

    pub fn grid_height(&self) -> usize {
        if self.cell_size == 0 {
            return 0;
        }
        (self.map_height / self.cell_size) as usize
    }

    /// Set the map size so the derived grid is exactly `width` x `height` cells.
    pub fn with_grid_size(mut self, width: usize, height: usize) -> Self {
        self.map_width = width as u32 * self.cell_size;
        self.map_height = height as u32 * self.cell_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::NonPositive {
                name: "cell_size",
                value: 0.0,
            });
        }
        Neighborhood::new(self.influence_level, self.grid_width(), self.grid_height())?;

        for (name, value) in [
            ("tolerance_low", self.tolerance_low),
            ("tolerance_high", self.tolerance_high),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositiveTolerance { name, value });
            }
        }

        for (name, value) in [
            ("heating_rate", self.heating_rate),
            ("albedo_black", self.albedo_black),
            ("albedo_white", self.albedo_white),
            ("albedo_bare", self.albedo_bare),
            ("albedo_water", self.albedo_water),
            ("solar_constant", self.solar_constant),
            ("spread_chance", self.spread_chance),
            ("death_chance", self.death_chance),
            ("cooling_coefficient", self.cooling_coefficient),
            ("day_speed", self.day_speed),
            ("solver_threshold", self.solver_threshold),
            ("peak_growth", self.peak_growth),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return Err(ConfigError::NegativeRate { name, value });
            }
        }

        for (name, value) in [
            ("time_flow", self.time_flow),
            ("tick_seconds", self.tick_seconds),
            ("stats_threshold", self.stats_threshold),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        Ok(())
    }
}
