use anyhow::Result;
use rand::{seq::SliceRandom, Rng};

use crate::{
    engine::{System, SystemContext},
    params::Parameters,
    rng::SystemRng,
    topology::Neighborhood,
    world::{Cell, Grid, TemperatureField, World},
};

/// Downward parabola centred on `optimal`, zero beyond the tolerance on
/// whichever side `local` falls.
pub fn growth_rate(local: f64, optimal: f64, tolerance_low: f64, tolerance_high: f64) -> f64 {
    let tolerance = if local < optimal {
        tolerance_low
    } else {
        tolerance_high
    };
    let deviation = (local - optimal) / tolerance;
    (1.0 - deviation * deviation).max(0.0)
}

/// Death and colonisation over one tick.
pub struct PopulationUpdater<'a> {
    params: &'a Parameters,
    neighborhood: &'a Neighborhood,
    peak_growth: f64,
    time_scale: f64,
}

impl<'a> PopulationUpdater<'a> {
    /// `time_scale` is the time-flow fraction (1.0 at 100%); it scales both
    /// death and colonisation probabilities.
    pub fn new(
        params: &'a Parameters,
        neighborhood: &'a Neighborhood,
        peak_growth: f64,
        time_scale: f64,
    ) -> Self {
        Self {
            params,
            neighborhood,
            peak_growth,
            time_scale,
        }
    }

    pub fn step<R: Rng + ?Sized>(&self, grid: &Grid, temperature: &TemperatureField, rng: &mut R) -> Grid {
        let death_chance = self.params.death_chance * self.time_scale;
        let spread_chance =
            self.params.spread_chance * (self.peak_growth / 100.0) * self.time_scale;
        let mut seeds: Vec<Cell> = Vec::with_capacity(self.neighborhood.offsets().len());

        Grid::from_fn(grid.width(), grid.height(), |x, y| match grid.get(x, y) {
            Cell::Water => Cell::Water,
            daisy @ (Cell::WhiteDaisy | Cell::BlackDaisy) => {
                if rng.gen::<f64>() < death_chance {
                    Cell::Empty
                } else {
                    daisy
                }
            }
            Cell::Empty => {
                seeds.clear();
                let mut temperature_sum = 0.0;
                for (nx, ny) in self.neighborhood.neighbors(x, y) {
                    let neighbor = grid.get(nx, ny);
                    if neighbor.is_daisy() {
                        seeds.push(neighbor);
                        temperature_sum += temperature.get(nx, ny);
                    }
                }
                if seeds.is_empty() {
                    return Cell::Empty;
                }

                let local = temperature_sum / seeds.len() as f64;
                let rate = growth_rate(
                    local,
                    self.params.optimal_temperature,
                    self.params.tolerance_low,
                    self.params.tolerance_high,
                );
                if rng.gen::<f64>() < spread_chance * rate {
                    *seeds.choose(&mut *rng).unwrap_or(&Cell::Empty)
                } else {
                    Cell::Empty
                }
            }
        })
    }
}

pub struct PopulationSystem;

impl PopulationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PopulationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PopulationSystem {
    fn name(&self) -> &str {
        "population"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let updater =
            PopulationUpdater::new(ctx.params, ctx.neighborhood, ctx.peak_growth, ctx.time_scale);
        let next = updater.step(&world.grid, &world.temperature, rng);
        world.grid = next;
        Ok(())
    }
}
