//! Bare-land calibration run producing the equilibrium baseline.
//!
//! This is a coarser model than the per-tick thermal update: every cell uses
//! the bare albedo, diffusion always averages the 3x3 block around a cell
//! (clipped at every edge, no wrap) and the day phase advances on a fixed
//! step of its own.

use tracing::{info, warn};

use crate::day_night::DayNightCycle;
use crate::params::Parameters;
use crate::systems::thermal::{forcing, radiative_loss};
use crate::world::TemperatureField;

/// Time step used by the solver regardless of the run's clock.
pub const SOLVER_DT: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equilibrium {
    /// Mean temperature of the last iterate.
    pub baseline: f64,
    pub iterations: u32,
    pub converged: bool,
    /// Largest per-cell change seen on the last iteration.
    pub max_diff: f64,
}

pub struct EquilibriumSolver<'a> {
    params: &'a Parameters,
    width: usize,
    height: usize,
}

impl<'a> EquilibriumSolver<'a> {
    pub fn new(params: &'a Parameters) -> Self {
        Self {
            params,
            width: params.grid_width(),
            height: params.grid_height(),
        }
    }

    /// Iterate from a uniform ambient field until the largest per-cell change
    /// drops below the threshold or the iteration cap is reached. Never fails;
    /// without convergence the last iterate is used.
    pub fn solve(&self) -> Equilibrium {
        let params = self.params;
        let mut field =
            TemperatureField::filled(self.width, self.height, params.ambient_temperature);
        let mut cycle = DayNightCycle::new(self.width, params.day_speed);
        let mut iterations = 0;
        let mut max_diff = f64::INFINITY;
        let mut converged = false;

        while iterations < params.solver_max_iters {
            let next = self.step(&field, &cycle);
            cycle.advance(SOLVER_DT);
            iterations += 1;

            max_diff = next
                .values()
                .iter()
                .zip(field.values())
                .map(|(new, old)| (new - old).abs())
                .fold(0.0, f64::max);
            field = next;
            if max_diff < params.solver_threshold {
                converged = true;
                break;
            }
        }

        let baseline = field.mean();
        if converged {
            info!(baseline, iterations, "equilibrium solver converged");
        } else {
            warn!(
                baseline,
                iterations,
                max_diff,
                "equilibrium solver hit its iteration cap; using last iterate"
            );
        }

        Equilibrium {
            baseline,
            iterations,
            converged,
            max_diff,
        }
    }

    fn step(&self, field: &TemperatureField, cycle: &DayNightCycle) -> TemperatureField {
        let params = self.params;
        let (width, height) = (self.width, self.height);

        let forced = TemperatureField::from_fn(width, height, |x, y| {
            forcing(
                field.get(x, y),
                params.heating_rate,
                params.solar_constant,
                cycle.intensity_at(x),
                params.albedo_bare,
            )
        });

        TemperatureField::from_fn(width, height, |x, y| {
            let mut sum = 0.0;
            let mut count = 0usize;
            for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                    sum += forced.get(nx, ny);
                    count += 1;
                }
            }
            let current = field.get(x, y);
            let loss = radiative_loss(current, params.cooling_coefficient, params.space_temperature);
            current + SOLVER_DT * params.heating_rate * (sum / count as f64 - loss)
        })
    }
}
