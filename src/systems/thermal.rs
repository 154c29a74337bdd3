use anyhow::Result;

use crate::{
    day_night::DayNightCycle,
    engine::{System, SystemContext},
    params::Parameters,
    rng::SystemRng,
    topology::Neighborhood,
    world::{Cell, Grid, TemperatureField, World},
};

/// Exponential relaxation of `temperature` toward the albedo-discounted
/// solar target.
pub(crate) fn forcing(
    temperature: f64,
    heating_rate: f64,
    solar_constant: f64,
    intensity: f64,
    albedo: f64,
) -> f64 {
    temperature + heating_rate * (solar_constant * intensity * (1.0 - albedo) - temperature)
}

/// Quartic radiative loss against the deep-space reference.
pub(crate) fn radiative_loss(temperature: f64, cooling_coefficient: f64, space_temperature: f64) -> f64 {
    cooling_coefficient * (temperature.powi(4) - space_temperature.powi(4))
}

/// One heating, diffusion and radiation step over the whole field.
pub struct ThermalUpdater<'a> {
    params: &'a Parameters,
    neighborhood: &'a Neighborhood,
    solar_constant: f64,
}

impl<'a> ThermalUpdater<'a> {
    pub fn new(params: &'a Parameters, neighborhood: &'a Neighborhood, solar_constant: f64) -> Self {
        Self {
            params,
            neighborhood,
            solar_constant,
        }
    }

    /// Returns the next field; inputs are never modified.
    ///
    /// Every forcing value is computed before any cell is averaged, so the
    /// diffusion pass only ever sees pre-step values.
    pub fn step(
        &self,
        temperature: &TemperatureField,
        grid: &Grid,
        day_night: &DayNightCycle,
        baseline: f64,
        dt: f64,
    ) -> TemperatureField {
        let (width, height) = (grid.width(), grid.height());
        let heating_rate = self.params.heating_rate;
        let intensities: Vec<f64> = (0..width).map(|x| day_night.intensity_at(x)).collect();

        let forced = TemperatureField::from_fn(width, height, |x, y| match grid.get(x, y) {
            Cell::Water => baseline,
            cell => forcing(
                temperature.get(x, y),
                heating_rate,
                self.solar_constant,
                intensities[x],
                cell.albedo(self.params),
            ),
        });

        TemperatureField::from_fn(width, height, |x, y| {
            if grid.get(x, y) == Cell::Water {
                return baseline;
            }
            let (sum, count) = self
                .neighborhood
                .diffusion_window(x, y)
                .fold((0.0, 0usize), |(sum, count), (nx, ny)| {
                    (sum + forced.get(nx, ny), count + 1)
                });
            let average = if count > 0 {
                sum / count as f64
            } else {
                forced.get(x, y)
            };
            let current = temperature.get(x, y);
            let loss = radiative_loss(
                current,
                self.params.cooling_coefficient,
                self.params.space_temperature,
            );
            current + dt * heating_rate * (average - loss)
        })
    }
}

pub struct ThermalSystem;

impl ThermalSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ThermalSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ThermalSystem {
    fn name(&self) -> &str {
        "thermal"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let updater = ThermalUpdater::new(ctx.params, ctx.neighborhood, ctx.solar_constant);
        let next = updater.step(
            &world.temperature,
            &world.grid,
            &world.day_night,
            world.baseline(),
            ctx.dt,
        );
        world.temperature = next;
        Ok(())
    }
}
