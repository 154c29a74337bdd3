use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use crate::{
    controls::Controls,
    params::Parameters,
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    stats::Bookkeeper,
    systems::{BookkeepingSystem, DayNightSystem, PopulationSystem, ThermalSystem},
    topology::Neighborhood,
    world::{World, WorldSnapshot},
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    params: Parameters,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings, params: Parameters) -> Self {
        Self {
            settings,
            params,
            systems: Vec::new(),
        }
    }

    /// Extra systems run after the built-in day/night, thermal and
    /// population stages, in insertion order.
    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn build(self) -> Result<Engine> {
        self.params
            .validate()
            .context("invalid simulation parameters")?;
        let neighborhood = Neighborhood::new(
            self.params.influence_level,
            self.params.grid_width(),
            self.params.grid_height(),
        )?;

        let mut systems: Vec<Box<dyn System>> = vec![
            Box::new(DayNightSystem::new()),
            Box::new(ThermalSystem::new()),
            Box::new(PopulationSystem::new()),
        ];
        systems.extend(self.systems);

        Ok(Engine {
            rng: RngManager::new(self.settings.seed),
            controls: Controls::from_params(&self.params),
            bookkeeping: BookkeepingSystem::new(self.params.cumulative_window),
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            systems,
            neighborhood,
            params: self.params,
            settings: self.settings,
        })
    }
}

pub struct Engine {
    rng: RngManager,
    controls: Controls,
    systems: Vec<Box<dyn System>>,
    bookkeeping: BookkeepingSystem,
    snapshot_writer: SnapshotWriter,
    neighborhood: Neighborhood,
    params: Parameters,
    settings: EngineSettings,
}

impl Engine {
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn neighborhood(&self) -> &Neighborhood {
        &self.neighborhood
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Changes take effect from the next tick.
    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    pub fn books(&self) -> &Bookkeeper {
        self.bookkeeping.books()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// One nominal tick. Returns `false` when paused.
    pub fn tick(&mut self, world: &mut World) -> Result<bool> {
        let dt = self.controls.clock().dt();
        self.step(world, dt)
    }

    /// One tick whose `dt` follows the wall-clock time it actually took.
    pub fn advance(&mut self, world: &mut World, wall: Duration) -> Result<bool> {
        let dt = self.controls.clock().dt_for(wall.as_secs_f64());
        self.step(world, dt)
    }

    pub fn run(&mut self, world: &mut World, ticks: u64) -> Result<()> {
        self.run_with_hook(world, ticks, |_| {})
    }

    /// Runs `ticks` ticks, handing a snapshot of every completed tick to `hook`.
    pub fn run_with_hook<F>(&mut self, world: &mut World, ticks: u64, mut hook: F) -> Result<()>
    where
        F: FnMut(WorldSnapshot),
    {
        info!(
            scenario = %self.settings.scenario_name,
            ticks,
            seed = self.settings.seed,
            "starting run"
        );
        for _ in 0..ticks {
            if self.tick(world)? {
                hook(world.snapshot(&self.settings.scenario_name));
            }
        }
        info!(
            scenario = %self.settings.scenario_name,
            tick = world.tick(),
            elapsed = world.elapsed(),
            "run finished"
        );
        Ok(())
    }

    fn step(&mut self, world: &mut World, dt: f64) -> Result<bool> {
        if self.controls.is_paused() {
            return Ok(false);
        }
        if world.grid().width() != self.neighborhood.width()
            || world.grid().height() != self.neighborhood.height()
        {
            bail!(
                "world is {}x{} but the engine was built for {}x{}",
                world.grid().width(),
                world.grid().height(),
                self.neighborhood.width(),
                self.neighborhood.height()
            );
        }

        if world.day_night().speed() != self.params.day_speed {
            bail!(
                "world day cycle turns at {} but the engine was built for {}",
                world.day_night().speed(),
                self.params.day_speed
            );
        }

        let clock = self.controls.clock();
        let ctx = SystemContext {
            tick: world.tick(),
            dt,
            time_scale: clock.time_scale(),
            solar_constant: self.controls.solar_constant(),
            peak_growth: self.controls.peak_growth(),
            params: &self.params,
            neighborhood: &self.neighborhood,
            scenario_name: &self.settings.scenario_name,
        };
        for system in &mut self.systems {
            let mut rng_stream = self.rng.stream(system.name());
            system
                .run(&ctx, world, &mut rng_stream)
                .with_context(|| format!("system '{}' failed at tick {}", system.name(), ctx.tick))?;
        }
        world.advance_time(dt);

        let ctx = SystemContext {
            tick: world.tick(),
            ..ctx
        };
        let mut rng_stream = self.rng.stream(self.bookkeeping.name());
        self.bookkeeping.run(&ctx, world, &mut rng_stream)?;

        if let Some(path) = self
            .snapshot_writer
            .maybe_write(world, &self.settings.scenario_name)?
        {
            debug!(tick = world.tick(), path = %path.display(), "snapshot written");
        }
        debug!(tick = world.tick(), dt, baseline = world.baseline(), "tick complete");
        Ok(true)
    }
}

/// Read-only view of the run handed to every system.
pub struct SystemContext<'a> {
    pub tick: u64,
    /// Simulated seconds covered by this tick.
    pub dt: f64,
    /// Time flow as a fraction of 100%.
    pub time_scale: f64,
    pub solar_constant: f64,
    pub peak_growth: f64,
    pub params: &'a Parameters,
    pub neighborhood: &'a Neighborhood,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}
