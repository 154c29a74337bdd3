use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rand::Rng;
use serde::Deserialize;

use crate::{
    equilibrium::{Equilibrium, EquilibriumSolver},
    params::Parameters,
    rng::RngManager,
    world::{Cell, Grid, World},
};

fn default_snapshot_interval_ticks() -> u64 {
    100
}

fn default_daisy_count() -> usize {
    50
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub seeding: Seeding,
    /// Rows of cell symbols; when present it replaces random seeding.
    #[serde(default)]
    pub map: Option<Vec<String>>,
}

/// Daisies scattered over a bare grid when no map is given.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Seeding {
    #[serde(default = "default_daisy_count")]
    pub white_daisies: usize,
    #[serde(default = "default_daisy_count")]
    pub black_daisies: usize,
}

impl Default for Seeding {
    fn default() -> Self {
        Self {
            white_daisies: default_daisy_count(),
            black_daisies: default_daisy_count(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .parameters
            .validate()
            .with_context(|| format!("Invalid parameters in {}", path.display()))?;
        Ok(scenario)
    }
}

/// Places `white` and `black` daisies at uniformly random cells of a bare
/// grid. Black goes first; a later placement may overwrite an earlier one.
pub fn seed_grid<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    white: usize,
    black: usize,
    rng: &mut R,
) -> Grid {
    let mut grid = Grid::filled(width, height, Cell::Empty);
    if grid.is_empty() {
        return grid;
    }
    for (kind, count) in [(Cell::BlackDaisy, black), (Cell::WhiteDaisy, white)] {
        for _ in 0..count {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            grid.set(x, y, kind);
        }
    }
    grid
}

impl Scenario {
    pub fn build_grid(&self) -> Result<Grid> {
        let (width, height) = (self.parameters.grid_width(), self.parameters.grid_height());
        match &self.map {
            Some(rows) => Grid::from_rows(rows.as_slice(), width, height)
                .with_context(|| format!("Bad map in scenario '{}'", self.name)),
            None => {
                let mut rng = RngManager::new(self.seed);
                let mut stream = rng.stream("seeding");
                Ok(seed_grid(
                    width,
                    height,
                    self.seeding.white_daisies,
                    self.seeding.black_daisies,
                    &mut stream,
                ))
            }
        }
    }

    /// Runs the equilibrium solver, then lays the grid over a field held at
    /// the resulting baseline.
    pub fn build_world(&self) -> Result<(World, Equilibrium)> {
        let grid = self.build_grid()?;
        let equilibrium = EquilibriumSolver::new(&self.parameters).solve();
        let world = World::new(grid, equilibrium.baseline, self.parameters.day_speed);
        Ok((world, equilibrium))
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn yaml_fills_in_defaults() {
        let scenario: Scenario = serde_yaml::from_str(
            "name: bare\nseed: 3\nparameters:\n  map_width: 200\n  map_height: 100\n",
        )
        .unwrap();
        assert_eq!(scenario.snapshot_interval_ticks, 100);
        assert_eq!(scenario.seeding.white_daisies, 50);
        assert_eq!(scenario.parameters.grid_width(), 10);
        assert_eq!(scenario.parameters.optimal_temperature, 500.0);
        assert_eq!(scenario.ticks(None), 600);
        assert_eq!(scenario.ticks(Some(4)), 4);
    }

    #[test]
    fn unknown_parameter_is_rejected() {
        let result: std::result::Result<Scenario, _> =
            serde_yaml::from_str("name: x\nseed: 1\nparameters:\n  sunshine: 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn seeding_never_exceeds_requested_counts() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let grid = seed_grid(10, 10, 30, 20, &mut rng);
        let white = grid.count(Cell::WhiteDaisy);
        let black = grid.count(Cell::BlackDaisy);
        assert!(white <= 30 && white > 0);
        assert!(black <= 20);
        assert_eq!(grid.count(Cell::Water), 0);
        assert_eq!(white + black + grid.count(Cell::Empty), 100);
    }

    #[test]
    fn seeded_grid_is_reproducible() {
        let scenario: Scenario = serde_yaml::from_str(
            "name: r\nseed: 99\nparameters:\n  map_width: 200\n  map_height: 200\n",
        )
        .unwrap();
        assert_eq!(scenario.build_grid().unwrap(), scenario.build_grid().unwrap());
    }

    #[test]
    fn map_must_match_grid_size() {
        let scenario: Scenario = serde_yaml::from_str(
            "name: m\nseed: 1\nparameters:\n  map_width: 100\n  map_height: 60\nmap:\n  - \".....\"\n  - \".....\"\n",
        )
        .unwrap();
        let err = scenario.build_grid().unwrap_err();
        assert!(format!("{err:#}").contains("Bad map"));
    }
}
