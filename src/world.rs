use serde::{Deserialize, Serialize};

use crate::day_night::DayNightCycle;
use crate::error::ConfigError;
use crate::params::Parameters;
use crate::stats::Census;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    WhiteDaisy,
    BlackDaisy,
    Water,
}

impl Cell {
    pub const ALL: [Cell; 4] = [Cell::Empty, Cell::WhiteDaisy, Cell::BlackDaisy, Cell::Water];

    pub fn is_daisy(self) -> bool {
        matches!(self, Cell::WhiteDaisy | Cell::BlackDaisy)
    }

    pub fn albedo(self, params: &Parameters) -> f64 {
        match self {
            Cell::Empty => params.albedo_bare,
            Cell::WhiteDaisy => params.albedo_white,
            Cell::BlackDaisy => params.albedo_black,
            Cell::Water => params.albedo_water,
        }
    }

    /// Map-file symbol for this cell.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::WhiteDaisy => 'w',
            Cell::BlackDaisy => 'b',
            Cell::Water => '~',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '.' => Some(Cell::Empty),
            'w' | 'W' => Some(Cell::WhiteDaisy),
            'b' | 'B' => Some(Cell::BlackDaisy),
            '~' => Some(Cell::Water),
            _ => None,
        }
    }
}

/// Row-major rectangular layer co-indexed with every other layer of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<T> {
    width: usize,
    height: usize,
    values: Vec<T>,
}

pub type Grid = Field<Cell>;
pub type TemperatureField = Field<f64>;

impl<T: Copy> Field<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            values: vec![value; width * height],
        }
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut values = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                values.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> T {
        self.values[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.values[y * self.width + x] = value;
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.values.chunks(self.width.max(1))
    }

    pub fn same_shape<U>(&self, other: &Field<U>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl Grid {
    /// Parse a map matrix of symbols, one string per row.
    pub fn from_rows<S: AsRef<str>>(
        rows: &[S],
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigError> {
        let actual_width = rows.first().map(|r| r.as_ref().chars().count()).unwrap_or(0);
        let ragged = rows
            .iter()
            .any(|r| r.as_ref().chars().count() != actual_width);
        if rows.len() != height || actual_width != width || ragged {
            let widest = rows
                .iter()
                .map(|r| r.as_ref().chars().count())
                .max()
                .unwrap_or(0);
            return Err(ConfigError::MapDimensionMismatch {
                expected_width: width,
                expected_height: height,
                actual_width: if ragged { widest } else { actual_width },
                actual_height: rows.len(),
            });
        }

        let mut values = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            for (column, symbol) in line.as_ref().chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or(ConfigError::UnknownCellSymbol {
                    symbol,
                    row,
                    column,
                })?;
                values.push(cell);
            }
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    pub fn count(&self, kind: Cell) -> usize {
        self.values.iter().filter(|&&cell| cell == kind).count()
    }
}

impl TemperatureField {
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

/// Everything one tick reads and replaces.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) grid: Grid,
    pub(crate) temperature: TemperatureField,
    pub(crate) day_night: DayNightCycle,
    baseline: f64,
    tick: u64,
    elapsed: f64,
    pub(crate) census: Option<Census>,
}

impl World {
    /// Water cells and land cells alike start at the equilibrium baseline.
    pub fn new(grid: Grid, baseline: f64, day_speed: f64) -> Self {
        let temperature = TemperatureField::filled(grid.width(), grid.height(), baseline);
        let day_night = DayNightCycle::new(grid.width(), day_speed);
        Self {
            grid,
            temperature,
            day_night,
            baseline,
            tick: 0,
            elapsed: 0.0,
            census: None,
        }
    }

    /// Replace the temperature field, for scenarios that start off-equilibrium.
    /// Water cells stay pinned to the baseline regardless.
    pub fn with_temperature(mut self, temperature: TemperatureField) -> Result<Self, ConfigError> {
        if !temperature.same_shape(&self.grid) {
            return Err(ConfigError::MapDimensionMismatch {
                expected_width: self.grid.width(),
                expected_height: self.grid.height(),
                actual_width: temperature.width(),
                actual_height: temperature.height(),
            });
        }
        let grid = &self.grid;
        let baseline = self.baseline;
        self.temperature = TemperatureField::from_fn(grid.width(), grid.height(), |x, y| {
            if grid.get(x, y) == Cell::Water {
                baseline
            } else {
                temperature.get(x, y)
            }
        });
        Ok(self)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn temperature(&self) -> &TemperatureField {
        &self.temperature
    }

    pub fn day_night(&self) -> &DayNightCycle {
        &self.day_night
    }

    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated time accumulated from every tick's `dt`.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn census(&self) -> Option<&Census> {
        self.census.as_ref()
    }

    pub fn advance_time(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed += dt;
    }

    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        WorldSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            elapsed: self.elapsed,
            baseline: self.baseline,
            day_phase: self.day_night.phase(),
            width: self.grid.width(),
            height: self.grid.height(),
            cells: self.grid.to_rows(),
            temperatures: self.temperature.rows().map(|row| row.to_vec()).collect(),
            census: self.census.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub elapsed: f64,
    pub baseline: f64,
    pub day_phase: f64,
    pub width: usize,
    pub height: usize,
    pub cells: Vec<String>,
    pub temperatures: Vec<Vec<f64>>,
    pub census: Option<Census>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_rows_round_trip_symbols() {
        let rows = ["..wb~", "~~...", "bbww."];
        let grid = Grid::from_rows(&rows, 5, 3).unwrap();
        assert_eq!(grid.get(2, 0), Cell::WhiteDaisy);
        assert_eq!(grid.get(3, 0), Cell::BlackDaisy);
        assert_eq!(grid.get(0, 1), Cell::Water);
        assert_eq!(grid.count(Cell::Water), 3);
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn map_with_wrong_dimensions_is_rejected() {
        let err = Grid::from_rows(&["....", "...."], 5, 2).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MapDimensionMismatch {
                expected_width: 5,
                actual_width: 4,
                ..
            }
        ));

        let err = Grid::from_rows(&[".....", "...", "....."], 5, 3).unwrap_err();
        assert!(matches!(err, ConfigError::MapDimensionMismatch { .. }));
    }

    #[test]
    fn unknown_symbol_reports_position() {
        let err = Grid::from_rows(&["..", ".x"], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownCellSymbol {
                symbol: 'x',
                row: 1,
                column: 1
            }
        ));
    }

    #[test]
    fn with_temperature_keeps_water_pinned() {
        let grid = Grid::from_rows(&["~.", ".~"], 2, 2).unwrap();
        let world = World::new(grid, 300.0, 30.0)
            .with_temperature(TemperatureField::filled(2, 2, 10.0))
            .unwrap();
        assert_eq!(world.temperature().get(0, 0), 300.0);
        assert_eq!(world.temperature().get(1, 0), 10.0);
        assert_eq!(world.temperature().get(1, 1), 300.0);
    }
}
