//! Per-tick population and temperature statistics for the stats panel.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::params::Parameters;
use crate::world::{Cell, Grid, TemperatureField};

/// Entries kept in each line-graph history.
pub const MAX_HISTORY: usize = 1000;

/// Cells averaged for the cold and hot tail temperatures.
pub const TAIL_CELLS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Census {
    pub tick: u64,
    pub empty: usize,
    pub white: usize,
    pub black: usize,
    pub water: usize,
    pub mean_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Mean of the coldest [`TAIL_CELLS`] cells, or the minimum on smaller grids.
    pub cold_mean_temperature: f64,
    /// Mean of the hottest [`TAIL_CELLS`] cells, or the maximum on smaller grids.
    pub hot_mean_temperature: f64,
    pub mean_albedo: f64,
    /// Change in white daisies since the previous tick.
    pub white_net: i64,
    pub black_net: i64,
    /// Daisies lost since the previous tick (negative when the population grew).
    pub mortality_net: i64,
    pub white_cumulative: i64,
    pub black_cumulative: i64,
    pub mortality_cumulative: i64,
}

impl Census {
    pub fn daisies(&self) -> usize {
        self.white + self.black
    }
}

/// Maps temperatures onto `[-1, 1]` around the field mean.
///
/// Each half is normalised by its own spread, floored at `threshold` so a
/// collapsed range never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureScale {
    pub min: f64,
    pub mean: f64,
    pub max: f64,
    threshold: f64,
}

impl TemperatureScale {
    pub fn from_field(field: &TemperatureField, threshold: f64) -> Self {
        let (min, max) = field
            .values()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &t| (lo.min(t), hi.max(t)));
        let mean = field.mean();
        if field.is_empty() {
            return Self {
                min: mean,
                mean,
                max: mean,
                threshold,
            };
        }
        Self {
            min,
            mean,
            max,
            threshold,
        }
    }

    pub fn deviation(&self, temperature: f64) -> f64 {
        let value = if temperature <= self.mean {
            -(self.mean - temperature) / (self.mean - self.min).max(self.threshold)
        } else {
            (temperature - self.mean) / (self.max - self.mean).max(self.threshold)
        };
        value.clamp(-1.0, 1.0)
    }
}

/// Rolling net-change windows and bounded histories across ticks.
#[derive(Debug, Clone)]
pub struct Bookkeeper {
    window: usize,
    previous: Option<(usize, usize)>,
    white_window: VecDeque<i64>,
    black_window: VecDeque<i64>,
    mortality_window: VecDeque<i64>,
    white_history: VecDeque<i64>,
    black_history: VecDeque<i64>,
    temperature_history: VecDeque<f64>,
}

fn tail_means(field: &TemperatureField, scale: &TemperatureScale) -> (f64, f64) {
    if field.len() < TAIL_CELLS {
        return (scale.min, scale.max);
    }
    let mut sorted = field.values().to_vec();
    sorted.sort_by(f64::total_cmp);
    let cold = sorted[..TAIL_CELLS].iter().sum::<f64>() / TAIL_CELLS as f64;
    let hot = sorted[sorted.len() - TAIL_CELLS..].iter().sum::<f64>() / TAIL_CELLS as f64;
    (cold, hot)
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T, limit: usize) {
    queue.push_back(value);
    while queue.len() > limit {
        queue.pop_front();
    }
}

impl Bookkeeper {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            previous: None,
            white_window: VecDeque::new(),
            black_window: VecDeque::new(),
            mortality_window: VecDeque::new(),
            white_history: VecDeque::new(),
            black_history: VecDeque::new(),
            temperature_history: VecDeque::new(),
        }
    }

    pub fn record(
        &mut self,
        tick: u64,
        grid: &Grid,
        temperature: &TemperatureField,
        params: &Parameters,
    ) -> Census {
        let mut counts = [0usize; 4];
        let mut albedo_sum = 0.0;
        for &cell in grid.values() {
            let slot = match cell {
                Cell::Empty => 0,
                Cell::WhiteDaisy => 1,
                Cell::BlackDaisy => 2,
                Cell::Water => 3,
            };
            counts[slot] += 1;
            albedo_sum += cell.albedo(params);
        }
        let [empty, white, black, water] = counts;

        let (white_net, black_net, mortality_net) = match self.previous {
            Some((prev_white, prev_black)) => (
                white as i64 - prev_white as i64,
                black as i64 - prev_black as i64,
                (prev_white + prev_black) as i64 - (white + black) as i64,
            ),
            None => (0, 0, 0),
        };
        self.previous = Some((white, black));

        push_bounded(&mut self.white_window, white_net, self.window);
        push_bounded(&mut self.black_window, black_net, self.window);
        push_bounded(&mut self.mortality_window, mortality_net, self.window);

        let white_cumulative: i64 = self.white_window.iter().sum();
        let black_cumulative: i64 = self.black_window.iter().sum();

        let scale = TemperatureScale::from_field(temperature, params.stats_threshold);
        let (cold_mean_temperature, hot_mean_temperature) = tail_means(temperature, &scale);
        push_bounded(&mut self.white_history, white_cumulative, MAX_HISTORY);
        push_bounded(&mut self.black_history, black_cumulative, MAX_HISTORY);
        push_bounded(&mut self.temperature_history, scale.mean, MAX_HISTORY);

        Census {
            tick,
            empty,
            white,
            black,
            water,
            mean_temperature: scale.mean,
            min_temperature: scale.min,
            max_temperature: scale.max,
            cold_mean_temperature,
            hot_mean_temperature,
            mean_albedo: if grid.is_empty() {
                0.0
            } else {
                albedo_sum / grid.len() as f64
            },
            white_net,
            black_net,
            mortality_net,
            white_cumulative,
            black_cumulative,
            mortality_cumulative: self.mortality_window.iter().sum(),
        }
    }

    /// Windowed white net change after each tick.
    pub fn white_history(&self) -> &VecDeque<i64> {
        &self.white_history
    }

    pub fn black_history(&self) -> &VecDeque<i64> {
        &self.black_history
    }

    pub fn temperature_history(&self) -> &VecDeque<f64> {
        &self.temperature_history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> Parameters {
        Parameters::default().with_grid_size(5, 5)
    }

    #[test]
    fn first_record_has_no_net_change() {
        let grid = Grid::from_fn(5, 5, |x, _| if x == 0 { Cell::WhiteDaisy } else { Cell::Empty });
        let field = TemperatureField::filled(5, 5, 300.0);
        let census = Bookkeeper::new(10).record(1, &grid, &field, &params());
        assert_eq!(census.white, 5);
        assert_eq!(census.empty, 20);
        assert_eq!(census.white_net, 0);
        assert_eq!(census.mortality_net, 0);
        assert_eq!(census.mean_temperature, 300.0);
    }

    #[test]
    fn nets_and_windows_track_changes() {
        let params = params();
        let field = TemperatureField::filled(5, 5, 300.0);
        let mut books = Bookkeeper::new(2);

        let full = Grid::filled(5, 5, Cell::BlackDaisy);
        let half = Grid::from_fn(5, 5, |_, y| if y < 2 { Cell::BlackDaisy } else { Cell::Empty });
        let none = Grid::filled(5, 5, Cell::Empty);

        books.record(1, &full, &field, &params);
        let second = books.record(2, &half, &field, &params);
        assert_eq!(second.black_net, -15);
        assert_eq!(second.mortality_net, 15);

        let third = books.record(3, &none, &field, &params);
        assert_eq!(third.black_net, -10);
        assert_eq!(third.black_cumulative, -25);

        // Window of two drops the first tick's change.
        let fourth = books.record(4, &none, &field, &params);
        assert_eq!(fourth.black_cumulative, -10);

        // Histories follow the windowed sums, not the per-tick nets.
        let history: Vec<i64> = books.black_history().iter().copied().collect();
        assert_eq!(history, vec![0, -15, -25, -10]);
        assert_eq!(books.black_history().back(), Some(&fourth.black_cumulative));
        assert!(books.white_history().iter().all(|&net| net == 0));
    }

    #[test]
    fn mean_albedo_weights_every_cell() {
        let params = params();
        let grid = Grid::from_fn(5, 5, |x, _| match x {
            0 => Cell::Water,
            1 => Cell::WhiteDaisy,
            _ => Cell::Empty,
        });
        let field = TemperatureField::filled(5, 5, 0.0);
        let census = Bookkeeper::new(10).record(1, &grid, &field, &params);
        assert_relative_eq!(census.mean_albedo, (0.9 + 0.75 + 3.0 * 0.5) / 5.0);
    }

    #[test]
    fn collapsed_range_is_guarded_by_threshold() {
        let field = TemperatureField::filled(4, 4, 250.0);
        let scale = TemperatureScale::from_field(&field, 1.0);
        assert_eq!(scale.deviation(250.0), 0.0);
        assert_eq!(scale.deviation(250.5), 0.5);
        assert!(scale.deviation(251.0).is_finite());
    }

    #[test]
    fn deviation_spans_the_field() {
        let field = TemperatureField::from_fn(4, 1, |x, _| [100.0, 200.0, 200.0, 500.0][x]);
        let scale = TemperatureScale::from_field(&field, 1.0);
        assert_eq!(scale.mean, 250.0);
        assert_eq!(scale.deviation(100.0), -1.0);
        assert_eq!(scale.deviation(500.0), 1.0);
        assert_relative_eq!(scale.deviation(375.0), 0.5);
    }

    #[test]
    fn tails_fall_back_to_extremes_on_small_grids() {
        let grid = Grid::filled(5, 5, Cell::Empty);
        let field = TemperatureField::from_fn(5, 5, |x, y| (x + 5 * y) as f64);
        let census = Bookkeeper::new(10).record(1, &grid, &field, &params());
        assert_eq!(census.cold_mean_temperature, 0.0);
        assert_eq!(census.hot_mean_temperature, 24.0);
    }

    #[test]
    fn tails_average_the_coldest_and_hottest_hundred() {
        let params = Parameters::default().with_grid_size(20, 10);
        let grid = Grid::filled(20, 10, Cell::Empty);
        // Row-major values 0..200: the bottom hundred average 49.5, the top 149.5.
        let field = TemperatureField::from_fn(20, 10, |x, y| (x + 20 * y) as f64);
        let census = Bookkeeper::new(10).record(1, &grid, &field, &params);
        assert_relative_eq!(census.cold_mean_temperature, 49.5);
        assert_relative_eq!(census.hot_mean_temperature, 149.5);
        assert_eq!(census.min_temperature, 0.0);
        assert_eq!(census.max_temperature, 199.0);
    }

    #[test]
    fn histories_are_bounded() {
        let params = params();
        let grid = Grid::filled(5, 5, Cell::Empty);
        let field = TemperatureField::filled(5, 5, 1.0);
        let mut books = Bookkeeper::new(3);
        for tick in 0..(MAX_HISTORY as u64 + 25) {
            books.record(tick, &grid, &field, &params);
        }
        assert_eq!(books.temperature_history().len(), MAX_HISTORY);
    }
}
