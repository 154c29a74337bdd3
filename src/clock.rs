//! Time-flow ladder and the mapping from wall-clock ticks to simulated `dt`.

/// Number of rungs between 1% and 1000% time flow.
pub const LADDER_STEPS: usize = 100;

fn ladder() -> Vec<u32> {
    let (log_min, log_max) = (0.0_f64, 3.0_f64);
    let step = (log_max - log_min) / (LADDER_STEPS - 1) as f64;
    (0..LADDER_STEPS)
        .map(|i| 10f64.powf(log_min + i as f64 * step).round() as u32)
        .collect()
}

/// Maps a time-flow percentage on a logarithmic ladder to a physical `dt`.
///
/// Adjustments move one rung at a time so they feel proportional at both
/// ends of the range.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    tick_seconds: f64,
    rungs: Vec<u32>,
    index: usize,
}

impl SimulationClock {
    /// Snaps `time_flow` to the nearest rung (the lowest one on ties).
    pub fn new(tick_seconds: f64, time_flow: f64) -> Self {
        let rungs = ladder();
        let mut index = 0;
        let mut best = f64::INFINITY;
        for (i, &rung) in rungs.iter().enumerate() {
            let distance = (rung as f64 - time_flow).abs();
            if distance < best {
                best = distance;
                index = i;
            }
        }
        Self {
            tick_seconds,
            rungs,
            index,
        }
    }

    pub fn rungs(&self) -> &[u32] {
        &self.rungs
    }

    pub fn rung(&self) -> usize {
        self.index
    }

    /// Current percentage.
    pub fn time_flow(&self) -> u32 {
        self.rungs[self.index]
    }

    /// Time flow as a fraction of the 100% baseline.
    pub fn time_scale(&self) -> f64 {
        self.time_flow() as f64 / 100.0
    }

    pub fn tick_seconds(&self) -> f64 {
        self.tick_seconds
    }

    /// Simulated time for one nominal tick.
    pub fn dt(&self) -> f64 {
        self.dt_for(self.tick_seconds)
    }

    /// Simulated time for a tick that actually took `wall_seconds`.
    pub fn dt_for(&self, wall_seconds: f64) -> f64 {
        wall_seconds * self.time_scale()
    }

    pub fn faster(&mut self) -> u32 {
        self.index = (self.index + 1).min(self.rungs.len() - 1);
        self.time_flow()
    }

    pub fn slower(&mut self) -> u32 {
        self.index = self.index.saturating_sub(1);
        self.time_flow()
    }
}
