//! Knobs the interactive front end may turn between ticks.

use crate::clock::SimulationClock;
use crate::params::Parameters;

pub const MIN_SOLAR_CONSTANT: f64 = 100.0;
pub const MAX_SOLAR_CONSTANT: f64 = 100_000.0;
pub const MAX_PEAK_GROWTH: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    clock: SimulationClock,
    solar_constant: f64,
    peak_growth: f64,
    paused: bool,
}

impl Controls {
    pub fn from_params(params: &Parameters) -> Self {
        Self {
            clock: SimulationClock::new(params.tick_seconds, params.time_flow),
            solar_constant: params.solar_constant,
            peak_growth: params.peak_growth.clamp(0.0, MAX_PEAK_GROWTH),
            paused: false,
        }
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn solar_constant(&self) -> f64 {
        self.solar_constant
    }

    pub fn peak_growth(&self) -> f64 {
        self.peak_growth
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn faster(&mut self) -> u32 {
        self.clock.faster()
    }

    pub fn slower(&mut self) -> u32 {
        self.clock.slower()
    }

    pub fn brighter(&mut self) -> f64 {
        self.solar_constant = (self.solar_constant * 1.1).clamp(MIN_SOLAR_CONSTANT, MAX_SOLAR_CONSTANT);
        self.solar_constant
    }

    pub fn dimmer(&mut self) -> f64 {
        self.solar_constant = (self.solar_constant * 0.9).clamp(MIN_SOLAR_CONSTANT, MAX_SOLAR_CONSTANT);
        self.solar_constant
    }

    pub fn more_growth(&mut self) -> f64 {
        self.peak_growth = (self.peak_growth + 1.0).min(MAX_PEAK_GROWTH);
        self.peak_growth
    }

    pub fn less_growth(&mut self) -> f64 {
        self.peak_growth = (self.peak_growth - 1.0).max(0.0);
        self.peak_growth
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn solar_forcing_is_clamped() {
        let mut controls = Controls::from_params(&Parameters {
            solar_constant: 105.0,
            ..Parameters::default()
        });
        assert_eq!(controls.dimmer(), MIN_SOLAR_CONSTANT);
        assert_relative_eq!(controls.brighter(), 110.0);

        let mut hot = Controls::from_params(&Parameters {
            solar_constant: 95_000.0,
            ..Parameters::default()
        });
        assert_eq!(hot.brighter(), MAX_SOLAR_CONSTANT);
    }

    #[test]
    fn peak_growth_stays_within_percent_range() {
        let mut controls = Controls::from_params(&Parameters::default());
        assert_eq!(controls.more_growth(), 100.0);
        assert_eq!(controls.less_growth(), 99.0);

        let mut barren = Controls::from_params(&Parameters {
            peak_growth: 0.0,
            ..Parameters::default()
        });
        assert_eq!(barren.less_growth(), 0.0);
    }

    #[test]
    fn pause_toggles() {
        let mut controls = Controls::from_params(&Parameters::default());
        assert!(!controls.is_paused());
        assert!(controls.toggle_pause());
        controls.resume();
        assert!(!controls.is_paused());
        controls.pause();
        assert!(controls.is_paused());
    }
}
