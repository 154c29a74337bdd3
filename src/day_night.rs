//! Rotating day/night insolation.

use serde::{Deserialize, Serialize};

/// Dawn column plus the speed it travels at. Dusk sits half a grid ahead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayNightCycle {
    width: f64,
    phase: f64,
    speed: f64,
}

impl DayNightCycle {
    pub fn new(width: usize, speed: f64) -> Self {
        Self {
            width: width as f64,
            phase: 0.0,
            speed,
        }
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = self.wrap(phase);
        self
    }

    /// `rem_euclid` rounds tiny negatives up to exactly `width`; fold that
    /// back so the phase stays in `[0, width)`.
    fn wrap(&self, phase: f64) -> f64 {
        let wrapped = phase.rem_euclid(self.width);
        if wrapped >= self.width {
            0.0
        } else {
            wrapped
        }
    }

    /// Dawn column in `[0, width)`.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Columns the terminator travels per simulated second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn dusk(&self) -> f64 {
        (self.phase + self.width / 2.0).rem_euclid(self.width)
    }

    /// Distance travelled forward (wrapping) from dawn to column `x`.
    fn since_dawn(&self, x: usize) -> f64 {
        (x as f64 - self.phase).rem_euclid(self.width)
    }

    pub fn is_lit(&self, x: usize) -> bool {
        self.since_dawn(x) < self.width / 2.0
    }

    /// Trapezoidal intensity: ramps up over the first quarter of the lit
    /// span, holds at 1 through the middle half, ramps down over the last.
    pub fn intensity_at(&self, x: usize) -> f64 {
        if !self.is_lit(x) {
            return 0.0;
        }
        let norm = self.since_dawn(x) / (self.width / 2.0);
        if norm < 0.25 {
            norm * 4.0
        } else if norm > 0.75 {
            (1.0 - norm) * 4.0
        } else {
            1.0
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.phase = self.wrap(self.phase - self.speed * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn exactly_half_the_columns_are_dark() {
        let width = 40;
        for step in 0..97 {
            let cycle = DayNightCycle::new(width, 30.0).with_phase(step as f64 * 0.413);
            let dark = (0..width).filter(|&x| !cycle.is_lit(x)).count();
            assert_eq!(dark, width / 2, "phase {}", cycle.phase());
            for x in 0..width {
                let intensity = cycle.intensity_at(x);
                assert!((0.0..=1.0).contains(&intensity));
                if !cycle.is_lit(x) {
                    assert_eq!(intensity, 0.0);
                }
            }
        }
    }

    #[test]
    fn trapezoid_is_symmetric_about_noon() {
        let cycle = DayNightCycle::new(40, 30.0);
        for x in 0..=20 {
            assert_abs_diff_eq!(
                cycle.intensity_at(x),
                cycle.intensity_at(20 - x),
                epsilon = 1e-12
            );
        }
        assert_eq!(cycle.intensity_at(0), 0.0);
        assert_abs_diff_eq!(cycle.intensity_at(2), 0.4, epsilon = 1e-12);
        assert_eq!(cycle.intensity_at(5), 1.0);
        assert_eq!(cycle.intensity_at(10), 1.0);
        assert_eq!(cycle.intensity_at(15), 1.0);
    }

    #[test]
    fn lit_span_wraps_past_the_last_column() {
        let cycle = DayNightCycle::new(10, 1.0).with_phase(8.0);
        let lit: Vec<_> = (0..10).filter(|&x| cycle.is_lit(x)).collect();
        assert_eq!(lit, vec![0, 1, 2, 8, 9]);
        assert_eq!(cycle.dusk(), 3.0);
    }

    #[test]
    fn advance_moves_dawn_backwards_and_wraps() {
        let mut cycle = DayNightCycle::new(10, 30.0);
        cycle.advance(0.1);
        assert_abs_diff_eq!(cycle.phase(), 7.0, epsilon = 1e-9);
        cycle.advance(1.0);
        assert_abs_diff_eq!(cycle.phase(), 7.0, epsilon = 1e-9);
        assert!(cycle.phase() >= 0.0 && cycle.phase() < 10.0);
    }

    #[test]
    fn tiny_backward_step_keeps_phase_below_width() {
        let mut cycle = DayNightCycle::new(10, 1.0);
        cycle.advance(1e-17);
        assert!(cycle.phase() < 10.0, "phase {}", cycle.phase());
        assert_eq!(cycle.phase(), 0.0);

        let cycle = DayNightCycle::new(10, 1.0).with_phase(-1e-17);
        assert!(cycle.phase() < 10.0);
    }
}
