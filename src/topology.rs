//! Neighbourhood topology shared by thermal diffusion and population spread.
//!
//! The horizontal axis wraps, the vertical axis is bounded: offsets that land
//! above the first row or below the last one are dropped rather than
//! reflected or wrapped.

use crate::error::ConfigError;

/// Relative neighbour positions for one influence level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhood {
    level: u32,
    width: usize,
    height: usize,
    offsets: Vec<(isize, isize)>,
    window_includes_center: bool,
}

impl Neighborhood {
    /// * `1`: von Neumann, the four cells at Manhattan distance 1.
    /// * `2`: Moore, the eight cells at Chebyshev distance 1.
    /// * `>2`: every cell within Euclidean distance `level`.
    ///
    /// Both sides of the grid must be at least `2 * level + 1` cells so that
    /// wrapping never reaches the same column from both directions.
    pub fn new(level: u32, width: usize, height: usize) -> Result<Self, ConfigError> {
        if level == 0 {
            return Err(ConfigError::ZeroInfluenceLevel);
        }
        let minimum = 2 * level as usize + 1;
        if width < minimum || height < minimum {
            return Err(ConfigError::GridTooSmall {
                width,
                height,
                influence_level: level,
                minimum,
            });
        }

        let reach = level as isize;
        let mut offsets = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let keep = match level {
                    1 => dx.abs() + dy.abs() == 1,
                    2 => dx.abs() <= 1 && dy.abs() <= 1,
                    _ => dx * dx + dy * dy <= reach * reach,
                };
                if keep {
                    offsets.push((dx, dy));
                }
            }
        }

        Ok(Self {
            level,
            width,
            height,
            offsets,
            window_includes_center: level >= 2,
        })
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Offsets excluding the centre cell.
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    /// Neighbours of `(x, y)`, never including the cell itself.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.offsets
            .iter()
            .filter_map(move |&(dx, dy)| self.resolve(x, y, dx, dy))
    }

    /// Cells averaged by thermal diffusion around `(x, y)`.
    ///
    /// For level 1 this is the four von Neumann neighbours only; wider levels
    /// also average the cell's own forcing.
    pub fn diffusion_window(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let center = self.window_includes_center.then_some((x, y));
        center.into_iter().chain(self.neighbors(x, y))
    }

    fn resolve(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let ny = y as isize + dy;
        if ny < 0 || ny >= self.height as isize {
            return None;
        }
        let nx = (x as isize + dx).rem_euclid(self.width as isize);
        Some((nx as usize, ny as usize))
    }
}
