//! Construction-time validation errors.
//!
//! Everything in here is fatal misconfiguration: the engine refuses to start
//! rather than run with a grid, parameter set or scenario map it cannot honour.

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The influence level must be at least one.
    #[error("influence level must be at least 1")]
    ZeroInfluenceLevel,

    /// Wrapping could visit the same neighbour twice on a grid this small.
    #[error(
        "grid {width}x{height} is too small for influence level {influence_level} \
         (each side needs at least {minimum} cells)"
    )]
    GridTooSmall {
        width: usize,
        height: usize,
        influence_level: u32,
        minimum: usize,
    },

    /// Tolerances divide the deviation in the growth-rate formula.
    #[error("tolerance `{name}` must be strictly positive, got {value}")]
    NonPositiveTolerance { name: &'static str, value: f64 },

    #[error("`{name}` must be a non-negative finite number, got {value}")]
    NegativeRate { name: &'static str, value: f64 },

    #[error("`{name}` must be strictly positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("scenario map is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}")]
    MapDimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },

    #[error("unknown map symbol '{symbol}' at row {row}, column {column}")]
    UnknownCellSymbol {
        symbol: char,
        row: usize,
        column: usize,
    },
}
