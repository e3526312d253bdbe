use crate::{EngineError, InvalidParameterSnafu};
use snafu::prelude::*;

/// Coordinates are sampled from `[-range, range)` on every axis.
pub const DEFAULT_COORDINATE_RANGE: f32 = 3.0;

/// Upper bound on the iteration counter during a run-through.
pub const DEFAULT_RUN_THROUGH_LIMIT: usize = 1000;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EngineConfig {
    /// Half-width of the sampling interval used by point generation and
    /// uniform centroid initialization.
    pub coordinate_range: f32,
    pub run_through_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            coordinate_range: DEFAULT_COORDINATE_RANGE,
            run_through_limit: DEFAULT_RUN_THROUGH_LIMIT,
        }
    }
}

pub(crate) fn check_coordinate_range(range: f32) -> Result<(), EngineError> {
    ensure!(
        range.is_finite() && range > 0.0,
        InvalidParameterSnafu {
            name: "coordinate range",
            reason: format!("{range} is not a positive finite number"),
        }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_valid() {
        assert!(check_coordinate_range(EngineConfig::default().coordinate_range).is_ok());
    }

    #[test]
    fn degenerate_ranges_rejected() {
        for range in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(check_coordinate_range(range).is_err(), "{range}");
        }
    }
}
