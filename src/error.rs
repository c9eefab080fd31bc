//! Errors raised while building obstacles.
//!
//! Queries against the registry never fail; only malformed construction
//! parameters are rejected here.

/// Error types for obstacle construction
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ObstacleError {
    #[error("radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),

    #[error("expansion rate must be finite and non-negative, got {0}")]
    InvalidExpansionRate(f64),

    #[error("max radius {max_radius} is below initial radius {initial_radius}")]
    MaxRadiusBelowInitial { initial_radius: f64, max_radius: f64 },

    #[error("half extents must be finite and non-negative, got ({0}, {1}, {2})")]
    InvalidExtents(f64, f64, f64),

    #[error("{0} contains a non-finite component")]
    NonFinite(&'static str),
}

/// Result type for obstacle construction
pub type Result<T> = std::result::Result<T, ObstacleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ObstacleError::MaxRadiusBelowInitial {
            initial_radius: 5.0,
            max_radius: 2.0,
        };
        assert_eq!(err.to_string(), "max radius 2 is below initial radius 5");

        let err = ObstacleError::NonFinite("velocity");
        assert!(err.to_string().contains("velocity"));
    }
}
