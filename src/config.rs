//! Registry tuning.

use serde::{Deserialize, Serialize};

/// Configuration for an [`ObstacleManager`](crate::ObstacleManager)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Number of segments a path is cut into when sampling it.
    /// `n` segments give `n + 1` sample points, endpoints included.
    pub path_samples: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self { path_samples: 10 }
    }
}

impl ManagerConfig {
    /// Sample parameters `t` in `[0, 1]` along a path, endpoints included
    pub fn sample_parameters(&self) -> impl Iterator<Item = f64> {
        let segments = self.path_samples.max(1);
        (0..=segments).map(move |i| i as f64 / segments as f64)
    }
}
