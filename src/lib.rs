//! # Swarm Hazards
//!
//! Hazard detection and avoidance for agents in a multi-agent simulation,
//! such as a drone swarm. Python bindings are available behind the `python`
//! feature.
//!
//! ## Obstacles
//!
//! - **Static**: immovable box (buildings, towers)
//! - **Moving**: sphere travelling at constant velocity (other aircraft)
//! - **Expanding**: sphere growing to a maximum radius (fires, gas clouds)
//!
//! ## Queries
//!
//! [`ObstacleManager`] owns every obstacle and answers:
//! point collision, sampled path clearance, radius and near-path lookups,
//! and the summed planar avoidance force steering controllers consume.
//! The simulation driver advances dynamic obstacles once per tick with
//! [`ObstacleManager::update_dynamic_obstacles`].

mod config;
mod error;
mod manager;
mod obstacle;
mod structs;

#[cfg(feature = "python")]
mod python;

pub use config::ManagerConfig;
pub use error::{ObstacleError, Result};
pub use manager::ObstacleManager;
pub use obstacle::{
    ExpandingObstacle, Hazard, MovingObstacle, Obstacle, ObstacleInfo, StaticObstacle,
    DEGENERATE_DISTANCE, EXPANDING_FORCE_GAIN, EXPANDING_MIN_DENOMINATOR, MOVING_FORCE_GAIN,
    STATIC_FORCE_GAIN,
};
pub use structs::{ObstacleId, ObstacleKind, Position, RiskLevel, Vector2D, Vector3};
