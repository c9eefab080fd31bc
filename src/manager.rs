//! # Obstacle Manager
//!
//! Thread-safe registry of every obstacle in the simulation, answering the
//! spatial queries agents use to plan motion.
//!
//! ## Threading model
//!
//! One writer (the simulation tick) mutates the registry while any number of
//! agents query it. The obstacle map and the dynamic index sit behind a
//! single `RwLock`, so:
//!
//! - add/remove touch both structures under one write guard
//! - a tick holds the write guard for its whole duration; a concurrent
//!   removal waits for the tick to finish
//! - queries hold the read guard and hand back owned snapshots, never
//!   references into the live registry
//!
//! ## Path sampling
//!
//! Path queries test `path_samples + 1` evenly spaced points along the
//! segment, endpoints included (11 with the default config). Obstacles small
//! enough to slip between two samples are not detected.
//!
//! Query results are sorted by obstacle id.

use crate::config::ManagerConfig;
use crate::error::Result;
use crate::obstacle::{Hazard, Obstacle};
use crate::structs::{ObstacleId, Position, RiskLevel, Vector2D, Vector3};
use ordered_float::OrderedFloat;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Registry {
    obstacles: HashMap<ObstacleId, Obstacle>,
    /// Ids of dynamic obstacles in registration order
    dynamic: Vec<ObstacleId>,
}

impl Registry {
    fn collides(&self, point: &Position) -> bool {
        self.obstacles.values().any(|o| o.contains_point(point))
    }

    fn within_radius<'a>(
        &'a self,
        position: &'a Position,
        radius: f64,
    ) -> impl Iterator<Item = &'a Obstacle> + 'a {
        self.obstacles
            .values()
            .filter(move |o| o.position().distance(position) <= radius)
    }
}

fn sorted_snapshot<'a>(obstacles: impl Iterator<Item = &'a Obstacle>) -> Vec<Obstacle> {
    let mut snapshot: Vec<Obstacle> = obstacles.cloned().collect();
    snapshot.sort_by_key(|o| o.id());
    snapshot
}

/// Registry of all obstacles plus the queries agents run against them
#[derive(Debug, Default)]
pub struct ObstacleManager {
    config: ManagerConfig,
    registry: RwLock<Registry>,
}

impl ObstacleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        ObstacleManager {
            config,
            registry: RwLock::new(Registry::default()),
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Register an obstacle, replacing any existing one with the same id
    pub fn add_obstacle(&self, obstacle: impl Into<Obstacle>) -> ObstacleId {
        let obstacle = obstacle.into();
        let id = obstacle.id();
        let dynamic = obstacle.is_dynamic();

        let mut registry = self.registry.write();
        if let Some(previous) = registry.obstacles.insert(id, obstacle) {
            log::warn!("obstacle {} '{}' replaced by a new registration", id, previous.name());
            if previous.is_dynamic() {
                registry.dynamic.retain(|d| *d != id);
            }
        }
        if dynamic {
            registry.dynamic.push(id);
        }
        log::debug!(
            "added obstacle {} ({} total, {} dynamic)",
            id,
            registry.obstacles.len(),
            registry.dynamic.len()
        );
        id
    }

    /// Unregister an obstacle. Unknown ids are a no-op returning `None`.
    pub fn remove_obstacle(&self, id: ObstacleId) -> Option<Obstacle> {
        let mut registry = self.registry.write();
        let removed = registry.obstacles.remove(&id)?;
        if removed.is_dynamic() {
            registry.dynamic.retain(|d| *d != id);
        }
        log::debug!("removed obstacle {} '{}'", id, removed.name());
        Some(removed)
    }

    pub fn get_obstacle(&self, id: ObstacleId) -> Option<Obstacle> {
        self.registry.read().obstacles.get(&id).cloned()
    }

    pub fn contains(&self, id: ObstacleId) -> bool {
        self.registry.read().obstacles.contains_key(&id)
    }

    pub fn get_all_obstacles(&self) -> Vec<Obstacle> {
        sorted_snapshot(self.registry.read().obstacles.values())
    }

    pub fn get_obstacle_count(&self) -> usize {
        self.registry.read().obstacles.len()
    }

    pub fn dynamic_obstacle_count(&self) -> usize {
        self.registry.read().dynamic.len()
    }

    pub fn clear(&self) {
        let mut registry = self.registry.write();
        log::debug!("clearing {} obstacles", registry.obstacles.len());
        registry.obstacles.clear();
        registry.dynamic.clear();
    }

    /// True iff `point` lies inside any registered obstacle
    pub fn check_collision(&self, point: &Position) -> bool {
        self.registry.read().collides(point)
    }

    /// True iff every sample point on the segment `start..=end` is collision free
    pub fn is_path_clear(&self, start: &Position, end: &Position) -> bool {
        let registry = self.registry.read();
        !self
            .config
            .sample_parameters()
            .any(|t| registry.collides(&start.lerp(end, t)))
    }

    /// Obstacles whose centre lies within `radius` of `position`, boundary included
    pub fn get_obstacles_in_radius(&self, position: &Position, radius: f64) -> Vec<Obstacle> {
        let registry = self.registry.read();
        sorted_snapshot(registry.within_radius(position, radius))
    }

    /// Obstacles whose centre is within `detection_radius` of at least one
    /// sample point on the segment `start..=end`
    pub fn get_obstacles_near_path(
        &self,
        start: &Position,
        end: &Position,
        detection_radius: f64,
    ) -> Vec<Obstacle> {
        let registry = self.registry.read();
        let samples: Vec<Position> = self
            .config
            .sample_parameters()
            .map(|t| start.lerp(end, t))
            .collect();
        sorted_snapshot(registry.obstacles.values().filter(|o| {
            let center = o.position();
            samples.iter().any(|s| s.distance(&center) <= detection_radius)
        }))
    }

    /// Sum of the repulsive forces of every obstacle within `detection_radius`.
    /// Zero when nothing is in range.
    pub fn get_avoidance_vector(&self, agent: &Position, detection_radius: f64) -> Vector2D {
        let registry = self.registry.read();
        registry
            .within_radius(agent, detection_radius)
            .map(|o| o.avoidance_vector(agent))
            .sum()
    }

    /// Advance every dynamic obstacle by `delta_time` seconds, in registration order
    pub fn update_dynamic_obstacles(&self, delta_time: f64) {
        let mut guard = self.registry.write();
        let Registry { obstacles, dynamic } = &mut *guard;
        for id in dynamic.iter() {
            if let Some(obstacle) = obstacles.get_mut(id) {
                obstacle.update(delta_time);
            }
        }
        log::trace!("advanced {} dynamic obstacles by {:.3}s", dynamic.len(), delta_time);
    }

    /// Obstacle whose hazard region is nearest to `position`; an obstacle
    /// containing `position` is at distance zero. Ties go to the lower id.
    pub fn nearest_obstacle(&self, position: &Position) -> Option<Obstacle> {
        let registry = self.registry.read();
        registry
            .obstacles
            .values()
            .min_by_key(|o| {
                let distance = if o.contains_point(position) {
                    0.0
                } else {
                    o.closest_point_to(position).distance(position)
                };
                (OrderedFloat(distance), o.id())
            })
            .cloned()
    }

    /// Obstacles whose risk level is at least `min_risk`
    pub fn obstacles_at_risk(&self, min_risk: RiskLevel) -> Vec<Obstacle> {
        let registry = self.registry.read();
        sorted_snapshot(
            registry
                .obstacles
                .values()
                .filter(|o| o.risk_level() >= min_risk),
        )
    }

    /// Reset the velocity of a moving obstacle.
    ///
    /// Returns `Ok(false)` when `id` is unknown or not a moving obstacle.
    pub fn set_obstacle_velocity(&self, id: ObstacleId, velocity: Vector3) -> Result<bool> {
        let mut registry = self.registry.write();
        match registry.obstacles.get_mut(&id) {
            Some(Obstacle::Moving(moving)) => {
                moving.set_velocity(velocity)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
