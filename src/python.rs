//! Python bindings, enabled with the `python` feature.

use crate::error::ObstacleError;
use crate::manager::ObstacleManager;
use crate::obstacle::{ExpandingObstacle, Hazard, MovingObstacle, Obstacle, StaticObstacle};
use crate::structs::{ObstacleId, ObstacleKind, Position, RiskLevel, Vector2D, Vector3};
use crate::ManagerConfig;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

impl From<ObstacleError> for PyErr {
    fn from(err: ObstacleError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn parse_risk(risk: Option<&str>) -> PyResult<Option<RiskLevel>> {
    match risk {
        None => Ok(None),
        Some(s) => RiskLevel::parse(s)
            .map(Some)
            .ok_or_else(|| PyValueError::new_err(format!("unknown risk level '{}'", s))),
    }
}

fn with_risk(obstacle: Obstacle, risk: Option<&str>) -> PyResult<PyObstacle> {
    let obstacle = match parse_risk(risk)? {
        Some(level) => obstacle.with_risk(level),
        None => obstacle,
    };
    Ok(PyObstacle { inner: obstacle })
}

#[pymethods]
impl Position {
    #[new]
    fn py_new(x: f64, y: f64, z: f64) -> Self {
        Position::new(x, y, z)
    }

    #[pyo3(name = "distance")]
    fn py_distance(&self, other: &Position) -> f64 {
        self.distance(other)
    }

    fn __repr__(&self) -> String {
        self.to_string()
    }
}

#[pymethods]
impl Vector2D {
    #[new]
    fn py_new(x: f64, y: f64) -> Self {
        Vector2D::new(x, y)
    }

    #[pyo3(name = "magnitude")]
    fn py_magnitude(&self) -> f64 {
        self.magnitude()
    }

    fn __add__(&self, other: &Vector2D) -> Vector2D {
        *self + *other
    }

    fn __repr__(&self) -> String {
        self.to_string()
    }
}

/// Read-only view of a registered obstacle
#[pyclass(name = "Obstacle")]
#[derive(Clone)]
pub struct PyObstacle {
    inner: Obstacle,
}

#[pymethods]
impl PyObstacle {
    #[getter]
    fn id(&self) -> u64 {
        self.inner.id().0
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.name().to_string()
    }

    #[getter]
    fn kind(&self) -> &'static str {
        match self.inner.kind() {
            ObstacleKind::Static => "static",
            ObstacleKind::Dynamic => "dynamic",
        }
    }

    #[getter]
    fn risk(&self) -> &'static str {
        self.inner.risk_level().as_str()
    }

    #[getter]
    fn position(&self) -> Position {
        self.inner.position()
    }

    #[getter]
    fn radius(&self) -> Option<f64> {
        self.inner.radius()
    }

    fn contains_point(&self, point: Position) -> bool {
        self.inner.contains_point(&point)
    }

    fn closest_point_to(&self, agent: Position) -> Position {
        self.inner.closest_point_to(&agent)
    }

    fn avoidance_vector(&self, agent: Position) -> Vector2D {
        self.inner.avoidance_vector(&agent)
    }

    fn update(&mut self, delta_time: f64) {
        self.inner.update(delta_time);
    }

    fn __repr__(&self) -> String {
        format!(
            "Obstacle(id={}, name='{}', kind={}, pos={})",
            self.inner.id(),
            self.inner.name(),
            self.kind(),
            self.inner.position()
        )
    }
}

#[pyfunction]
#[pyo3(signature = (name, position, half_x, half_y, half_z, risk=None))]
fn static_obstacle(
    name: String,
    position: Position,
    half_x: f64,
    half_y: f64,
    half_z: f64,
    risk: Option<&str>,
) -> PyResult<PyObstacle> {
    let obstacle = StaticObstacle::new(name, position, Vector3::new(half_x, half_y, half_z))?;
    with_risk(obstacle.into(), risk)
}

#[pyfunction]
#[pyo3(signature = (name, position, radius, vx, vy, vz, risk=None))]
#[allow(clippy::too_many_arguments)]
fn moving_obstacle(
    name: String,
    position: Position,
    radius: f64,
    vx: f64,
    vy: f64,
    vz: f64,
    risk: Option<&str>,
) -> PyResult<PyObstacle> {
    let obstacle = MovingObstacle::new(name, position, radius, Vector3::new(vx, vy, vz))?;
    with_risk(obstacle.into(), risk)
}

#[pyfunction]
#[pyo3(signature = (name, position, initial_radius, expansion_rate, max_radius, risk=None))]
fn expanding_obstacle(
    name: String,
    position: Position,
    initial_radius: f64,
    expansion_rate: f64,
    max_radius: f64,
    risk: Option<&str>,
) -> PyResult<PyObstacle> {
    let obstacle =
        ExpandingObstacle::new(name, position, initial_radius, expansion_rate, max_radius)?;
    with_risk(obstacle.into(), risk)
}

fn wrap_all(obstacles: Vec<Obstacle>) -> Vec<PyObstacle> {
    obstacles.into_iter().map(|inner| PyObstacle { inner }).collect()
}

#[pyclass(name = "ObstacleManager")]
pub struct PyObstacleManager {
    inner: ObstacleManager,
}

#[pymethods]
impl PyObstacleManager {
    #[new]
    #[pyo3(signature = (path_samples=None))]
    fn new(path_samples: Option<usize>) -> Self {
        let mut config = ManagerConfig::default();
        if let Some(samples) = path_samples {
            config.path_samples = samples;
        }
        PyObstacleManager {
            inner: ObstacleManager::with_config(config),
        }
    }

    fn add_obstacle(&self, obstacle: &PyObstacle) -> u64 {
        self.inner.add_obstacle(obstacle.inner.clone()).0
    }

    fn remove_obstacle(&self, id: u64) -> Option<PyObstacle> {
        self.inner
            .remove_obstacle(ObstacleId(id))
            .map(|inner| PyObstacle { inner })
    }

    fn get_obstacle(&self, id: u64) -> Option<PyObstacle> {
        self.inner
            .get_obstacle(ObstacleId(id))
            .map(|inner| PyObstacle { inner })
    }

    fn get_all_obstacles(&self) -> Vec<PyObstacle> {
        wrap_all(self.inner.get_all_obstacles())
    }

    fn get_obstacle_count(&self) -> usize {
        self.inner.get_obstacle_count()
    }

    fn check_collision(&self, point: Position) -> bool {
        self.inner.check_collision(&point)
    }

    fn is_path_clear(&self, start: Position, end: Position) -> bool {
        self.inner.is_path_clear(&start, &end)
    }

    fn get_obstacles_in_radius(&self, position: Position, radius: f64) -> Vec<PyObstacle> {
        wrap_all(self.inner.get_obstacles_in_radius(&position, radius))
    }

    fn get_obstacles_near_path(
        &self,
        start: Position,
        end: Position,
        detection_radius: f64,
    ) -> Vec<PyObstacle> {
        wrap_all(self.inner.get_obstacles_near_path(&start, &end, detection_radius))
    }

    fn get_avoidance_vector(&self, agent: Position, detection_radius: f64) -> Vector2D {
        self.inner.get_avoidance_vector(&agent, detection_radius)
    }

    fn update_dynamic_obstacles(&self, delta_time: f64) {
        self.inner.update_dynamic_obstacles(delta_time);
    }

    fn nearest_obstacle(&self, position: Position) -> Option<PyObstacle> {
        self.inner
            .nearest_obstacle(&position)
            .map(|inner| PyObstacle { inner })
    }

    fn __len__(&self) -> usize {
        self.inner.get_obstacle_count()
    }
}

#[pymodule]
fn swarm_hazards(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data structures
    m.add_class::<Position>()?;
    m.add_class::<Vector2D>()?;
    m.add_class::<PyObstacle>()?;
    m.add_class::<PyObstacleManager>()?;

    // Obstacle constructors
    m.add_function(wrap_pyfunction!(static_obstacle, m)?)?;
    m.add_function(wrap_pyfunction!(moving_obstacle, m)?)?;
    m.add_function(wrap_pyfunction!(expanding_obstacle, m)?)?;

    Ok(())
}
