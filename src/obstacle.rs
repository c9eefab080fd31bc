//! # Obstacles
//!
//! Hazards agents must steer around. Every variant answers the same four
//! questions through the [`Hazard`] trait:
//!
//! - is a point inside the hazard region?
//! - where is the nearest boundary point to an agent?
//! - which planar repulsive force should the agent feel?
//! - how does the hazard evolve over `delta_time` seconds?
//!
//! ## Variants
//!
//! | Variant     | Shape                   | Force law                                        | Update                 |
//! |-------------|-------------------------|--------------------------------------------------|------------------------|
//! | `Static`    | axis-aligned box        | `50 / (d + 1)`                                   | none                   |
//! | `Moving`    | sphere, fixed radius    | `80 / (d + 1)`                                   | `position += v * dt`   |
//! | `Expanding` | sphere, growing radius  | `150 * (r / r_max) / max(d - r + 1, 0.1)`        | `r += rate * dt`, clamped |
//!
//! `d` is the distance from the obstacle centre to the agent in the X/Y
//! plane; altitude never contributes to the force. The force always points
//! from the obstacle centre towards the agent.
//!
//! The static force is measured from the box centre, not its faces, so an
//! agent hugging a face of a large box feels little push. Callers that need
//! boundary-aware steering combine it with `closest_point_to`.
//!
//! ## Degenerate distances
//!
//! An agent closer than [`DEGENERATE_DISTANCE`] to the centre gets a fixed
//! answer instead of a direction computed from a near-zero vector: the
//! closest point lies on the +X side of the centre and the force is the unit
//! vector `(1, 0)`.

use crate::error::{ObstacleError, Result};
use crate::structs::{ObstacleId, ObstacleKind, Position, RiskLevel, Vector2D, Vector3};
use serde::{Deserialize, Serialize};

/// Below this centre distance an agent is treated as sitting on the centre
pub const DEGENERATE_DISTANCE: f64 = 0.01;
pub const STATIC_FORCE_GAIN: f64 = 50.0;
pub const MOVING_FORCE_GAIN: f64 = 80.0;
pub const EXPANDING_FORCE_GAIN: f64 = 150.0;
/// Floor for the expanding force denominator `d - r + 1`.
/// Keeps the force finite and outward once the agent reaches the boundary.
pub const EXPANDING_MIN_DENOMINATOR: f64 = 0.1;

/// Capability set shared by every obstacle variant.
///
/// Only [`Hazard::update`] mutates state; the queries are pure.
pub trait Hazard {
    fn info(&self) -> &ObstacleInfo;

    /// Anchor point of the hazard
    fn position(&self) -> Position;

    /// True iff `point` lies inside the hazard region, boundary included
    fn contains_point(&self, point: &Position) -> bool;

    /// Nearest boundary point to `agent`
    fn closest_point_to(&self, agent: &Position) -> Position;

    /// Planar repulsive force on an agent at `agent`
    fn avoidance_vector(&self, agent: &Position) -> Vector2D;

    /// Advance internal state by `delta_time` seconds
    fn update(&mut self, delta_time: f64);
}

/// Identity and classification common to all variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleInfo {
    pub id: ObstacleId,
    pub name: String,
    pub kind: ObstacleKind,
    pub risk: RiskLevel,
}

impl ObstacleInfo {
    fn new(name: impl Into<String>, kind: ObstacleKind, risk: RiskLevel) -> Self {
        ObstacleInfo {
            id: ObstacleId::next(),
            name: name.into(),
            kind,
            risk,
        }
    }
}

fn check_position(position: &Position) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(ObstacleError::NonFinite("position"))
    }
}

fn check_radius(radius: f64) -> Result<()> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(ObstacleError::InvalidRadius(radius))
    }
}

/// Shared inverse-distance repulsion. `scale_at` maps planar distance to magnitude.
fn repulsion(center: &Position, agent: &Position, scale_at: impl Fn(f64) -> f64) -> Vector2D {
    let offset = center.planar_offset_to(agent);
    let distance = offset.magnitude();
    if distance < DEGENERATE_DISTANCE {
        return Vector2D::new(1.0, 0.0);
    }
    offset * (scale_at(distance) / distance)
}

fn sphere_contains(center: &Position, radius: f64, point: &Position) -> bool {
    center.distance(point) <= radius
}

fn sphere_closest_point(center: &Position, radius: f64, agent: &Position) -> Position {
    let distance = center.distance(agent);
    if distance < DEGENERATE_DISTANCE {
        return *center + Vector3::new(radius, 0.0, 0.0);
    }
    *center + (*agent - *center) * (radius / distance)
}

// ==================== Static ====================

/// Immovable axis-aligned box, e.g. a building or a tower
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticObstacle {
    info: ObstacleInfo,
    position: Position,
    half_extents: Vector3,
}

impl StaticObstacle {
    pub fn new(name: impl Into<String>, position: Position, half_extents: Vector3) -> Result<Self> {
        check_position(&position)?;
        let h = half_extents;
        if !h.is_finite() || h.x < 0.0 || h.y < 0.0 || h.z < 0.0 {
            return Err(ObstacleError::InvalidExtents(h.x, h.y, h.z));
        }
        Ok(StaticObstacle {
            info: ObstacleInfo::new(name, ObstacleKind::Static, RiskLevel::Low),
            position,
            half_extents,
        })
    }

    pub fn half_extents(&self) -> Vector3 {
        self.half_extents
    }
}

impl Hazard for StaticObstacle {
    fn info(&self) -> &ObstacleInfo {
        &self.info
    }

    fn position(&self) -> Position {
        self.position
    }

    fn contains_point(&self, point: &Position) -> bool {
        let d = *point - self.position;
        let h = self.half_extents;
        d.x.abs() <= h.x && d.y.abs() <= h.y && d.z.abs() <= h.z
    }

    fn closest_point_to(&self, agent: &Position) -> Position {
        let c = self.position;
        let h = self.half_extents;
        let clamped = Position::new(
            agent.x.clamp(c.x - h.x, c.x + h.x),
            agent.y.clamp(c.y - h.y, c.y + h.y),
            agent.z.clamp(c.z - h.z, c.z + h.z),
        );
        if clamped != *agent {
            return clamped;
        }

        // Inside the box: leave through the face with the least slack.
        // Ties resolve towards X, then Y, so an agent at the centre exits +X.
        let d = *agent - c;
        let slack = [h.x - d.x.abs(), h.y - d.y.abs(), h.z - d.z.abs()];
        let mut axis = 0;
        for i in 1..3 {
            if slack[i] < slack[axis] {
                axis = i;
            }
        }
        let face = |offset: f64, half: f64| if offset >= 0.0 { half } else { -half };
        let mut exit = *agent;
        match axis {
            0 => exit.x = c.x + face(d.x, h.x),
            1 => exit.y = c.y + face(d.y, h.y),
            _ => exit.z = c.z + face(d.z, h.z),
        }
        exit
    }

    fn avoidance_vector(&self, agent: &Position) -> Vector2D {
        repulsion(&self.position, agent, |d| STATIC_FORCE_GAIN / (d + 1.0))
    }

    fn update(&mut self, _delta_time: f64) {}
}

// ==================== Moving ====================

/// Sphere travelling at constant velocity, e.g. another aircraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingObstacle {
    info: ObstacleInfo,
    position: Position,
    radius: f64,
    velocity: Vector3,
}

impl MovingObstacle {
    pub fn new(
        name: impl Into<String>,
        position: Position,
        radius: f64,
        velocity: Vector3,
    ) -> Result<Self> {
        check_position(&position)?;
        check_radius(radius)?;
        if !velocity.is_finite() {
            return Err(ObstacleError::NonFinite("velocity"));
        }
        Ok(MovingObstacle {
            info: ObstacleInfo::new(name, ObstacleKind::Dynamic, RiskLevel::Medium),
            position,
            radius,
            velocity,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    /// Replace the velocity; non-finite input is rejected
    pub fn set_velocity(&mut self, velocity: Vector3) -> Result<()> {
        if !velocity.is_finite() {
            return Err(ObstacleError::NonFinite("velocity"));
        }
        self.velocity = velocity;
        Ok(())
    }
}

impl Hazard for MovingObstacle {
    fn info(&self) -> &ObstacleInfo {
        &self.info
    }

    fn position(&self) -> Position {
        self.position
    }

    fn contains_point(&self, point: &Position) -> bool {
        sphere_contains(&self.position, self.radius, point)
    }

    fn closest_point_to(&self, agent: &Position) -> Position {
        sphere_closest_point(&self.position, self.radius, agent)
    }

    fn avoidance_vector(&self, agent: &Position) -> Vector2D {
        repulsion(&self.position, agent, |d| MOVING_FORCE_GAIN / (d + 1.0))
    }

    fn update(&mut self, delta_time: f64) {
        if !delta_time.is_finite() {
            return;
        }
        self.position += self.velocity * delta_time;
    }
}

// ==================== Expanding ====================

/// Sphere whose radius grows up to a cap, e.g. a spreading fire or gas cloud
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandingObstacle {
    info: ObstacleInfo,
    position: Position,
    radius: f64,
    expansion_rate: f64,
    max_radius: f64,
}

impl ExpandingObstacle {
    pub fn new(
        name: impl Into<String>,
        position: Position,
        initial_radius: f64,
        expansion_rate: f64,
        max_radius: f64,
    ) -> Result<Self> {
        check_position(&position)?;
        check_radius(initial_radius)?;
        check_radius(max_radius)?;
        if !expansion_rate.is_finite() || expansion_rate < 0.0 {
            return Err(ObstacleError::InvalidExpansionRate(expansion_rate));
        }
        if max_radius < initial_radius {
            return Err(ObstacleError::MaxRadiusBelowInitial {
                initial_radius,
                max_radius,
            });
        }
        Ok(ExpandingObstacle {
            info: ObstacleInfo::new(name, ObstacleKind::Dynamic, RiskLevel::Critical),
            position,
            radius: initial_radius,
            expansion_rate,
            max_radius,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn expansion_rate(&self) -> f64 {
        self.expansion_rate
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Fraction of the final size reached, in `[0, 1]`
    pub fn growth_ratio(&self) -> f64 {
        if self.max_radius > 0.0 {
            self.radius / self.max_radius
        } else {
            0.0
        }
    }
}

impl Hazard for ExpandingObstacle {
    fn info(&self) -> &ObstacleInfo {
        &self.info
    }

    fn position(&self) -> Position {
        self.position
    }

    fn contains_point(&self, point: &Position) -> bool {
        sphere_contains(&self.position, self.radius, point)
    }

    fn closest_point_to(&self, agent: &Position) -> Position {
        sphere_closest_point(&self.position, self.radius, agent)
    }

    fn avoidance_vector(&self, agent: &Position) -> Vector2D {
        let gain = EXPANDING_FORCE_GAIN * self.growth_ratio();
        let radius = self.radius;
        repulsion(&self.position, agent, |d| {
            gain / (d - radius + 1.0).max(EXPANDING_MIN_DENOMINATOR)
        })
    }

    /// Grows towards `max_radius`; the radius never shrinks, so
    /// negative or non-finite steps are ignored.
    fn update(&mut self, delta_time: f64) {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return;
        }
        if self.radius < self.max_radius {
            self.radius = (self.radius + self.expansion_rate * delta_time).min(self.max_radius);
        }
    }
}

// ==================== Dispatch ====================

/// Any registered obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Obstacle {
    Static(StaticObstacle),
    Moving(MovingObstacle),
    Expanding(ExpandingObstacle),
}

impl Obstacle {
    fn hazard(&self) -> &dyn Hazard {
        match self {
            Obstacle::Static(o) => o,
            Obstacle::Moving(o) => o,
            Obstacle::Expanding(o) => o,
        }
    }

    fn hazard_mut(&mut self) -> &mut dyn Hazard {
        match self {
            Obstacle::Static(o) => o,
            Obstacle::Moving(o) => o,
            Obstacle::Expanding(o) => o,
        }
    }

    fn info_mut(&mut self) -> &mut ObstacleInfo {
        match self {
            Obstacle::Static(o) => &mut o.info,
            Obstacle::Moving(o) => &mut o.info,
            Obstacle::Expanding(o) => &mut o.info,
        }
    }

    pub fn id(&self) -> ObstacleId {
        self.info().id
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    pub fn kind(&self) -> ObstacleKind {
        self.info().kind
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.info().risk
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind() == ObstacleKind::Dynamic
    }

    /// Collision radius for the spherical variants
    pub fn radius(&self) -> Option<f64> {
        match self {
            Obstacle::Static(_) => None,
            Obstacle::Moving(o) => Some(o.radius()),
            Obstacle::Expanding(o) => Some(o.radius()),
        }
    }

    /// Pin the id. Fresh ids drawn afterwards never collide with it.
    pub fn with_id(mut self, id: ObstacleId) -> Self {
        ObstacleId::reserve(id);
        self.info_mut().id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.info_mut().name = name.into();
        self
    }

    pub fn with_kind(mut self, kind: ObstacleKind) -> Self {
        self.info_mut().kind = kind;
        self
    }

    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.info_mut().risk = risk;
        self
    }
}

impl Hazard for Obstacle {
    fn info(&self) -> &ObstacleInfo {
        self.hazard().info()
    }

    fn position(&self) -> Position {
        self.hazard().position()
    }

    fn contains_point(&self, point: &Position) -> bool {
        self.hazard().contains_point(point)
    }

    fn closest_point_to(&self, agent: &Position) -> Position {
        self.hazard().closest_point_to(agent)
    }

    fn avoidance_vector(&self, agent: &Position) -> Vector2D {
        self.hazard().avoidance_vector(agent)
    }

    fn update(&mut self, delta_time: f64) {
        self.hazard_mut().update(delta_time)
    }
}

impl From<StaticObstacle> for Obstacle {
    fn from(o: StaticObstacle) -> Self {
        Obstacle::Static(o)
    }
}

impl From<MovingObstacle> for Obstacle {
    fn from(o: MovingObstacle) -> Self {
        Obstacle::Moving(o)
    }
}

impl From<ExpandingObstacle> for Obstacle {
    fn from(o: ExpandingObstacle) -> Self {
        Obstacle::Expanding(o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn origin() -> Position {
        Position::new(0.0, 0.0, 0.0)
    }

    fn building() -> StaticObstacle {
        StaticObstacle::new("tower", origin(), Vector3::new(2.0, 3.0, 10.0)).unwrap()
    }

    fn drone(position: Position, radius: f64, velocity: Vector3) -> MovingObstacle {
        MovingObstacle::new("intruder", position, radius, velocity).unwrap()
    }

    fn fire(initial: f64, rate: f64, max: f64) -> ExpandingObstacle {
        ExpandingObstacle::new("wildfire", origin(), initial, rate, max).unwrap()
    }

    // ==================== Construction ====================

    #[test]
    fn test_default_classification() {
        let s = Obstacle::from(building());
        let m = Obstacle::from(drone(origin(), 1.0, Vector3::default()));
        let e = Obstacle::from(fire(1.0, 1.0, 2.0));
        assert_eq!(s.kind(), ObstacleKind::Static);
        assert_eq!(m.kind(), ObstacleKind::Dynamic);
        assert_eq!(e.kind(), ObstacleKind::Dynamic);
        assert_eq!(s.risk_level(), RiskLevel::Low);
        assert_eq!(m.risk_level(), RiskLevel::Medium);
        assert_eq!(e.risk_level(), RiskLevel::Critical);
        assert_eq!(e.name(), "wildfire");
    }

    #[test]
    fn test_builders_override_info() {
        let o = Obstacle::from(building())
            .with_id(ObstacleId(77))
            .with_name("crane")
            .with_kind(ObstacleKind::Dynamic)
            .with_risk(RiskLevel::High);
        assert_eq!(o.id(), ObstacleId(77));
        assert_eq!(o.name(), "crane");
        assert!(o.is_dynamic());
        assert_eq!(o.risk_level(), RiskLevel::High);
    }

    #[test]
    fn test_invalid_construction_rejected() {
        assert_eq!(
            MovingObstacle::new("m", origin(), -1.0, Vector3::default()).unwrap_err(),
            ObstacleError::InvalidRadius(-1.0)
        );
        assert_eq!(
            ExpandingObstacle::new("e", origin(), 5.0, 1.0, 2.0).unwrap_err(),
            ObstacleError::MaxRadiusBelowInitial {
                initial_radius: 5.0,
                max_radius: 2.0
            }
        );
        assert_eq!(
            ExpandingObstacle::new("e", origin(), 1.0, -0.5, 2.0).unwrap_err(),
            ObstacleError::InvalidExpansionRate(-0.5)
        );
        assert!(StaticObstacle::new("s", origin(), Vector3::new(1.0, -1.0, 1.0)).is_err());
        assert_eq!(
            MovingObstacle::new("m", Position::new(f64::NAN, 0.0, 0.0), 1.0, Vector3::default())
                .unwrap_err(),
            ObstacleError::NonFinite("position")
        );
    }

    #[test]
    fn test_zero_radius_is_valid_point_hazard() {
        let m = drone(Position::new(1.0, 1.0, 1.0), 0.0, Vector3::default());
        assert!(m.contains_point(&Position::new(1.0, 1.0, 1.0)));
        assert!(!m.contains_point(&Position::new(1.0, 1.0, 1.001)));
    }

    // ==================== Static ====================

    #[test]
    fn test_static_contains_point_inclusive_faces() {
        let s = building();
        assert!(s.contains_point(&origin()));
        assert!(s.contains_point(&Position::new(2.0, -3.0, 10.0)));
        assert!(!s.contains_point(&Position::new(2.01, 0.0, 0.0)));
        assert!(!s.contains_point(&Position::new(0.0, 0.0, -10.5)));
    }

    #[test]
    fn test_static_update_is_noop() {
        let mut s = building();
        let before = s.clone();
        s.update(1000.0);
        s.update(-3.0);
        assert_eq!(s, before);
    }

    #[test]
    fn test_static_closest_point_outside_clamps() {
        let s = building();
        let p = s.closest_point_to(&Position::new(10.0, 1.0, 0.0));
        assert_eq!(p, Position::new(2.0, 1.0, 0.0));
        let corner = s.closest_point_to(&Position::new(-9.0, 9.0, 20.0));
        assert_eq!(corner, Position::new(-2.0, 3.0, 10.0));
    }

    #[test]
    fn test_static_closest_point_inside_exits_nearest_face() {
        let s = building();
        // 0.5 slack on -Y, 1.5 on X
        let p = s.closest_point_to(&Position::new(0.5, -2.5, 0.0));
        assert_eq!(p, Position::new(0.5, -3.0, 0.0));
        // Centre falls back to the +X face
        assert_eq!(s.closest_point_to(&origin()), Position::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_static_avoidance_weaker_than_moving() {
        let s = building();
        let m = drone(origin(), 1.0, Vector3::default());
        let agent = Position::new(4.0, 0.0, 0.0);
        let fs = s.avoidance_vector(&agent);
        let fm = m.avoidance_vector(&agent);
        assert_relative_eq!(fs.x, 50.0 / 5.0);
        assert!(fs.magnitude() < fm.magnitude());
    }

    // ==================== Moving ====================

    #[test]
    fn test_moving_update_integrates_velocity() {
        let mut m = drone(origin(), 1.0, Vector3::new(1.0, 0.0, 0.0));
        m.update(2.0);
        assert_eq!(m.position(), Position::new(2.0, 0.0, 0.0));

        let mut climber = drone(origin(), 1.0, Vector3::new(0.5, -1.0, 2.0));
        climber.update(0.5);
        climber.update(1.5);
        assert_abs_diff_eq!(climber.position().x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(climber.position().y, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(climber.position().z, 4.0, epsilon = 1e-12);

        // Non-finite steps are skipped, negative steps rewind
        let mut m = drone(origin(), 1.0, Vector3::new(1.0, 2.0, 0.0));
        m.update(f64::NAN);
        m.update(f64::INFINITY);
        assert_eq!(m.position(), origin());
        m.update(-1.0);
        assert_eq!(m.position(), Position::new(-1.0, -2.0, 0.0));
    }

    #[test]
    fn test_moving_set_velocity() {
        let mut m = drone(origin(), 1.0, Vector3::new(1.0, 0.0, 0.0));
        m.set_velocity(Vector3::new(0.0, 3.0, 0.0)).unwrap();
        m.update(1.0);
        assert_eq!(m.position(), Position::new(0.0, 3.0, 0.0));
        assert!(m.set_velocity(Vector3::new(f64::NAN, 0.0, 0.0)).is_err());
        assert_eq!(m.velocity(), Vector3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_sphere_contains_point_boundary_inclusive() {
        let m = drone(origin(), 5.0, Vector3::default());
        assert!(m.contains_point(&Position::new(3.0, 4.0, 0.0)));
        assert!(m.contains_point(&Position::new(0.0, 0.0, 5.0)));
        assert!(!m.contains_point(&Position::new(3.0, 4.0, 0.1)));
    }

    #[test]
    fn test_sphere_closest_point_projects_to_surface() {
        let m = drone(Position::new(1.0, 1.0, 1.0), 2.0, Vector3::default());
        let p = m.closest_point_to(&Position::new(1.0, 11.0, 1.0));
        assert_abs_diff_eq!(p.x, 1.0);
        assert_abs_diff_eq!(p.y, 3.0);
        assert_abs_diff_eq!(p.z, 1.0);

        // Agent inside the sphere is projected outwards too
        let inside = m.closest_point_to(&Position::new(1.0, 1.0, 1.5));
        assert_abs_diff_eq!(inside.z, 3.0);
    }

    #[test]
    fn test_sphere_closest_point_degenerate_center() {
        let m = drone(Position::new(1.0, 1.0, 1.0), 2.0, Vector3::default());
        let p = m.closest_point_to(&Position::new(1.005, 1.0, 1.0));
        assert_eq!(p, Position::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_moving_avoidance_scenario() {
        let m = drone(Position::new(10.0, 0.0, 0.0), 5.0, Vector3::default());
        let force = m.avoidance_vector(&origin());
        assert!(force.x < 0.0);
        assert_abs_diff_eq!(force.y, 0.0);
        assert_abs_diff_eq!(force.magnitude(), 80.0 / 11.0, epsilon = 1e-9);
    }

    #[test]
    fn test_avoidance_ignores_altitude() {
        let m = drone(Position::new(0.0, 0.0, 50.0), 1.0, Vector3::default());
        let force = m.avoidance_vector(&Position::new(0.0, 3.0, 0.0));
        assert_abs_diff_eq!(force.x, 0.0);
        assert_abs_diff_eq!(force.y, 80.0 / 4.0);
    }

    #[test]
    fn test_avoidance_degenerate_returns_unit_x() {
        let m = drone(Position::new(0.0, 0.0, 0.0), 1.0, Vector3::default());
        // Directly above: planar distance is zero
        let force = m.avoidance_vector(&Position::new(0.0, 0.0, 30.0));
        assert_eq!(force, Vector2D::new(1.0, 0.0));
        assert_eq!(building().avoidance_vector(&origin()), Vector2D::new(1.0, 0.0));
        assert_eq!(fire(1.0, 1.0, 2.0).avoidance_vector(&origin()), Vector2D::new(1.0, 0.0));
    }

    // ==================== Expanding ====================

    #[test]
    fn test_expanding_growth_scenario() {
        let mut e = fire(1.0, 2.0, 10.0);
        e.update(3.0);
        assert_abs_diff_eq!(e.radius(), 7.0);
        e.update(5.0);
        assert_abs_diff_eq!(e.radius(), 10.0);
        e.update(5.0);
        assert_abs_diff_eq!(e.radius(), 10.0);
    }

    #[test]
    fn test_expanding_radius_monotonic_and_capped() {
        let mut e = fire(0.5, 1.3, 4.0);
        let mut previous = e.radius();
        for step in [0.1, 0.0, 0.7, 2.0, -1.0, f64::NAN, 0.3, 5.0, 0.2] {
            e.update(step);
            assert!(e.radius() >= previous);
            assert!(e.radius() <= e.max_radius());
            previous = e.radius();
        }
        assert_eq!(e.radius(), 4.0);
    }

    #[test]
    fn test_expanding_avoidance_formula() {
        let e = fire(2.0, 0.0, 8.0);
        let force = e.avoidance_vector(&Position::new(0.0, -6.0, 0.0));
        // 150 * 0.25 / (6 - 2 + 1)
        assert_abs_diff_eq!(force.x, 0.0);
        assert_relative_eq!(force.y, -7.5);
    }

    #[test]
    fn test_expanding_avoidance_saturates_at_boundary() {
        let e = fire(4.0, 0.0, 4.0);
        let at_boundary = e.avoidance_vector(&Position::new(4.0, 0.0, 0.0));
        let deep_inside = e.avoidance_vector(&Position::new(1.0, 0.0, 0.0));
        let near = e.avoidance_vector(&Position::new(4.5, 0.0, 0.0));
        let far = e.avoidance_vector(&Position::new(10.0, 0.0, 0.0));

        // Never flips towards the hazard
        assert!(deep_inside.x > 0.0);
        assert_relative_eq!(deep_inside.x, 150.0 / EXPANDING_MIN_DENOMINATOR);
        assert!(at_boundary.x > near.x);
        assert!(near.x > far.x);
        assert!(at_boundary.x.is_finite());
    }

    #[test]
    fn test_expanding_zero_max_radius_has_no_force() {
        let e = fire(0.0, 1.0, 0.0);
        let force = e.avoidance_vector(&Position::new(3.0, 0.0, 0.0));
        assert_eq!(force, Vector2D::ZERO);
    }

    // ==================== Dispatch ====================

    #[test]
    fn test_enum_dispatch_updates_variant() {
        let mut o = Obstacle::from(fire(1.0, 1.0, 3.0));
        o.update(1.0);
        assert_eq!(o.radius(), Some(2.0));
        assert!(o.contains_point(&Position::new(2.0, 0.0, 0.0)));
        assert_eq!(Obstacle::from(building()).radius(), None);
    }
}
