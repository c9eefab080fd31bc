//! # Core Data Structures
//!
//! Fundamental types shared by obstacles and the registry:
//!
//! - **Position**: 3D point in simulation space (metres)
//! - **Vector3**: 3D displacement, used for velocities
//! - **Vector2D**: planar force vector returned by avoidance queries
//! - **ObstacleId / ObstacleKind / RiskLevel**: obstacle identity and classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg_attr(feature = "python", pyo3::pyclass(get_all, set_all))]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Position { x, y, z }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }

    /// Offset from `self` to `other` in the X/Y plane, altitude dropped
    pub fn planar_offset_to(&self, other: &Position) -> Vector2D {
        Vector2D {
            x: other.x - self.x,
            y: other.y - self.y,
        }
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`
    pub fn lerp(&self, other: &Position, t: f64) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

impl Sub for Position {
    type Output = Vector3;

    fn sub(self, other: Position) -> Vector3 {
        Vector3 {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Add<Vector3> for Position {
    type Output = Position;

    fn add(self, other: Vector3) -> Position {
        Position {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign<Vector3> for Position {
    fn add_assign(&mut self, other: Vector3) {
        *self = *self + other;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, scalar: f64) -> Vector3 {
        Vector3 {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

#[cfg_attr(feature = "python", pyo3::pyclass(get_all, set_all))]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const ZERO: Vector2D = Vector2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector2D({:.2}, {:.2})", self.x, self.y)
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, other: Vector2D) -> Vector2D {
        Vector2D {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, other: Vector2D) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    fn mul(self, scalar: f64) -> Vector2D {
        Vector2D {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl std::iter::Sum for Vector2D {
    fn sum<I: Iterator<Item = Vector2D>>(iter: I) -> Vector2D {
        iter.fold(Vector2D::ZERO, |acc, v| acc + v)
    }
}

static NEXT_OBSTACLE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique obstacle identifier, stable for the obstacle's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObstacleId(pub u64);

impl ObstacleId {
    /// Draw a fresh id from the process-wide counter
    pub fn next() -> Self {
        ObstacleId(NEXT_OBSTACLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Mark `id` as taken so [`ObstacleId::next`] never hands it out
    pub fn reserve(id: ObstacleId) {
        NEXT_OBSTACLE_ID.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification only; update behaviour belongs to the obstacle variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Static,
    Dynamic,
}

/// Severity carried for downstream steering logic, ordered Low < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(RiskLevel::Low),
            "medium" | "med" => Some(RiskLevel::Medium),
            "high" => Some(RiskLevel::High),
            "critical" | "crit" => Some(RiskLevel::Critical),
            _ => None,
        }
    }
}
