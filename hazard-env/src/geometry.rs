//! Planar geometry of the game: points, wall rectangles and distance tests.
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A point or displacement on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Vec2) -> f32 {
        (*self - *other).norm()
    }

    /// Clamps both coordinates into `[lo, hi]`.
    pub fn clamp(&self, lo: f32, hi: f32) -> Self {
        Self {
            x: self.x.clamp(lo, hi),
            y: self.y.clamp(lo, hi),
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(v: [f32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

/// A static axis-aligned wall.
///
/// The wall covers `[x, x + w] × [y, y + h]`, bounds included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Wall {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns `true` if `p` lies inside the wall or on its boundary.
    pub fn contains(&self, p: &Vec2) -> bool {
        self.x <= p.x && p.x <= self.x + self.w && self.y <= p.y && p.y <= self.y + self.h
    }
}

/// Returns `true` if `p` lies inside any of `walls`.
pub fn inside_any(walls: &[Wall], p: &Vec2) -> bool {
    walls.iter().any(|wall| wall.contains(p))
}

/// Circular collision test: `a` and `b` collide when strictly closer than `radius`.
pub fn collides(a: &Vec2, b: &Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Minimum distance from `p` to any of `others`, `f32::INFINITY` when empty.
pub fn min_distance<'a>(p: &Vec2, others: impl IntoIterator<Item = &'a Vec2>) -> f32 {
    others
        .into_iter()
        .map(|o| p.distance(o))
        .fold(f32::INFINITY, f32::min)
}
