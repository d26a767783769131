//! 2D vector value type
//!
//! A thin wrapper over `glam::DVec2`. Every operation returns a fresh value;
//! division is fallible because dividing by an exact zero is an error here
//! rather than an infinity.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::DivisionByZero;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector2D(DVec2);

impl Vector2D {
    pub const ZERO: Self = Self(DVec2::ZERO);

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self(DVec2::new(x, y))
    }

    #[inline]
    pub fn x(self) -> f64 {
        self.0.x
    }

    #[inline]
    pub fn y(self) -> f64 {
        self.0.y
    }

    /// Component-wise multiply by `k`
    #[inline]
    pub fn scale(self, k: f64) -> Self {
        Self(self.0 * k)
    }

    /// Component-wise divide by `k`, failing when `k == 0.0`
    pub fn divide(self, k: f64) -> Result<Self, DivisionByZero> {
        if k == 0.0 {
            return Err(DivisionByZero);
        }
        Ok(Self(self.0 / k))
    }

    /// Per-component equality within `max_abs_diff`. Integration tests use it
    /// where exact float comparison would be too strict.
    pub fn abs_diff_eq(self, other: Self, max_abs_diff: f64) -> bool {
        self.0.abs_diff_eq(other.0, max_abs_diff)
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn to_tuple(self) -> (f64, f64) {
        (self.0.x, self.0.y)
    }
}

impl From<(f64, f64)> for Vector2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Vector2D {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vector2D {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Self;
    fn mul(self, k: f64) -> Self {
        self.scale(k)
    }
}

impl Neg for Vector2D {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0.x, self.0.y)
    }
}
