//! The simulated body and the arena it lives in

use super::vector::Vector2D;
use crate::error::ConfigError;

/// A single circular body. Owned by [`super::PhysicsEngine`].
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    pub position: Vector2D,
    pub velocity: Vector2D,
    /// Must stay > 0; impulses are divided by it
    pub mass: f64,
    /// Fixed at construction
    pub radius: f64,
}

impl PhysicsBody {
    pub fn new(position: Vector2D, mass: f64, radius: f64) -> Self {
        Self {
            position,
            velocity: Vector2D::ZERO,
            mass,
            radius,
        }
    }

    pub fn with_velocity(mut self, velocity: Vector2D) -> Self {
        self.velocity = velocity;
        self
    }

    /// Bottom edge touching or below the floor
    #[inline]
    pub fn is_grounded(&self, arena: &Arena) -> bool {
        self.position.y() + self.radius >= arena.height
    }
}

/// Axis-aligned arena with the origin at the top-left corner and y growing
/// downward (screen coordinates), so gravity is +y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.width / 2.0, self.height / 2.0)
    }

    /// Check the integration precondition for a body of `radius`
    pub fn check_fits(&self, radius: f64) -> Result<(), ConfigError> {
        if radius * 2.0 >= self.width || radius * 2.0 >= self.height {
            return Err(ConfigError::BodyTooLarge {
                radius,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// True if a circle of `radius` at `pos` lies fully inside the walls
    pub fn contains(&self, pos: Vector2D, radius: f64) -> bool {
        pos.x() - radius >= 0.0
            && pos.x() + radius <= self.width
            && pos.y() - radius >= 0.0
            && pos.y() + radius <= self.height
    }
}
