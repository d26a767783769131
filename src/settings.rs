//! Simulation settings
//!
//! Loaded from an optional JSON file; any field left out takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::{Arena, PhysicsBody, Vector2D};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub arena_width: f64,
    pub arena_height: f64,
    pub body_radius: f64,
    pub body_mass: f64,
    /// Velocity units added per tick
    pub gravity: f64,
    /// Horizontal velocity multiplier while grounded
    pub friction: f64,
    /// Fixed loop rate of the driver
    pub tick_hz: f64,
    /// `None` starts the body at the arena centre
    pub start_position: Option<Vector2D>,
    pub start_velocity: Vector2D,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            body_radius: BODY_RADIUS,
            body_mass: BODY_MASS,
            gravity: DEFAULT_GRAVITY,
            friction: FLOOR_FRICTION,
            tick_hz: TICK_HZ,
            start_position: None,
            start_velocity: Vector2D::ZERO,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

impl Settings {
    /// Read and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings");
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Startup checks; nothing here is re-checked per tick
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("body_radius", self.body_radius)?;
        positive("body_mass", self.body_mass)?;
        positive("gravity", self.gravity)?;
        if !(MIN_TICK_HZ..=MAX_TICK_HZ).contains(&self.tick_hz) {
            return Err(ConfigError::TickRateOutOfRange {
                value: self.tick_hz,
                min: MIN_TICK_HZ,
                max: MAX_TICK_HZ,
            });
        }
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(ConfigError::FrictionOutOfRange(self.friction));
        }

        let arena = self.arena();
        arena.check_fits(self.body_radius)?;

        let start = self.start();
        if !start.is_finite() || !arena.contains(start, self.body_radius) {
            return Err(ConfigError::StartOutsideArena {
                x: start.x(),
                y: start.y(),
            });
        }
        Ok(())
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    fn start(&self) -> Vector2D {
        self.start_position.unwrap_or_else(|| self.arena().center())
    }

    /// The body described by these settings
    pub fn body(&self) -> PhysicsBody {
        PhysicsBody::new(self.start(), self.body_mass, self.body_radius)
            .with_velocity(self.start_velocity)
    }
}
