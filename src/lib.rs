//! Arena Impulse - one bouncing body, steered from a command line
//!
//! Core modules:
//! - `sim`: Deterministic physics (vector math, integration step, engine, driver)
//! - `command`: Parser and interpreter for the sandboxed command vocabulary
//! - `settings`: JSON-loadable configuration
//! - `error`: Error types

pub mod command;
pub mod error;
pub mod settings;
pub mod sim;

pub use command::{CommandInterpreter, Value};
pub use error::{CommandError, CommandExecutionError, ConfigError, DivisionByZero, InvalidGravity};
pub use settings::Settings;
pub use sim::{Arena, PhysicsBody, PhysicsEngine, SimEvent, Simulation, Vector2D};

/// Simulation configuration constants
pub mod consts {
    /// Driver loop rate
    pub const TICK_HZ: f64 = 30.0;
    /// Accepted range for a configured loop rate
    pub const MIN_TICK_HZ: f64 = 1e-3;
    pub const MAX_TICK_HZ: f64 = 1e4;

    /// Arena dimensions (screen units, origin top-left, y down)
    pub const ARENA_WIDTH: f64 = 1208.0;
    pub const ARENA_HEIGHT: f64 = 700.0;

    /// Body defaults
    pub const BODY_RADIUS: f64 = 20.0;
    pub const BODY_MASS: f64 = 1.0;

    /// Velocity units per tick, downward
    pub const DEFAULT_GRAVITY: f64 = 1.5;
    /// Horizontal damping while resting on the floor
    pub const FLOOR_FRICTION: f64 = 0.99;
    /// Fraction of vertical speed kept after hitting floor or ceiling
    pub const VERTICAL_RESTITUTION: f64 = 0.9;

    /// Command line limits (keep parsing and evaluation bounded)
    pub const MAX_COMMAND_LEN: usize = 256;
    pub const MAX_STATEMENTS: usize = 8;
    pub const MAX_EXPR_DEPTH: usize = 32;
}
