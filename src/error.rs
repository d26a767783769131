//! Error types
//!
//! Physics errors are small and `Copy`; command errors carry enough context to
//! be shown back to whoever typed the line.

use thiserror::Error;

/// Vector (or scalar) division by exactly zero
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot divide by zero")]
pub struct DivisionByZero;

/// Rejected gravity write. The previous value stays in place.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("gravity must be a positive finite number, got {value}")]
pub struct InvalidGravity {
    pub value: f64,
}

/// Failures raised by engine operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("impulse could not be scaled by body mass: {0}")]
    DivisionByZero(#[from] DivisionByZero),

    #[error("impulse would leave the body with a non-finite velocity")]
    NonFiniteVelocity,
}

/// Why a command line could not be parsed or evaluated
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("unexpected character {found:?} at column {column}")]
    Lex { found: char, column: usize },

    #[error("syntax error at column {column}: expected {expected}, found {found}")]
    Syntax {
        expected: &'static str,
        found: String,
        column: usize,
    },

    #[error("name '{name}' is not defined (available: Vector2D, engine, obj)")]
    UnknownName { name: String },

    #[error("'{target}' has no member '{member}'")]
    UnknownMember { target: &'static str, member: String },

    #[error("{callee}() takes {expected} arguments, {got} given")]
    Arity {
        callee: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("'{target}' is read-only")]
    ReadOnly { target: String },

    #[error("'{name}' cannot be used as a value")]
    NotAValue { name: &'static str },

    #[error("expected a {expected}, found a {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{what} is not a finite number")]
    NotFinite { what: &'static str },

    #[error("command is {len} bytes long, limit is {max}")]
    TooLong { len: usize, max: usize },

    #[error("expression nested deeper than {max} levels")]
    TooDeep { max: usize },

    #[error("command has {count} statements, limit is {max}")]
    TooManyStatements { count: usize, max: usize },

    #[error(transparent)]
    DivisionByZero(#[from] DivisionByZero),

    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// A submitted line that failed. Engine state is left as it was before the line.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("error executing command {command:?}: {source}")]
pub struct CommandExecutionError {
    pub command: String,
    #[source]
    pub source: CommandError,
}

/// Startup configuration problems
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("tick_hz must be in [{min}, {max}], got {value}")]
    TickRateOutOfRange { value: f64, min: f64, max: f64 },

    #[error("friction must be in (0, 1], got {0}")]
    FrictionOutOfRange(f64),

    #[error("body radius {radius} does not fit a {width}x{height} arena")]
    BodyTooLarge { radius: f64, width: f64, height: f64 },

    #[error("start position ({x}, {y}) puts the body outside the arena")]
    StartOutsideArena { x: f64, y: f64 },
}
