//! Executes parsed command lines against a [`PhysicsEngine`]
//!
//! A line runs all-or-nothing: statements execute on a scratch copy of the
//! engine, which replaces the live state only if every statement succeeds.

use std::fmt;

use serde::Serialize;

use super::parser::{Axis, BinOp, Command, Expr, Quantity, parse};
use crate::error::{CommandError, CommandExecutionError, DivisionByZero};
use crate::sim::{PhysicsEngine, SimEvent, Vector2D};

/// Result of evaluating an expression
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(f64),
    Vector(Vector2D),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "number",
            Value::Vector(_) => "vector",
        }
    }

    fn scalar(self) -> Result<f64, CommandError> {
        match self {
            Value::Scalar(s) => Ok(s),
            other => Err(CommandError::TypeMismatch {
                expected: "number",
                found: other.type_name(),
            }),
        }
    }

    fn vector(self) -> Result<Vector2D, CommandError> {
        match self {
            Value::Vector(v) => Ok(v),
            other => Err(CommandError::TypeMismatch {
                expected: "vector",
                found: other.type_name(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => write!(f, "{s}"),
            Value::Vector(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct CommandInterpreter {
    executed: u64,
    failed: u64,
}

impl CommandInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines that ran to completion
    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Lines that were rejected
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Parse and run one line. Every failure is caught here and returned;
    /// on failure the engine is exactly as it was before the call.
    pub fn execute(
        &mut self,
        engine: &mut PhysicsEngine,
        text: &str,
    ) -> Result<Vec<Value>, CommandExecutionError> {
        let outcome = parse(text).and_then(|commands| {
            let mut scratch = engine.scratch();
            let values = run_all(&mut scratch, &commands)?;
            Ok((scratch, values))
        });

        match outcome {
            Ok((scratch, values)) => {
                engine.commit(scratch);
                engine.emit(SimEvent::CommandExecuted { text: text.to_string() });
                self.executed += 1;
                Ok(values)
            }
            Err(source) => {
                engine.emit(SimEvent::CommandFailed {
                    text: text.to_string(),
                    reason: source.to_string(),
                });
                self.failed += 1;
                Err(CommandExecutionError {
                    command: text.to_string(),
                    source,
                })
            }
        }
    }
}

fn run_all(engine: &mut PhysicsEngine, commands: &[Command]) -> Result<Vec<Value>, CommandError> {
    let mut reported = Vec::new();
    for command in commands {
        match command {
            Command::ApplyImpulse { impulse } => {
                let impulse = eval(engine, impulse)?.vector()?;
                if !impulse.is_finite() {
                    return Err(CommandError::NotFinite { what: "impulse" });
                }
                engine.apply_impulse(impulse.x(), impulse.y())?;
            }
            Command::SetGravity { value } => {
                let value = eval(engine, value)?.scalar()?;
                // Rejection is a warning event, not a failed command
                let _ = engine.try_set_gravity(value);
            }
            Command::GetPosition => reported.push(Value::Vector(engine.get_position())),
            Command::Inspect(expr) => reported.push(eval(engine, expr)?),
        }
    }
    Ok(reported)
}

fn read(engine: &PhysicsEngine, quantity: Quantity) -> Value {
    let body = engine.body();
    match quantity {
        Quantity::Gravity => Value::Scalar(engine.get_gravity()),
        Quantity::Position => Value::Vector(body.position),
        Quantity::Velocity => Value::Vector(body.velocity),
        Quantity::Mass => Value::Scalar(body.mass),
        Quantity::Radius => Value::Scalar(body.radius),
    }
}

fn eval(engine: &PhysicsEngine, expr: &Expr) -> Result<Value, CommandError> {
    Ok(match expr {
        Expr::Number(n) => Value::Scalar(*n),
        Expr::Read(quantity) => read(engine, *quantity),
        Expr::Vector(x, y) => {
            let x = eval(engine, x)?.scalar()?;
            let y = eval(engine, y)?.scalar()?;
            Value::Vector(Vector2D::new(x, y))
        }
        Expr::Component(inner, axis) => {
            let v = eval(engine, inner)?.vector()?;
            Value::Scalar(match axis {
                Axis::X => v.x(),
                Axis::Y => v.y(),
            })
        }
        Expr::Neg(inner) => match eval(engine, inner)? {
            Value::Scalar(s) => Value::Scalar(-s),
            Value::Vector(v) => Value::Vector(-v),
        },
        Expr::Binary(op, lhs, rhs) => {
            let lhs = eval(engine, lhs)?;
            let rhs = eval(engine, rhs)?;
            binary(*op, lhs, rhs)?
        }
    })
}

fn binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, CommandError> {
    use Value::{Scalar, Vector};

    let mismatch = |expected: &'static str, found: &Value| CommandError::TypeMismatch {
        expected,
        found: found.type_name(),
    };

    Ok(match (op, lhs, rhs) {
        (BinOp::Add, Scalar(a), Scalar(b)) => Scalar(a + b),
        (BinOp::Sub, Scalar(a), Scalar(b)) => Scalar(a - b),
        (BinOp::Add, Vector(a), Vector(b)) => Vector(a + b),
        (BinOp::Sub, Vector(a), Vector(b)) => Vector(a - b),
        (BinOp::Add | BinOp::Sub, Scalar(_), other) => return Err(mismatch("number", &other)),
        (BinOp::Add | BinOp::Sub, Vector(_), other) => return Err(mismatch("vector", &other)),

        (BinOp::Mul, Scalar(a), Scalar(b)) => Scalar(a * b),
        (BinOp::Mul, Vector(v), Scalar(k)) | (BinOp::Mul, Scalar(k), Vector(v)) => {
            Vector(v.scale(k))
        }
        (BinOp::Mul, Vector(_), other @ Vector(_)) => return Err(mismatch("number", &other)),

        (BinOp::Div, Scalar(a), Scalar(b)) => {
            if b == 0.0 {
                return Err(DivisionByZero.into());
            }
            Scalar(a / b)
        }
        (BinOp::Div, Vector(v), Scalar(k)) => Vector(v.divide(k)?),
        (BinOp::Div, _, other @ Vector(_)) => return Err(mismatch("number", &other)),
    })
}
