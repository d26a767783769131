//! Simulation events and where they go
//!
//! The core only produces [`SimEvent`] values. Formatting and destination are
//! decided by whichever [`EventSink`] the driver was given.

use std::fmt;
use std::io::Write;

use log::Level;
use serde::{Deserialize, Serialize};

use super::vector::Vector2D;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    /// A line arrived from the input collaborator
    CommandReceived { text: String },
    CommandExecuted { text: String },
    CommandFailed { text: String, reason: String },
    /// Velocity change actually applied (impulse / mass)
    ImpulseApplied { impulse: Vector2D },
    GravityChanged { from: f64, to: f64 },
    GravityRejected { attempted: f64, kept: f64 },
}

impl SimEvent {
    pub fn level(&self) -> Level {
        match self {
            SimEvent::CommandFailed { .. } | SimEvent::GravityRejected { .. } => Level::Warn,
            _ => Level::Info,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimEvent::CommandReceived { text } => write!(f, "command received: {text}"),
            SimEvent::CommandExecuted { text } => write!(f, "command executed: {text}"),
            SimEvent::CommandFailed { text, reason } => {
                write!(f, "command failed: {text}: {reason}")
            }
            SimEvent::ImpulseApplied { impulse } => {
                write!(f, "impulse applied: {}, {}", impulse.x(), impulse.y())
            }
            SimEvent::GravityChanged { from, to } => write!(f, "gravity changed: {from} -> {to}"),
            SimEvent::GravityRejected { attempted, kept } => {
                write!(f, "gravity must be positive (got {attempted}, keeping {kept})")
            }
        }
    }
}

/// Destination for simulation events
pub trait EventSink {
    fn emit(&mut self, event: &SimEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: &SimEvent) {
        log::log!(event.level(), "{event}");
    }
}

/// Writes one JSON object per event
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &SimEvent) {
        let written = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        if let Err(e) = written {
            log::error!("failed to write event: {e}");
        }
    }
}

/// Collects events in memory
impl EventSink for Vec<SimEvent> {
    fn emit(&mut self, event: &SimEvent) {
        self.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let rejected = SimEvent::GravityRejected {
            attempted: -1.0,
            kept: 1.5,
        };
        assert_eq!(rejected.level(), Level::Warn);
        let applied = SimEvent::ImpulseApplied {
            impulse: Vector2D::new(1.0, 0.0),
        };
        assert_eq!(applied.level(), Level::Info);
    }

    #[test]
    fn test_json_lines() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.emit(&SimEvent::GravityChanged { from: 1.5, to: 3.0 });
        sink.emit(&SimEvent::CommandExecuted {
            text: "engine.gravity = 3".into(),
        });
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"event":"gravity_changed","from":1.5,"to":3.0}"#);

        let parsed: SimEvent = serde_json::from_str(lines[1]).unwrap();
        assert!(matches!(parsed, SimEvent::CommandExecuted { .. }));
    }

    #[test]
    fn test_display() {
        let event = SimEvent::ImpulseApplied {
            impulse: Vector2D::new(5.0, -2.5),
        };
        assert_eq!(event.to_string(), "impulse applied: 5, -2.5");
    }
}
