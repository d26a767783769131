//! Tick-then-drain driver
//!
//! Each [`Simulation::step`] integrates the body once and only then runs the
//! command lines queued since the previous step, so integration and command
//! execution never interleave.

use std::collections::VecDeque;

use super::body::Arena;
use super::engine::PhysicsEngine;
use super::events::{EventSink, SimEvent};
use super::vector::Vector2D;
use crate::command::{CommandInterpreter, Value};
use crate::error::{CommandExecutionError, ConfigError};
use crate::settings::Settings;

/// Outcome of one drained command line
#[derive(Debug)]
pub struct CommandReport {
    pub text: String,
    pub result: Result<Vec<Value>, CommandExecutionError>,
}

pub struct Simulation {
    engine: PhysicsEngine,
    arena: Arena,
    friction: f64,
    interpreter: CommandInterpreter,
    pending: VecDeque<String>,
    ticks: u64,
    sink: Box<dyn EventSink>,
}

impl Simulation {
    pub fn new(settings: &Settings, sink: Box<dyn EventSink>) -> Result<Self, ConfigError> {
        settings.validate()?;
        let engine = PhysicsEngine::new(settings.gravity, settings.body()).map_err(|e| {
            ConfigError::NonPositive {
                field: "gravity",
                value: e.value,
            }
        })?;
        Ok(Self {
            engine,
            arena: settings.arena(),
            friction: settings.friction,
            interpreter: CommandInterpreter::new(),
            pending: VecDeque::new(),
            ticks: 0,
            sink,
        })
    }

    /// Queue a line to run after the next integration step
    pub fn submit(&mut self, text: impl Into<String>) {
        self.pending.push_back(text.into());
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// One tick: integrate, then drain every queued command line in order
    pub fn step(&mut self) -> Vec<CommandReport> {
        self.engine.step(&self.arena, self.friction);
        self.ticks += 1;

        let mut reports = Vec::with_capacity(self.pending.len());
        while let Some(text) = self.pending.pop_front() {
            let result = self.execute(&text);
            reports.push(CommandReport { text, result });
        }
        self.flush();
        reports
    }

    /// Run a line right away, between ticks
    pub fn run_command(&mut self, text: &str) -> Result<Vec<Value>, CommandExecutionError> {
        let result = self.execute(text);
        self.flush();
        result
    }

    fn execute(&mut self, text: &str) -> Result<Vec<Value>, CommandExecutionError> {
        self.engine.emit(SimEvent::CommandReceived {
            text: text.to_string(),
        });
        self.interpreter.execute(&mut self.engine, text)
    }

    fn flush(&mut self) {
        for event in self.engine.drain_events() {
            self.sink.emit(&event);
        }
    }

    /// Render feed
    pub fn position(&self) -> Vector2D {
        self.engine.get_position()
    }

    pub fn engine(&self) -> &PhysicsEngine {
        &self.engine
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn interpreter(&self) -> &CommandInterpreter {
        &self.interpreter
    }
}
