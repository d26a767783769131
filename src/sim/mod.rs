//! Deterministic simulation module
//!
//! Everything that moves the body lives here:
//! - Fixed tick only (one tick = one unit of time)
//! - No rendering, input or platform dependencies
//! - Events are data; sinks decide where they go

pub mod body;
pub mod driver;
pub mod engine;
pub mod events;
pub mod step;
pub mod vector;

pub use body::{Arena, PhysicsBody};
pub use driver::{CommandReport, Simulation};
pub use engine::PhysicsEngine;
pub use events::{EventSink, JsonLinesSink, LogSink, SimEvent};
pub use step::integrate;
pub use vector::Vector2D;
