//! Physics engine: validated gravity plus the one body it owns
//!
//! Events raised by engine operations are queued in an outbox and handed to a
//! sink by the driver (see [`super::Simulation`]).

use super::body::{Arena, PhysicsBody};
use super::events::SimEvent;
use super::step::integrate;
use super::vector::Vector2D;
use crate::error::{InvalidGravity, PhysicsError};

#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    gravity: f64,
    body: PhysicsBody,
    outbox: Vec<SimEvent>,
}

#[inline]
fn is_valid_gravity(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl PhysicsEngine {
    pub fn new(gravity: f64, body: PhysicsBody) -> Result<Self, InvalidGravity> {
        if !is_valid_gravity(gravity) {
            return Err(InvalidGravity { value: gravity });
        }
        Ok(Self {
            gravity,
            body,
            outbox: Vec::new(),
        })
    }

    #[inline]
    pub fn get_gravity(&self) -> f64 {
        self.gravity
    }

    /// Guarded write. A rejected value leaves gravity unchanged and queues a
    /// warning event.
    pub fn try_set_gravity(&mut self, value: f64) -> Result<(), InvalidGravity> {
        if !is_valid_gravity(value) {
            self.emit(SimEvent::GravityRejected {
                attempted: value,
                kept: self.gravity,
            });
            return Err(InvalidGravity { value });
        }
        let from = self.gravity;
        self.gravity = value;
        self.emit(SimEvent::GravityChanged { from, to: value });
        Ok(())
    }

    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut PhysicsBody {
        &mut self.body
    }

    #[inline]
    pub fn get_position(&self) -> Vector2D {
        self.body.position
    }

    /// Add `(vx, vy) / mass` to the body's velocity and return that change.
    /// Fails without touching the body if the new velocity would not be finite.
    pub fn apply_impulse(&mut self, vx: f64, vy: f64) -> Result<Vector2D, PhysicsError> {
        let adjusted = Vector2D::new(vx, vy).divide(self.body.mass)?;
        let velocity = self.body.velocity + adjusted;
        if !velocity.is_finite() {
            return Err(PhysicsError::NonFiniteVelocity);
        }
        self.body.velocity = velocity;
        self.emit(SimEvent::ImpulseApplied { impulse: adjusted });
        Ok(adjusted)
    }

    /// Advance the body one tick under the current gravity
    pub fn step(&mut self, arena: &Arena, friction: f64) {
        integrate(&mut self.body, self.gravity, arena, friction);
    }

    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.outbox.push(event);
    }

    /// Take every queued event, oldest first
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, SimEvent> {
        self.outbox.drain(..)
    }

    /// Replace physical state with `other`'s and append its queued events
    pub(crate) fn commit(&mut self, other: PhysicsEngine) {
        self.gravity = other.gravity;
        self.body = other.body;
        self.outbox.extend(other.outbox);
    }

    /// Copy of the physical state with an empty outbox
    pub(crate) fn scratch(&self) -> PhysicsEngine {
        PhysicsEngine {
            gravity: self.gravity,
            body: self.body.clone(),
            outbox: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DivisionByZero;

    fn engine() -> PhysicsEngine {
        let body = PhysicsBody::new(Vector2D::new(100.0, 100.0), 2.0, 10.0);
        PhysicsEngine::new(1.5, body).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_gravity() {
        let body = PhysicsBody::new(Vector2D::ZERO, 1.0, 1.0);
        assert!(PhysicsEngine::new(0.0, body.clone()).is_err());
        assert!(PhysicsEngine::new(f64::NAN, body).is_err());
    }

    #[test]
    fn test_apply_impulse_divides_by_mass() {
        let mut engine = engine();
        let adjusted = engine.apply_impulse(10.0, 4.0).unwrap();
        assert_eq!(adjusted, Vector2D::new(5.0, 2.0));
        assert_eq!(engine.body().velocity, Vector2D::new(5.0, 2.0));

        engine.apply_impulse(-10.0, 0.0).unwrap();
        assert_eq!(engine.body().velocity, Vector2D::new(0.0, 2.0));

        let events: Vec<_> = engine.drain_events().collect();
        assert_eq!(
            events[0],
            SimEvent::ImpulseApplied {
                impulse: Vector2D::new(5.0, 2.0)
            }
        );
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_apply_impulse_zero_mass() {
        let mut engine = engine();
        engine.body_mut().mass = 0.0;
        assert_eq!(
            engine.apply_impulse(1.0, 1.0),
            Err(PhysicsError::DivisionByZero(DivisionByZero))
        );
        assert_eq!(engine.body().velocity, Vector2D::ZERO);
        assert_eq!(engine.drain_events().count(), 0);
    }

    #[test]
    fn test_apply_impulse_overflow() {
        let mut engine = engine();
        engine.body_mut().mass = 1e-300;
        assert_eq!(
            engine.apply_impulse(1e10, 0.0),
            Err(PhysicsError::NonFiniteVelocity)
        );
        assert_eq!(engine.body().velocity, Vector2D::ZERO);
        assert_eq!(engine.drain_events().count(), 0);
    }

    #[test]
    fn test_gravity_write() {
        let mut engine = engine();
        engine.try_set_gravity(9.8).unwrap();
        assert_eq!(engine.get_gravity(), 9.8);
        assert_eq!(
            engine.drain_events().next(),
            Some(SimEvent::GravityChanged { from: 1.5, to: 9.8 })
        );
    }

    #[test]
    fn test_gravity_write_rejected() {
        let mut engine = engine();
        for bad in [0.0, -3.0, f64::INFINITY, f64::NAN] {
            assert!(engine.try_set_gravity(bad).is_err());
            assert_eq!(engine.get_gravity(), 1.5);
        }
        let events: Vec<_> = engine.drain_events().collect();
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| matches!(e, SimEvent::GravityRejected { kept, .. } if *kept == 1.5)));
    }

    #[test]
    fn test_step_uses_current_gravity() {
        let arena = Arena::new(400.0, 400.0);
        let mut engine = engine();
        engine.try_set_gravity(4.0).unwrap();
        engine.step(&arena, 0.99);
        assert_eq!(engine.body().velocity.y(), 4.0);
        assert_eq!(engine.get_position(), Vector2D::new(100.0, 104.0));
    }

    #[test]
    fn test_scratch_commit() {
        let mut engine = engine();
        let mut scratch = engine.scratch();
        scratch.apply_impulse(2.0, 0.0).unwrap();
        assert_eq!(engine.body().velocity, Vector2D::ZERO);
        engine.commit(scratch);
        assert_eq!(engine.body().velocity, Vector2D::new(1.0, 0.0));
        assert_eq!(engine.drain_events().count(), 1);
    }
}
