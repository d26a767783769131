//! Fixed-tick integration step
//!
//! One tick is one unit of time: gravity is in velocity units per tick and
//! position advances by exactly one velocity per tick (explicit Euler).

use super::body::{Arena, PhysicsBody};
use crate::consts::VERTICAL_RESTITUTION;

/// Advance `body` by one tick.
///
/// The order is fixed and matters for reproducing trajectories:
/// 1. gravity is added to the vertical velocity
/// 2. if the body was resting on the floor *before* moving, floor friction
///    scales the horizontal velocity
/// 3. position += velocity
/// 4. side walls: horizontal velocity flips and x is clamped to the wall
/// 5. floor/ceiling: vertical velocity is reversed and damped, y is clamped
///
/// Requires `body.radius < arena.width / 2` and `< arena.height / 2`; that is
/// checked once at startup, not here.
pub fn integrate(body: &mut PhysicsBody, gravity: f64, arena: &Arena, friction: f64) {
    let r = body.radius;
    let (mut x, mut y) = body.position.to_tuple();
    let (mut vx, mut vy) = body.velocity.to_tuple();

    vy += gravity;

    if y + r >= arena.height {
        vx *= friction;
    }

    x += vx;
    y += vy;

    if x - r < 0.0 || x + r > arena.width {
        vx = -vx;
        x = if x - r < 0.0 { r } else { arena.width - r };
    }

    if y - r < 0.0 || y + r > arena.height {
        vy *= -VERTICAL_RESTITUTION;
        y = if y - r < 0.0 { r } else { arena.height - r };
    }

    body.position = (x, y).into();
    body.velocity = (vx, vy).into();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Vector2D;

    const W: f64 = 1208.0;
    const H: f64 = 700.0;
    const R: f64 = 20.0;

    fn arena() -> Arena {
        Arena::new(W, H)
    }

    #[test]
    fn test_free_fall_one_tick() {
        let mut body = PhysicsBody::new(Vector2D::new(W / 2.0, H / 2.0), 1.0, R);
        integrate(&mut body, 1.5, &arena(), 0.99);
        assert_eq!(body.velocity, Vector2D::new(0.0, 1.5));
        assert_eq!(body.position, Vector2D::new(W / 2.0, H / 2.0 + 1.5));
    }

    #[test]
    fn test_floor_friction() {
        let mut body = PhysicsBody::new(Vector2D::new(W / 2.0, H - R), 1.0, R)
            .with_velocity(Vector2D::new(10.0, 0.0));
        integrate(&mut body, 1.5, &arena(), 0.99);
        assert!((body.velocity.x() - 9.9).abs() < 1e-12);
    }

    #[test]
    fn test_no_friction_in_air() {
        let mut body = PhysicsBody::new(Vector2D::new(W / 2.0, H / 2.0), 1.0, R)
            .with_velocity(Vector2D::new(10.0, 0.0));
        integrate(&mut body, 1.5, &arena(), 0.99);
        assert_eq!(body.velocity.x(), 10.0);
    }

    #[test]
    fn test_friction_uses_pre_move_position() {
        // Moving up off the floor this tick: still grounded when friction is evaluated
        let mut body = PhysicsBody::new(Vector2D::new(W / 2.0, H - R), 1.0, R)
            .with_velocity(Vector2D::new(10.0, -20.0));
        integrate(&mut body, 1.5, &arena(), 0.5);
        assert_eq!(body.velocity.x(), 5.0);
        assert!(body.position.y() + R < H);

        // Falling onto the floor this tick: not grounded yet, no friction
        let mut body = PhysicsBody::new(Vector2D::new(W / 2.0, H - R - 5.0), 1.0, R)
            .with_velocity(Vector2D::new(10.0, 10.0));
        integrate(&mut body, 1.5, &arena(), 0.5);
        assert_eq!(body.velocity.x(), 10.0);
        assert_eq!(body.position.y(), H - R);
    }

    #[test]
    fn test_right_wall_bounce() {
        let mut body = PhysicsBody::new(Vector2D::new(W - R - 1.0, H / 2.0), 1.0, R)
            .with_velocity(Vector2D::new(5.0, 0.0));
        integrate(&mut body, 1.5, &arena(), 0.99);
        assert_eq!(body.velocity.x(), -5.0);
        assert_eq!(body.position.x(), W - R);
    }

    #[test]
    fn test_left_wall_bounce() {
        let mut body = PhysicsBody::new(Vector2D::new(R + 2.0, H / 2.0), 1.0, R)
            .with_velocity(Vector2D::new(-8.0, 0.0));
        integrate(&mut body, 1.5, &arena(), 0.99);
        assert_eq!(body.velocity.x(), 8.0);
        assert_eq!(body.position.x(), R);
    }

    #[test]
    fn test_floor_bounce_loses_energy() {
        let mut body = PhysicsBody::new(Vector2D::new(W / 2.0, H - R - 1.0), 1.0, R)
            .with_velocity(Vector2D::new(0.0, 8.5));
        integrate(&mut body, 1.5, &arena(), 0.99);
        // vy = 10 after gravity, then reversed at 90%
        assert!((body.velocity.y() + 9.0).abs() < 1e-12);
        assert_eq!(body.position.y(), H - R);
    }

    #[test]
    fn test_ceiling_bounce() {
        let mut body = PhysicsBody::new(Vector2D::new(W / 2.0, R + 1.0), 1.0, R)
            .with_velocity(Vector2D::new(0.0, -11.5));
        integrate(&mut body, 1.5, &arena(), 0.99);
        assert!((body.velocity.y() - 9.0).abs() < 1e-12);
        assert_eq!(body.position.y(), R);
    }

    #[test]
    fn test_corner_corrects_both_axes() {
        let mut body = PhysicsBody::new(Vector2D::new(W - R - 1.0, H - R - 1.0), 1.0, R)
            .with_velocity(Vector2D::new(4.0, 4.0));
        integrate(&mut body, 1.5, &arena(), 0.99);
        assert_eq!(body.position, Vector2D::new(W - R, H - R));
        assert_eq!(body.velocity.x(), -4.0);
        assert!(body.velocity.y() < 0.0);
    }

    #[test]
    fn test_settles_on_floor() {
        let mut body = PhysicsBody::new(Vector2D::new(W / 2.0, H / 2.0), 1.0, R);
        for _ in 0..5_000 {
            integrate(&mut body, 1.5, &arena(), 0.99);
            assert!(body.position.y() + R <= H);
        }
        // Resting contact: each tick re-adds gravity and bounces it away
        assert_eq!(body.position.y(), H - R);
        assert!(body.velocity.y().abs() <= 1.5);
    }
}
