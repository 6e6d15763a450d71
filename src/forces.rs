//! Built-in force creators
//!
//! A force creator is a unit of per-tick physics bound to specific bodies at
//! registration time. Each function here packages one physical behavior as a
//! closure and registers it on the scene; constants and latched contact
//! state live in the closure's captures.
//!
//! Collision-driven creators are edge-triggered: the handler fires once on
//! the transition into contact and re-arms only after the shapes separate.
//! Without the debounce, sustained overlap would re-run destructive or
//! scoring handlers every tick.

use glam::DVec2;

use crate::body::Body;
use crate::collision::find_collision;
use crate::scene::{BodyId, Scene};

/// Separation below which newtonian gravity is suppressed, keeping the
/// inverse-square term from exploding as the centroids approach.
pub const GRAVITY_MIN_DISTANCE: f64 = 5.0;

/// Contact state of one collision binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContactState {
    Separated,
    Colliding,
}

/// Newtonian inverse-square attraction between two centroids, with
/// gravitational constant `g`. No force is applied while the bodies are
/// closer than [`GRAVITY_MIN_DISTANCE`].
pub fn newtonian_gravity(scene: &mut Scene, g: f64, a: BodyId, b: BodyId) {
    scene.add_force(vec![a, b], move |bodies| {
        let [b1, b2] = bodies else { return };
        let r = b2.centroid() - b1.centroid();
        let dist = r.length();
        if dist > GRAVITY_MIN_DISTANCE {
            let scalar = g * b1.mass() * b2.mass() / dist.powi(3);
            let force = scalar * r;
            b1.add_force(force);
            b2.add_force(-force);
        }
    });
}

/// Hookean spring with constant `k`: force proportional to the displacement
/// between the two centroids, uncapped.
pub fn spring(scene: &mut Scene, k: f64, a: BodyId, b: BodyId) {
    scene.add_force(vec![a, b], move |bodies| {
        let [b1, b2] = bodies else { return };
        let force = k * (b2.centroid() - b1.centroid());
        b1.add_force(force);
        b2.add_force(-force);
    });
}

/// Linear drag with coefficient `gamma`: force opposing the body's current
/// velocity.
pub fn drag(scene: &mut Scene, gamma: f64, body: BodyId) {
    scene.add_force(vec![body], move |bodies| {
        let [b] = bodies else { return };
        let force = -gamma * b.velocity();
        b.add_force(force);
    });
}

/// Generic collision binding: runs the SAT detector every tick and invokes
/// `handler(body_a, body_b, axis)` only on the transition into contact.
pub fn collision(
    scene: &mut Scene,
    a: BodyId,
    b: BodyId,
    mut handler: impl FnMut(&mut Body, &mut Body, DVec2) + 'static,
) {
    let mut contact = ContactState::Separated;
    scene.add_force(vec![a, b], move |bodies| {
        let [b1, b2] = bodies else { return };
        let info = find_collision(b1.shape(), b2.shape());
        if info.collided && contact == ContactState::Separated {
            handler(b1, b2, info.axis);
        }
        contact = if info.collided {
            ContactState::Colliding
        } else {
            ContactState::Separated
        };
    });
}

/// Impulse-based collision response with restitution `elasticity` in
/// `[0, 1]`: 1.0 is a perfectly elastic bounce, 0.0 perfectly inelastic.
///
/// The impulse acts along the collision axis, scaled by the reduced mass of
/// the pair; an infinite-mass body dominates, leaving the other body to
/// absorb the full velocity change.
pub fn physics_collision(scene: &mut Scene, elasticity: f64, a: BodyId, b: BodyId) {
    collision(scene, a, b, move |b1, b2, axis| {
        let m1 = b1.mass();
        let m2 = b2.mass();
        let u1 = b1.velocity().dot(axis);
        let u2 = b2.velocity().dot(axis);

        let reduced_mass = if m1.is_infinite() {
            m2
        } else if m2.is_infinite() {
            m1
        } else {
            m1 * m2 / (m1 + m2)
        };

        let impulse = reduced_mass * (1.0 + elasticity) * (u2 - u1) * axis;
        b1.add_impulse(impulse);
        b2.add_impulse(-impulse);
    });
}

/// Marks both bodies removed when they first touch.
pub fn destructive_collision(scene: &mut Scene, a: BodyId, b: BodyId) {
    collision(scene, a, b, |b1, b2, _axis| {
        b1.remove();
        b2.remove();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{INFINITE_MASS, Rgb};
    use crate::geometry::Polygon;
    use std::cell::Cell;
    use std::rc::Rc;

    fn body_at(pos: DVec2, mass: f64) -> Body {
        let mut body = Body::new(Polygon::rectangle(1.0, 1.0), mass, Rgb::WHITE);
        body.set_centroid(pos);
        body
    }

    const DT: f64 = 1.0 / 60.0;

    #[test]
    fn test_gravity_attracts_distant_bodies() {
        let mut scene = Scene::new();
        let a = scene.add_body(body_at(DVec2::ZERO, 10.0));
        let b = scene.add_body(body_at(DVec2::new(100.0, 0.0), 10.0));
        newtonian_gravity(&mut scene, 50.0, a, b);

        scene.tick(DT);
        // Equal and opposite pulls along +x / -x
        let va = scene.body(a).unwrap().velocity();
        let vb = scene.body(b).unwrap().velocity();
        assert!(va.x > 0.0);
        assert!(vb.x < 0.0);
        assert!((va + vb).length() < 1e-12);
    }

    #[test]
    fn test_gravity_suppressed_inside_threshold() {
        let mut scene = Scene::new();
        let a = scene.add_body(body_at(DVec2::ZERO, 10.0));
        let b = scene.add_body(body_at(DVec2::new(GRAVITY_MIN_DISTANCE / 2.0, 0.0), 10.0));
        newtonian_gravity(&mut scene, 50.0, a, b);

        scene.tick(DT);
        assert_eq!(scene.body(a).unwrap().velocity(), DVec2::ZERO);
        assert_eq!(scene.body(b).unwrap().velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_spring_pulls_toward_displacement() {
        let mut scene = Scene::new();
        let a = scene.add_body(body_at(DVec2::ZERO, 2.0));
        let b = scene.add_body(body_at(DVec2::new(0.0, 8.0), 2.0));
        spring(&mut scene, 3.0, a, b);

        scene.tick(1.0);
        // F = k * displacement = 24 along +y on a, -y on b
        let va = scene.body(a).unwrap().velocity();
        let vb = scene.body(b).unwrap().velocity();
        assert!((va - DVec2::new(0.0, 12.0)).length() < 1e-9);
        assert!((vb + DVec2::new(0.0, 12.0)).length() < 1e-9);
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let mut scene = Scene::new();
        let a = scene.add_body(body_at(DVec2::ZERO, 1.0));
        scene.body_mut(a).unwrap().set_velocity(DVec2::new(10.0, 0.0));
        drag(&mut scene, 0.5, a);

        let before = scene.body(a).unwrap().velocity().length();
        scene.tick(DT);
        let after = scene.body(a).unwrap().velocity();
        assert!(after.length() < before);
        assert!(after.x > 0.0); // slowed, not reversed
        assert!(after.y.abs() < 1e-12);
    }

    #[test]
    fn test_elastic_bounce_off_infinite_wall_reverses_velocity() {
        let mut scene = Scene::new();
        let ball = scene.add_body(body_at(DVec2::ZERO, 5.0));
        let wall = scene.add_body(body_at(DVec2::new(0.9, 0.0), INFINITE_MASS));
        scene.body_mut(ball).unwrap().set_velocity(DVec2::new(10.0, 0.0));
        physics_collision(&mut scene, 1.0, ball, wall);

        scene.tick(DT);
        let v = scene.body(ball).unwrap().velocity();
        assert!((v.x - (-10.0)).abs() < 1e-9);
        assert!(v.y.abs() < 1e-9);
        assert_eq!(scene.body(wall).unwrap().velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_equal_masses_exchange_axis_velocity() {
        let mut scene = Scene::new();
        let a = scene.add_body(body_at(DVec2::ZERO, 4.0));
        let b = scene.add_body(body_at(DVec2::new(0.9, 0.0), 4.0));
        scene.body_mut(a).unwrap().set_velocity(DVec2::new(6.0, 0.0));
        physics_collision(&mut scene, 1.0, a, b);

        scene.tick(DT);
        let va = scene.body(a).unwrap().velocity();
        let vb = scene.body(b).unwrap().velocity();
        assert!(va.x.abs() < 1e-9);
        assert!((vb.x - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_inelastic_collision_matches_velocities() {
        let mut scene = Scene::new();
        let a = scene.add_body(body_at(DVec2::ZERO, 4.0));
        let b = scene.add_body(body_at(DVec2::new(0.9, 0.0), 4.0));
        scene.body_mut(a).unwrap().set_velocity(DVec2::new(6.0, 0.0));
        physics_collision(&mut scene, 0.0, a, b);

        scene.tick(DT);
        let va = scene.body(a).unwrap().velocity();
        let vb = scene.body(b).unwrap().velocity();
        assert!((va.x - 3.0).abs() < 1e-9);
        assert!((vb.x - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_collision_handler_is_edge_triggered() {
        let mut scene = Scene::new();
        let a = scene.add_body(body_at(DVec2::ZERO, 1.0));
        let b = scene.add_body(body_at(DVec2::new(0.5, 0.0), 1.0));
        let hits = Rc::new(Cell::new(0u32));
        let hits_in = Rc::clone(&hits);
        collision(&mut scene, a, b, move |_, _, _| {
            hits_in.set(hits_in.get() + 1);
        });

        // Overlapping for several ticks: exactly one callback.
        for _ in 0..4 {
            scene.tick(DT);
        }
        assert_eq!(hits.get(), 1);

        // Separate, then re-overlap: the binding re-arms and fires again.
        scene.body_mut(b).unwrap().set_centroid(DVec2::new(50.0, 0.0));
        scene.tick(DT);
        scene.body_mut(b).unwrap().set_centroid(DVec2::new(0.5, 0.0));
        scene.tick(DT);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_destructive_collision_removes_both() {
        let mut scene = Scene::new();
        let a = scene.add_body(body_at(DVec2::ZERO, 1.0));
        let b = scene.add_body(body_at(DVec2::new(0.5, 0.0), 1.0));
        let bystander = scene.add_body(body_at(DVec2::new(50.0, 0.0), 1.0));
        destructive_collision(&mut scene, a, b);

        scene.tick(DT);
        assert!(scene.body(a).is_none());
        assert!(scene.body(b).is_none());
        assert!(scene.body(bystander).is_some());
        assert_eq!(scene.force_count(), 0);
    }
}
