//! Scene orchestration: body/force ownership and the per-tick state machine
//!
//! The scene owns every body and every force binding. Bindings hold
//! [`BodyId`] handles rather than references, and bodies are removed lazily:
//! `remove_body` only flags the body, and the flag is honored in a fixed
//! order inside [`Scene::tick`]:
//!
//! 1. apply every binding whose bound bodies are all live,
//! 2. drop bindings that reference a removed body,
//! 3. drop removed bodies and integrate the survivors.
//!
//! Forces see pre-removal state for up to one more tick (collision
//! edge-detection and mutual destruction need consistent data), and nothing
//! is integrated that is about to disappear.

use log::debug;

use crate::body::Body;

/// Stable handle to a body in a [`Scene`], minted by [`Scene::add_body`].
///
/// Handles are never reused within a scene, so a stale handle simply stops
/// resolving once its body has been pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(u32);

/// A per-tick force computation. Receives mutable access to the bodies it
/// was registered against, in registration order; any other state it needs
/// (constants, latched contact state) lives in its captures.
pub type ForceFn = Box<dyn FnMut(&mut [&mut Body])>;

struct Entry {
    id: BodyId,
    body: Body,
}

struct ForceBinding {
    bodies: Vec<BodyId>,
    forcer: ForceFn,
}

/// Owns the ordered body collection and the force-binding list.
#[derive(Default)]
pub struct Scene {
    /// Insertion-ordered; ids are minted monotonically, so this stays sorted
    /// by id and handle lookups are binary searches.
    bodies: Vec<Entry>,
    forces: Vec<ForceBinding>,
    next_id: u32,
}

fn index_of(bodies: &[Entry], id: BodyId) -> Option<usize> {
    bodies.binary_search_by_key(&id, |e| e.id).ok()
}

fn is_live(bodies: &[Entry], id: BodyId) -> bool {
    index_of(bodies, id).is_some_and(|i| !bodies[i].body.is_removed())
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `body` and return its handle.
    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Entry { id, body });
        id
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        index_of(&self.bodies, id).map(|i| &self.bodies[i].body)
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        index_of(&self.bodies, id).map(|i| &mut self.bodies[i].body)
    }

    /// Bodies in insertion order (removed-but-unpruned ones included).
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> {
        self.bodies.iter().map(|e| (e.id, &e.body))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of registered force bindings.
    pub fn force_count(&self) -> usize {
        self.forces.len()
    }

    /// Flag a body for removal. It stays inert until the end of the next
    /// tick, when it and every binding referencing it are pruned.
    ///
    /// Panics if `id` does not resolve.
    pub fn remove_body(&mut self, id: BodyId) {
        self.body_mut(id)
            .unwrap_or_else(|| panic!("remove_body: no body for {id:?}"))
            .remove();
    }

    /// Register a force creator bound to zero, one, or two bodies.
    ///
    /// A zero-body creator fires every tick unconditionally. Panics if more
    /// than two bodies are given, if the two are not distinct, or if any
    /// handle does not resolve.
    pub fn add_force(
        &mut self,
        bodies: Vec<BodyId>,
        forcer: impl FnMut(&mut [&mut Body]) + 'static,
    ) {
        assert!(bodies.len() <= 2, "force creators bind at most two bodies");
        if let [a, b] = bodies[..] {
            assert_ne!(a, b, "force creator bound to the same body twice");
        }
        for &id in &bodies {
            assert!(
                index_of(&self.bodies, id).is_some(),
                "add_force: no body for {id:?}"
            );
        }
        self.forces.push(ForceBinding {
            bodies,
            forcer: Box::new(forcer),
        });
    }

    /// Advance the simulation by `dt` seconds.
    pub fn tick(&mut self, dt: f64) {
        let Self { bodies, forces, .. } = self;

        // Apply phase: a binding fires exactly once, and only if every bound
        // body is still live.
        for binding in forces.iter_mut() {
            if !binding.bodies.iter().all(|&id| is_live(bodies, id)) {
                continue;
            }
            match binding.bodies[..] {
                [] => (binding.forcer)(&mut []),
                [a] => {
                    let i = index_of(bodies, a).unwrap();
                    (binding.forcer)(&mut [&mut bodies[i].body]);
                }
                [a, b] => {
                    let i = index_of(bodies, a).unwrap();
                    let j = index_of(bodies, b).unwrap();
                    let [ea, eb] = bodies
                        .get_disjoint_mut([i, j])
                        .expect("bound bodies are distinct");
                    (binding.forcer)(&mut [&mut ea.body, &mut eb.body]);
                }
                _ => unreachable!("arity checked at registration"),
            }
        }

        // Prune bindings that reference a removed body.
        let forces_before = forces.len();
        forces.retain(|binding| binding.bodies.iter().all(|&id| is_live(bodies, id)));

        // Prune removed bodies and integrate the survivors, preserving order.
        let bodies_before = bodies.len();
        bodies.retain_mut(|entry| {
            if entry.body.is_removed() {
                false
            } else {
                entry.body.tick(dt);
                true
            }
        });

        let pruned_bodies = bodies_before - bodies.len();
        let pruned_forces = forces_before - forces.len();
        if pruned_bodies > 0 || pruned_forces > 0 {
            debug!("pruned {pruned_bodies} bodies, {pruned_forces} force bindings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Rgb;
    use crate::geometry::Polygon;
    use glam::DVec2;
    use std::cell::Cell;
    use std::rc::Rc;

    fn square_body(x: f64, y: f64) -> Body {
        let mut body = Body::new(Polygon::rectangle(1.0, 1.0), 2.0, Rgb::WHITE);
        body.set_centroid(DVec2::new(x, y));
        body
    }

    #[test]
    fn test_handles_resolve_by_identity_not_position() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0, 0.0));
        let b = scene.add_body(square_body(5.0, 0.0));
        let c = scene.add_body(square_body(10.0, 0.0));

        scene.remove_body(b);
        scene.tick(0.0);

        assert!(scene.body(b).is_none());
        assert!((scene.body(a).unwrap().centroid() - DVec2::new(0.0, 0.0)).length() < 1e-12);
        assert!((scene.body(c).unwrap().centroid() - DVec2::new(10.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_survivors_keep_insertion_order() {
        let mut scene = Scene::new();
        let ids: Vec<_> = (0..5)
            .map(|i| scene.add_body(square_body(i as f64, 0.0)))
            .collect();
        scene.remove_body(ids[1]);
        scene.remove_body(ids[3]);
        scene.tick(0.0);

        let remaining: Vec<_> = scene.bodies().map(|(id, _)| id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2], ids[4]]);
    }

    #[test]
    fn test_removed_body_and_its_bindings_are_pruned() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0, 0.0));
        let b = scene.add_body(square_body(5.0, 0.0));
        scene.add_force(vec![a, b], |_| {});
        scene.add_force(vec![a], |_| {});
        scene.add_force(vec![], |_| {});
        assert_eq!(scene.force_count(), 3);

        scene.remove_body(a);
        scene.tick(1.0 / 60.0);

        assert!(scene.body(a).is_none());
        assert_eq!(scene.len(), 1);
        // Only the zero-body binding survives.
        assert_eq!(scene.force_count(), 1);
    }

    #[test]
    fn test_binding_with_removed_body_is_not_invoked() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0, 0.0));
        let fired = Rc::new(Cell::new(0u32));
        let fired_in = Rc::clone(&fired);
        scene.add_force(vec![a], move |_| fired_in.set(fired_in.get() + 1));

        scene.tick(0.0);
        assert_eq!(fired.get(), 1);

        scene.remove_body(a);
        scene.tick(0.0); // flagged before apply phase: stays inert
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_zero_body_force_always_fires() {
        let mut scene = Scene::new();
        let fired = Rc::new(Cell::new(0u32));
        let fired_in = Rc::clone(&fired);
        scene.add_force(vec![], move |_| fired_in.set(fired_in.get() + 1));

        for _ in 0..3 {
            scene.tick(0.0);
        }
        assert_eq!(fired.get(), 3);
    }

    #[test]
    fn test_forces_apply_before_integration() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0, 0.0));
        scene.add_force(vec![a], |bodies| {
            bodies[0].add_force(DVec2::new(4.0, 0.0)); // accel = 2 at mass 2
        });

        scene.tick(1.0);
        let body = scene.body(a).unwrap();
        // Force landed this tick: v = 2, trapezoidal displacement = 1.
        assert!((body.velocity() - DVec2::new(2.0, 0.0)).length() < 1e-12);
        assert!((body.centroid() - DVec2::new(1.0, 0.0)).length() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_add_force_rejects_duplicate_body() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0, 0.0));
        scene.add_force(vec![a, a], |_| {});
    }

    #[test]
    #[should_panic]
    fn test_remove_unknown_body_panics() {
        let mut scene = Scene::new();
        let a = scene.add_body(square_body(0.0, 0.0));
        scene.remove_body(a);
        scene.tick(0.0);
        scene.remove_body(a); // already pruned
    }
}
