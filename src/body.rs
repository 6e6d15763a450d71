//! Simulation bodies and their kinematics integration
//!
//! A body is translation-only: forces and impulses accumulate over a tick and
//! are folded into velocity/position by [`Body::tick`]. Orientation exists so
//! drivers can spin shapes visually, but there is no angular dynamics.

use std::any::Any;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::Polygon;

/// Mass sentinel for immovable bodies (walls, anchors). An infinite-mass
/// body never gains velocity from forces or impulses.
pub const INFINITE_MASS: f64 = f64::INFINITY;

/// Presentation-only RGB color, components in `[0, 1]`. No physics role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Uniformly scale brightness (for damage tinting and the like).
    pub fn scaled(self, factor: f32) -> Self {
        Rgb::new(self.r * factor, self.g * factor, self.b * factor)
    }
}

/// A rigid body: one world-space polygon plus kinematic state.
///
/// The cached centroid stays consistent with the polygon under every
/// mutation. Construction is the only place mass is set; it must be strictly
/// positive or [`INFINITE_MASS`].
pub struct Body {
    shape: Polygon,
    centroid: DVec2,
    mass: f64,
    color: Rgb,
    orientation: f64,
    velocity: DVec2,
    force: DVec2,
    impulse: DVec2,
    data: Option<Box<dyn Any>>,
    removed: bool,
}

impl Body {
    /// Create a body from a world-space shape.
    ///
    /// Panics if `mass` is not strictly positive (infinity is allowed).
    pub fn new(shape: Polygon, mass: f64, color: Rgb) -> Self {
        assert!(mass > 0.0, "body mass must be strictly positive");
        let centroid = shape.centroid();
        Self {
            shape,
            centroid,
            mass,
            color,
            orientation: 0.0,
            velocity: DVec2::ZERO,
            force: DVec2::ZERO,
            impulse: DVec2::ZERO,
            data: None,
            removed: false,
        }
    }

    /// Create a body carrying driver-defined data (body kind, health, ...).
    /// The engine never inspects it; retrieve it with [`Body::data`].
    pub fn with_data(shape: Polygon, mass: f64, color: Rgb, data: impl Any) -> Self {
        let mut body = Self::new(shape, mass, color);
        body.data = Some(Box::new(data));
        body
    }

    #[inline]
    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    #[inline]
    pub fn centroid(&self) -> DVec2 {
        self.centroid
    }

    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.velocity
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn color(&self) -> Rgb {
        self.color
    }

    #[inline]
    pub fn orientation(&self) -> f64 {
        self.orientation
    }

    /// Driver data downcast to its concrete type, if present and matching.
    pub fn data<T: Any>(&self) -> Option<&T> {
        self.data.as_deref().and_then(|d| d.downcast_ref())
    }

    pub fn data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data.as_deref_mut().and_then(|d| d.downcast_mut())
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Move the body so its centroid sits at `target`, translating the shape
    /// by the same delta.
    pub fn set_centroid(&mut self, target: DVec2) {
        let delta = target - self.centroid;
        self.shape.translate(delta);
        self.centroid = target;
    }

    pub fn set_velocity(&mut self, velocity: DVec2) {
        debug_assert!(!self.removed, "mutating a removed body");
        self.velocity = velocity;
    }

    /// Set the absolute orientation, rotating the shape about `pivot` by the
    /// delta from the current orientation.
    pub fn set_rotation(&mut self, angle: f64, pivot: DVec2) {
        let delta = angle - self.orientation;
        self.orientation = angle;
        self.shape.rotate(delta, pivot);
        if pivot != self.centroid {
            self.centroid = crate::geometry::rotate(self.centroid - pivot, delta) + pivot;
        }
    }

    /// Accumulate a force for this tick.
    pub fn add_force(&mut self, force: DVec2) {
        debug_assert!(!self.removed, "mutating a removed body");
        self.force += force;
    }

    /// Accumulate an impulse for this tick.
    pub fn add_impulse(&mut self, impulse: DVec2) {
        debug_assert!(!self.removed, "mutating a removed body");
        self.impulse += impulse;
    }

    /// Mark the body for removal. It stays inert in the scene until the end
    /// of the next tick, when the scene prunes it.
    pub fn remove(&mut self) {
        self.removed = true;
    }

    #[inline]
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Advance kinematics by `dt` seconds and reset the accumulators.
    ///
    /// Semi-implicit: velocity absorbs force and impulse first, then the
    /// centroid moves by the average of the old and new velocities
    /// (trapezoidal - noticeably more accurate than forward Euler here).
    pub fn tick(&mut self, dt: f64) {
        let v_old = self.velocity;
        // Infinite mass absorbs nothing; skipping the division also keeps
        // 0/inf out of the velocity entirely.
        if self.mass.is_finite() {
            let accel = self.force / self.mass;
            self.velocity += accel * dt;
            self.velocity += self.impulse / self.mass;
        }
        let displacement = (v_old + self.velocity) / 2.0 * dt;
        self.set_centroid(self.centroid + displacement);
        self.force = DVec2::ZERO;
        self.impulse = DVec2::ZERO;
    }
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body")
            .field("centroid", &self.centroid)
            .field("mass", &self.mass)
            .field("velocity", &self.velocity)
            .field("removed", &self.removed)
            .finish_non_exhaustive()
    }
}
