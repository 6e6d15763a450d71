//! 2D vector helpers and polygon geometry
//!
//! Vectors are `glam::DVec2` (f64). Everything here is a pure value
//! operation; polygons are plain vertex loops with no identity.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Rotate a vector by `angle` radians about the origin.
#[inline]
pub fn rotate(v: DVec2, angle: f64) -> DVec2 {
    DVec2::from_angle(angle).rotate(v)
}

/// An ordered vertex loop: the last vertex connects back to the first.
///
/// Winding may be either direction but must be consistent, and the loop must
/// not self-intersect. Used both as an origin-centered shape template and as
/// live world-space geometry on a [`crate::Body`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<DVec2>,
}

impl Polygon {
    /// Build a polygon from its vertex loop.
    ///
    /// Panics if fewer than 3 vertices are given.
    pub fn new(vertices: Vec<DVec2>) -> Self {
        assert!(vertices.len() >= 3, "polygon needs at least 3 vertices");
        Self { vertices }
    }

    /// Axis-aligned `width` x `height` rectangle centered at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(vec![
            DVec2::new(-hw, -hh),
            DVec2::new(hw, -hh),
            DVec2::new(hw, hh),
            DVec2::new(-hw, hh),
        ])
    }

    /// Regular `n`-gon with circumradius `radius`, centered at the origin,
    /// counter-clockwise winding.
    pub fn regular(n: usize, radius: f64) -> Self {
        assert!(n >= 3, "polygon needs at least 3 vertices");
        let vertices = (0..n)
            .map(|i| {
                let theta = std::f64::consts::TAU * i as f64 / n as f64;
                radius * DVec2::from_angle(theta)
            })
            .collect();
        Self { vertices }
    }

    #[inline]
    pub fn vertices(&self) -> &[DVec2] {
        &self.vertices
    }

    /// Iterate over the edges as (start, end) vertex pairs, wrapping around.
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Signed shoelace area: positive for counter-clockwise winding.
    fn signed_area(&self) -> f64 {
        self.edges().map(|(v1, v2)| v1.perp_dot(v2)).sum::<f64>() / 2.0
    }

    /// Enclosed area (shoelace formula, any winding).
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Geometric centroid (weighted shoelace formula).
    ///
    /// Panics on a degenerate (zero-area) polygon.
    pub fn centroid(&self) -> DVec2 {
        let area = self.signed_area();
        assert!(area != 0.0, "degenerate polygon has no centroid");
        let weighted: DVec2 = self
            .edges()
            .map(|(v1, v2)| v1.perp_dot(v2) * (v1 + v2))
            .sum();
        weighted / (6.0 * area)
    }

    /// Add `delta` to every vertex in place.
    pub fn translate(&mut self, delta: DVec2) {
        for v in &mut self.vertices {
            *v += delta;
        }
    }

    /// Rotate the polygon by `angle` radians about `pivot`.
    pub fn rotate(&mut self, angle: f64, pivot: DVec2) {
        let rotation = DVec2::from_angle(angle);
        for v in &mut self.vertices {
            *v = rotation.rotate(*v - pivot) + pivot;
        }
    }
}
