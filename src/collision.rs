//! Separating-axis collision detection for convex polygons
//!
//! Two convex shapes are disjoint iff some axis exists onto which their
//! projections do not overlap; the candidate axes are the edge normals of
//! both shapes. When no separating axis exists, the returned collision axis
//! is the edge normal with the smallest projection overlap (the minimum
//! translation direction), which is what impulse resolution wants.

use glam::DVec2;

use crate::geometry::Polygon;

/// Result of a polygon-polygon overlap test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    /// Whether the shapes overlap.
    pub collided: bool,
    /// Unit collision normal (minimum-overlap edge normal). Zero when
    /// `collided` is false.
    pub axis: DVec2,
}

impl CollisionInfo {
    fn separated() -> Self {
        Self {
            collided: false,
            axis: DVec2::ZERO,
        }
    }
}

/// Projection interval (min, max) of a shape onto a unit axis.
fn project(axis: DVec2, shape: &Polygon) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in shape.vertices() {
        let p = v.dot(axis);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

/// Outward unit perpendicular of an edge vector.
fn edge_normal(edge: DVec2) -> DVec2 {
    DVec2::new(edge.y, -edge.x).normalize()
}

/// Overlap of the two shapes' projections onto `axis`, or `None` when a
/// positive gap separates them. Exact boundary touching yields `Some(0.0)`
/// and counts as overlap.
fn axis_overlap(axis: DVec2, a: &Polygon, b: &Polygon) -> Option<f64> {
    let (min_a, max_a) = project(axis, a);
    let (min_b, max_b) = project(axis, b);
    let overlap = max_a.min(max_b) - min_a.max(min_b);
    (overlap >= 0.0).then_some(overlap)
}

/// Test every edge normal of `a` against both shapes. Returns the
/// minimum-overlap axis, or `None` as soon as a separating axis is found.
fn min_overlap_axis(a: &Polygon, b: &Polygon) -> Option<(f64, DVec2)> {
    let mut best: Option<(f64, DVec2)> = None;
    for (v1, v2) in a.edges() {
        let axis = edge_normal(v2 - v1);
        let overlap = axis_overlap(axis, a, b)?;
        if best.is_none_or(|(o, _)| overlap < o) {
            best = Some((overlap, axis));
        }
    }
    best
}

/// SAT overlap test between two convex polygons.
///
/// Both shapes' edge normals are tested; non-parallel polygons need both
/// sets for a complete separating-axis sweep. O(edges_a * edges_b).
pub fn find_collision(a: &Polygon, b: &Polygon) -> CollisionInfo {
    let Some((overlap_a, axis_a)) = min_overlap_axis(a, b) else {
        return CollisionInfo::separated();
    };
    let Some((overlap_b, axis_b)) = min_overlap_axis(b, a) else {
        return CollisionInfo::separated();
    };
    let axis = if overlap_a <= overlap_b { axis_a } else { axis_b };
    CollisionInfo {
        collided: true,
        axis,
    }
}
