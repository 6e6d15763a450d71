//! Polyarena - a minimal 2D rigid-body physics core
//!
//! Core modules:
//! - `geometry`: 2D vector helpers and polygon geometry (pure, no state)
//! - `collision`: separating-axis polygon overlap detection
//! - `body`: simulation entities with semi-implicit integration
//! - `forces`: per-tick force creators bound to specific bodies
//! - `scene`: body/force ownership and the per-tick state machine
//!
//! The engine is single-threaded and synchronous: all mutation happens inside
//! one `Scene::tick` call. Bodies are removed lazily (flag now, prune at the
//! end of the tick) so force creators never observe a dangling body.

pub mod body;
pub mod collision;
pub mod forces;
pub mod geometry;
pub mod scene;

pub use body::{Body, Rgb};
pub use collision::{CollisionInfo, find_collision};
pub use geometry::{Polygon, rotate};
pub use scene::{BodyId, Scene};
