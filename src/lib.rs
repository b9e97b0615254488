//! thud: collision detection for convex 2D shapes (GJK distance, SAT
//! contact generation, swept time of impact; no resolution)

pub mod collide;
pub mod distance;
pub mod shape;
pub mod toi;
pub mod types;

pub use crate::collide::collide;
pub use crate::distance::{distance, Simplex, SimplexCache};
pub use crate::shape::{Circle, Polygon, Shape, Support};
pub use crate::toi::time_of_impact;
pub use crate::types::*;
