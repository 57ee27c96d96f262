//! The workflow canvas graph model.
//!
//! [`CanvasModel`] owns every placed [`BlockInstance`] and every typed
//! [`Connection`], and derives layout from them: tool chains stacked below
//! their agent, downstream agents to the right, and a left-to-right reading
//! order used for the progress line.

mod block;
mod geometry;
mod layout;
mod model;
mod traversal;

pub use block::*;
pub use geometry::*;
pub use layout::CanvasSnapshot;
pub use model::{CanvasModel, Clock, SystemClock};
