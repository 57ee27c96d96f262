use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Width of every block footprint, in canvas units.
pub const BLOCK_WIDTH: f64 = 320.0;
/// Height of every block footprint, in canvas units.
pub const BLOCK_HEIGHT: f64 = 96.0;
/// Vertical distance between consecutive slots of an agent's tool chain.
pub const TOOL_CHAIN_SPACING: f64 = 150.0;
/// Horizontal distance between an agent and a downstream agent.
pub const AGENT_SPACING: f64 = 400.0;
/// Blocks closer than this horizontally share a column in the linear order.
pub const COLUMN_TOLERANCE: f64 = 50.0;

/// A point in canvas coordinates. Block positions are top-left anchored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The same point pulled back onto the visible canvas (no negative offsets).
    pub fn clamped(self) -> Self {
        Self::new(self.x.max(0.0), self.y.max(0.0))
    }

    /// Top-left corner of a block whose centre sits on this point.
    pub fn centered_block_origin(self) -> Self {
        Self::new(self.x - BLOCK_WIDTH / 2.0, self.y - BLOCK_HEIGHT / 2.0)
    }

    /// Centre of a block whose top-left corner is this point.
    pub fn block_center(self) -> Self {
        Self::new(self.x + BLOCK_WIDTH / 2.0, self.y + BLOCK_HEIGHT / 2.0)
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A straight connector line between two points, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Position,
    pub to: Position,
}
