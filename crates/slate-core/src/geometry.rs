//! Geometry shared between the table model and its visual node

use serde::{Deserialize, Serialize};

/// A point in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether either axis differs from `other` by more than `tolerance`
    pub fn drifted_from(&self, other: &Position, tolerance: f64) -> bool {
        (self.x - other.x).abs() > tolerance || (self.y - other.y).abs() > tolerance
    }
}

/// A pair of scale factors as reported by a visual node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scale {
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Scale {
    /// The identity scale
    pub const IDENTITY: Scale = Scale {
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub fn new(scale_x: f64, scale_y: f64) -> Self {
        Self { scale_x, scale_y }
    }

    /// Collapse both axes to their shared minimum magnitude, keeping each sign
    pub fn uniform(self) -> Self {
        let magnitude = self.scale_x.abs().min(self.scale_y.abs());
        Self {
            scale_x: magnitude.copysign(self.scale_x),
            scale_y: magnitude.copysign(self.scale_y),
        }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// An axis-aligned box proposed or adopted by an interactive resize
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Attributes applied to a visual node when a resize gesture is committed
///
/// The node's accumulated scale is folded into concrete pixel dimensions, so
/// the next gesture starts again from a scale of 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetAttrs {
    pub scale_x: f64,
    pub scale_y: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

impl ResetAttrs {
    /// Reset attributes for a node at `position` with the given size
    pub fn new(position: Position, width: f64, height: f64) -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
            width,
            height,
            x: position.x,
            y: position.y,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}
