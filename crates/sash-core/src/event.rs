#![forbid(unsafe_code)]

//! Pointer events and cursor shapes exchanged with the host composite.
//!
//! # Design Notes
//!
//! - Coordinates are host pixels relative to the composite's client area.
//! - The layout engine never reads the keyboard; only pointer input drives it.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A pointer event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// Position in composite pixels.
    pub position: Point,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            position: Point::new(x, y),
        }
    }

    /// Primary button press at `(x, y)`.
    #[must_use]
    pub const fn down(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Down(PointerButton::Primary), x, y)
    }

    /// Primary button release at `(x, y)`.
    #[must_use]
    pub const fn up(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Up(PointerButton::Primary), x, y)
    }

    /// Motion with the primary button held.
    #[must_use]
    pub const fn drag(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Drag(PointerButton::Primary), x, y)
    }

    /// Motion with no button held.
    #[must_use]
    pub const fn moved(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Moved, x, y)
    }

    /// Whether this event moves the pointer (with or without a button held).
    #[must_use]
    pub const fn is_motion(&self) -> bool {
        matches!(self.kind, PointerEventKind::Drag(_) | PointerEventKind::Moved)
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),

    /// Button released.
    Up(PointerButton),

    /// Pointer moved while a button is held.
    Drag(PointerButton),

    /// Pointer moved with no button held.
    Moved,
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary (usually left) button.
    Primary,

    /// Secondary (usually right) button.
    Secondary,

    /// Middle button.
    Middle,
}

/// Pointer shape requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorShape {
    /// Whatever the host normally shows.
    #[default]
    Default,
    /// West/east resize arrows (over a sash between left/right siblings).
    ResizeHorizontal,
    /// North/south resize arrows (over a sash between top/bottom siblings).
    ResizeVertical,
    /// Four-way arrows (over the crossing of two sashes).
    ResizeBoth,
}
