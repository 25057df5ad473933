#![forbid(unsafe_code)]

//! Sash Layout
//!
//! Weighted split-container layout with draggable sashes.
//!
//! # Key Components
//!
//! - [`SizeSpec`] - Per-child size string codec (extended and mode-tagged encodings)
//! - [`convert`] - Weight/pixel conversion and the per-axis solver
//! - [`LayoutTree`] - Arena of split containers and leaves
//! - [`normalize()`] - Keeps every container sizable before a pass
//! - [`SashLayout`] - Recursive layout producing rectangles and [`SashRecord`]s
//! - [`SashDragController`] - Pointer-driven sash resizing
//! - [`LayoutDebugger`] - Opt-in per-container solve records
//!
//! # How it fits together
//! The host owns a [`LayoutTree`] whose nodes persist their size as a string.
//! [`SashLayout::layout`] parses those strings, solves each container, and
//! reports widget bounds through [`LayoutHost`]. The drag controller mutates
//! the strings of the two siblings around a sash and asks for a relayout.

pub mod config;
pub mod convert;
pub mod debug;
pub mod drag;
pub mod layout;
pub mod normalize;
pub mod size_spec;
pub mod tree;

pub use config::{ConfigError, SashLayoutConfig};
pub use debug::{LayoutDebugger, SolveRecord};
pub use drag::{AdjustSkip, DragEffect, DragNoopReason, DragSession, DragState, SashDragController};
pub use layout::{
    LayoutFrame, LayoutHost, LayoutOutcome, LayoutPhase, NullHost, SashLayout, SashRecord,
};
pub use normalize::{NormalizeReport, normalize};
pub use sash_core::event::{CursorShape, PointerButton, PointerEvent, PointerEventKind};
pub use sash_core::geometry::{Point, Rect, Sides};
pub use size_spec::{Bound, SizeMode, SizeSpec, SpecEncoding};
pub use tree::{LayoutNode, LayoutTree, NodeId, NodeKind, Orientation, TreeError, WidgetId};
