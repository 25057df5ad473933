#![forbid(unsafe_code)]

//! Interactive sash dragging.
//!
//! ```text
//! Idle --(primary down on >=1 sash)--> Dragging --(primary up)--> Idle
//!   ^                                     |
//!   +--(moved: hover cursor)              +--(drag/move: adjust every target)
//! ```
//!
//! Each pointer move re-derives the owning container's totals, maps the
//! pointer to a split point between the two siblings of every target sash,
//! clamps it (right sibling wins a conflict), writes both siblings' specs back
//! in their own unit, and relays out. A target that cannot be resolved is
//! skipped for that frame only; the session continues. There is no cancel:
//! only releasing the primary button ends a drag.

use std::fmt;

use sash_core::event::{CursorShape, PointerButton, PointerEvent, PointerEventKind};
use sash_core::geometry::Point;

use crate::convert::{available_relative_pixels, pixel_bounds, pixels_to_weight, total_weight};
use crate::layout::{LayoutHost, SashLayout, SashRecord, axis_end, axis_len, axis_start};
use crate::size_spec::SizeSpec;
use crate::tree::{LayoutTree, NodeId, Orientation};

/// An in-progress drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    /// Sashes under the press, in frame order, without duplicates.
    pub targets: Vec<SashRecord>,
    pub origin: Point,
    pub last: Point,
    /// Pointer moves handled so far.
    pub frames: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Why an event changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    NoSashUnderPointer,
    NonPrimaryButton,
    DragAlreadyInProgress,
    CursorUnchanged,
}

/// Why one target sash was left alone for one pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustSkip {
    /// A sibling is gone, hidden, unmapped, or no longer adjacent.
    StaleSibling { node: NodeId },
    /// The owning container has no rectangle from the last pass.
    MissingContainer { container: NodeId },
    /// A weighted sibling needs a weight but the container has no relative space.
    NoRelativeSpace { container: NodeId },
    /// The two siblings span no pixels.
    DegenerateSpan,
}

impl fmt::Display for AdjustSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleSibling { node } => write!(f, "sibling {node} is stale or unmapped"),
            Self::MissingContainer { container } => {
                write!(f, "container {container} was not laid out")
            }
            Self::NoRelativeSpace { container } => {
                write!(f, "container {container} has no relative space")
            }
            Self::DegenerateSpan => write!(f, "sash siblings span no pixels"),
        }
    }
}

impl std::error::Error for AdjustSkip {}

/// What one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    Started {
        targets: usize,
    },
    Adjusted {
        applied: usize,
        skipped: Vec<(SashRecord, AdjustSkip)>,
    },
    Ended {
        frames: u64,
    },
    Hover {
        cursor: CursorShape,
    },
    Noop(DragNoopReason),
}

/// Pointer-driven sash drag state machine.
#[derive(Debug, Clone, Default)]
pub struct SashDragController {
    state: DragState,
    cursor: CursorShape,
}

impl SashDragController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Cursor last requested from the host.
    #[must_use]
    pub const fn cursor(&self) -> CursorShape {
        self.cursor
    }

    /// Feed one pointer event.
    pub fn handle_event(
        &mut self,
        layout: &mut SashLayout,
        tree: &mut LayoutTree,
        host: &mut impl LayoutHost,
        event: &PointerEvent,
    ) -> DragEffect {
        let position = event.position;
        match (&mut self.state, event.kind) {
            (DragState::Idle, PointerEventKind::Down(PointerButton::Primary)) => {
                let targets = layout.sash_hits(position);
                if targets.is_empty() {
                    return DragEffect::Noop(DragNoopReason::NoSashUnderPointer);
                }
                let count = targets.len();
                let cursor = cursor_for(&targets);
                tracing::debug!(targets = count, x = position.x, y = position.y, "sash drag started");
                self.state = DragState::Dragging(DragSession {
                    targets,
                    origin: position,
                    last: position,
                    frames: 0,
                });
                self.update_cursor(host, cursor);
                DragEffect::Started { targets: count }
            }
            (DragState::Idle, PointerEventKind::Down(_)) => {
                DragEffect::Noop(DragNoopReason::NonPrimaryButton)
            }
            (DragState::Idle, PointerEventKind::Moved | PointerEventKind::Drag(_)) => {
                let cursor = cursor_for(&layout.sash_hits(position));
                if self.update_cursor(host, cursor) {
                    DragEffect::Hover { cursor }
                } else {
                    DragEffect::Noop(DragNoopReason::CursorUnchanged)
                }
            }
            (DragState::Idle, PointerEventKind::Up(_)) => {
                DragEffect::Noop(DragNoopReason::IdleWithoutActiveDrag)
            }
            (DragState::Dragging(session), PointerEventKind::Moved | PointerEventKind::Drag(_)) => {
                session.last = position;
                session.frames += 1;
                let targets = session.targets.clone();

                let mut applied = 0;
                let mut skipped = Vec::new();
                for target in targets {
                    match adjust_sash(layout, tree, &target, position) {
                        Ok(()) => applied += 1,
                        Err(reason) => {
                            match reason {
                                AdjustSkip::StaleSibling { .. } => {
                                    tracing::warn!(%reason, "skipped sash adjustment");
                                }
                                _ => tracing::debug!(%reason, "skipped sash adjustment"),
                            }
                            skipped.push((target, reason));
                        }
                    }
                }
                if applied > 0 {
                    let _ = layout.relayout(tree, host);
                    host.request_redraw();
                }
                DragEffect::Adjusted { applied, skipped }
            }
            (DragState::Dragging(session), PointerEventKind::Up(PointerButton::Primary)) => {
                let frames = session.frames;
                tracing::debug!(frames, "sash drag ended");
                self.state = DragState::Idle;
                let cursor = cursor_for(&layout.sash_hits(position));
                self.update_cursor(host, cursor);
                DragEffect::Ended { frames }
            }
            (DragState::Dragging(_), PointerEventKind::Up(_)) => {
                DragEffect::Noop(DragNoopReason::NonPrimaryButton)
            }
            (DragState::Dragging(_), PointerEventKind::Down(_)) => {
                DragEffect::Noop(DragNoopReason::DragAlreadyInProgress)
            }
        }
    }

    fn update_cursor(&mut self, host: &mut impl LayoutHost, cursor: CursorShape) -> bool {
        if self.cursor == cursor {
            return false;
        }
        self.cursor = cursor;
        host.set_cursor(cursor);
        true
    }
}

/// Cursor for a set of hit sashes; both axes when they disagree.
fn cursor_for(targets: &[SashRecord]) -> CursorShape {
    let mut shapes = targets.iter().map(SashRecord::cursor);
    let Some(first) = shapes.next() else {
        return CursorShape::Default;
    };
    if shapes.all(|shape| shape == first) {
        first
    } else {
        CursorShape::ResizeBoth
    }
}

/// Move one sash to follow `pointer`.
///
/// The pointer's position across the pair (left start to right end, sash
/// included) is the fraction of the pair's pixels the left sibling gets.
fn adjust_sash(
    layout: &SashLayout,
    tree: &mut LayoutTree,
    target: &SashRecord,
    pointer: Point,
) -> Result<(), AdjustSkip> {
    let container = target.container;
    let orientation = target.orientation;
    let left_rect = layout
        .resolve_rect(tree, target.left)
        .ok_or(AdjustSkip::StaleSibling { node: target.left })?;
    let right_rect = layout
        .resolve_rect(tree, target.right)
        .ok_or(AdjustSkip::StaleSibling { node: target.right })?;
    let bounds = layout
        .container_rect(tree, container)
        .ok_or(AdjustSkip::MissingContainer { container })?;

    let children = tree.visible_children(container);
    let left = children
        .iter()
        .position(|&child| child == target.left)
        .ok_or(AdjustSkip::StaleSibling { node: target.left })?;
    if children.get(left + 1) != Some(&target.right) {
        return Err(AdjustSkip::StaleSibling { node: target.right });
    }
    let right = left + 1;

    let start = axis_start(left_rect, orientation);
    let span = axis_end(right_rect, orientation).saturating_sub(start);
    let pair = f64::from(axis_len(left_rect, orientation)) + f64::from(axis_len(right_rect, orientation));
    if span <= 0 || pair <= 0.0 {
        return Err(AdjustSkip::DegenerateSpan);
    }

    let encoding = layout.config().encoding;
    let sash_width = f64::from(layout.config().sash_width);
    let mut specs: Vec<SizeSpec> = children
        .iter()
        .map(|&child| SizeSpec::parse(encoding, tree.container_data(child).unwrap_or("")))
        .collect();
    let total = total_weight(&specs);
    let available =
        available_relative_pixels(f64::from(axis_len(bounds, orientation)), sash_width, &specs);
    if available <= 0.0 && !(specs[left].is_absolute() && specs[right].is_absolute()) {
        return Err(AdjustSkip::NoRelativeSpace { container });
    }

    let pointer_axis = match orientation {
        Orientation::Horizontal => pointer.x,
        Orientation::Vertical => pointer.y,
    };
    let fraction =
        ((f64::from(pointer_axis) - f64::from(start)) / f64::from(span)).clamp(0.0, 1.0);
    let (new_left, new_right) = clamp_split(
        fraction * pair,
        pair,
        f64::from(layout.config().min_pane(orientation)),
        pixel_bounds(&specs[left], total, available),
        pixel_bounds(&specs[right], total, available),
    );

    for (index, pixels) in [(left, new_left), (right, new_right)] {
        let spec = &mut specs[index];
        spec.default_value = if spec.is_absolute() {
            pixels
        } else {
            pixels_to_weight(pixels, total, available)
        };
        let node = children[index];
        tree.set_container_data(node, spec.serialize(encoding))
            .map_err(|_| AdjustSkip::StaleSibling { node })?;
    }
    tracing::trace!(
        container = %container,
        left = new_left,
        right = new_right,
        "sash adjusted"
    );
    Ok(())
}

/// Split `pair` pixels at `requested` for the left sibling.
///
/// Left bounds apply first, then right bounds; when both cannot hold, the
/// right sibling's bounds win. `min_pane` raises both minimums.
fn clamp_split(
    requested: f64,
    pair: f64,
    min_pane: f64,
    (left_min, left_max): (Option<f64>, Option<f64>),
    (right_min, right_max): (Option<f64>, Option<f64>),
) -> (f64, f64) {
    let left_lo = left_min.unwrap_or(0.0).max(min_pane);
    let left_hi = left_max.unwrap_or(pair);
    let mut left = requested.min(left_hi).max(left_lo);

    let right_lo = right_min.unwrap_or(0.0).max(min_pane);
    let right_hi = right_max.unwrap_or(pair);
    let right = pair - left;
    if right < right_lo {
        left = pair - right_lo;
    } else if right > right_hi {
        left = pair - right_hi;
    }

    let left = left.clamp(0.0, pair);
    (left, pair - left)
}
