#![forbid(unsafe_code)]

//! Recursive split layout.
//!
//! One pass walks the tree from the root container down. For every container
//! it parses the visible children's specs, normalizes them (writing changed
//! specs back to the tree), solves the axis, and places children and sashes
//! with a cursor that advances by each rounded extent:
//!
//! ```text
//! bounds.x                                               bounds.right()
//! |<-- child 0 -->|sash|<------ child 1 ------>|sash|<- child 2 ->|
//!                 ^ SashRecord { left: 0, right: 1 }
//! ```
//!
//! The root container never receives bounds of its own; its children share
//! the client area minus the configured margin. Everything placed during a
//! pass is kept in a [`LayoutFrame`] for hit testing and drag resolution.

use std::collections::BTreeMap;
use std::sync::Arc;

use sash_core::event::CursorShape;
use sash_core::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

use crate::config::SashLayoutConfig;
use crate::convert::{pixels_to_weight, round_pixels, solve_axis, total_weight};
use crate::debug::{LayoutDebugger, SolveRecord};
use crate::normalize::normalize;
use crate::size_spec::{SizeMode, SizeSpec};
use crate::tree::{LayoutTree, NodeId, Orientation, TreeError, WidgetId};

/// Calls the layout engine makes into the hosting widget toolkit.
pub trait LayoutHost {
    /// Move and resize a native widget.
    fn set_bounds(&mut self, widget: WidgetId, bounds: Rect);

    /// Change the pointer cursor over the host composite.
    fn set_cursor(&mut self, _cursor: CursorShape) {}

    /// Ask the host to repaint (sashes included).
    fn request_redraw(&mut self) {}
}

/// Host that ignores every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl LayoutHost for NullHost {
    fn set_bounds(&mut self, _widget: WidgetId, _bounds: Rect) {}
}

/// The divider between two adjacent visible siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SashRecord {
    pub rect: Rect,
    pub container: NodeId,
    pub left: NodeId,
    pub right: NodeId,
    /// Orientation of the owning container.
    pub orientation: Orientation,
}

impl SashRecord {
    /// Whether `point` lies within `tolerance` pixels of the sash.
    #[must_use]
    pub const fn hit(&self, point: Point, tolerance: i32) -> bool {
        self.rect.expand(tolerance).contains(point)
    }

    /// Cursor shown while hovering or dragging this sash.
    #[must_use]
    pub const fn cursor(&self) -> CursorShape {
        match self.orientation {
            Orientation::Horizontal => CursorShape::ResizeHorizontal,
            Orientation::Vertical => CursorShape::ResizeVertical,
        }
    }
}

/// Everything one layout pass placed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutFrame {
    /// Client area the pass was asked to fill.
    pub client_area: Rect,
    /// Client area minus margin; the root container's extent.
    pub bounds: Rect,
    pub sashes: Vec<SashRecord>,
    /// Rectangle of every visible non-root node.
    pub rects: BTreeMap<NodeId, Rect>,
}

/// Re-entrancy guard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutPhase {
    #[default]
    Idle,
    LayingOut,
}

/// Result of a layout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOutcome {
    Completed {
        sashes: usize,
        /// Specs the normalizer rewrote during the pass.
        write_backs: usize,
    },
    /// A pass was already running, or there were no bounds to relayout with.
    Skipped,
}

impl LayoutOutcome {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Weighted split layout engine.
#[derive(Debug, Default)]
pub struct SashLayout {
    config: SashLayoutConfig,
    phase: LayoutPhase,
    frame: LayoutFrame,
    last_client_area: Option<Rect>,
    last_revision: Option<u64>,
    debugger: Option<Arc<LayoutDebugger>>,
}

impl SashLayout {
    #[must_use]
    pub fn new(config: SashLayoutConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Attach a solve recorder.
    #[must_use]
    pub fn with_debugger(mut self, debugger: Arc<LayoutDebugger>) -> Self {
        self.debugger = Some(debugger);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &SashLayoutConfig {
        &self.config
    }

    #[must_use]
    pub const fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// What the last completed pass placed.
    #[must_use]
    pub const fn frame(&self) -> &LayoutFrame {
        &self.frame
    }

    #[must_use]
    pub fn sashes(&self) -> &[SashRecord] {
        &self.frame.sashes
    }

    /// Rectangle the last pass gave `node`.
    #[must_use]
    pub fn rect_of(&self, node: NodeId) -> Option<Rect> {
        self.frame.rects.get(&node).copied()
    }

    /// Rectangle of a container, the root included.
    pub(crate) fn container_rect(&self, tree: &LayoutTree, container: NodeId) -> Option<Rect> {
        if container == tree.root() {
            self.last_client_area.map(|_| self.frame.bounds)
        } else {
            self.rect_of(container)
        }
    }

    /// Rectangle of `node` if it is still present, shown and mapped.
    ///
    /// A leaf without a widget has nothing on screen and resolves to `None`.
    #[must_use]
    pub fn resolve_rect(&self, tree: &LayoutTree, node: NodeId) -> Option<Rect> {
        let entry = tree.node(node)?;
        if !entry.is_shown() || (!entry.is_container() && entry.widget.is_none()) {
            return None;
        }
        self.rect_of(node)
    }

    /// Every sash within hit tolerance of `point`.
    #[must_use]
    pub fn sash_hits(&self, point: Point) -> Vec<SashRecord> {
        let tolerance = self.config.hit_tolerance;
        let mut hits: Vec<SashRecord> = Vec::new();
        for sash in self.frame.sashes.iter().filter(|s| s.hit(point, tolerance)) {
            if !hits
                .iter()
                .any(|h| h.left == sash.left && h.right == sash.right)
            {
                hits.push(*sash);
            }
        }
        hits
    }

    /// The first sash within hit tolerance of `point`.
    #[must_use]
    pub fn sash_at(&self, point: Point) -> Option<&SashRecord> {
        let tolerance = self.config.hit_tolerance;
        self.frame.sashes.iter().find(|s| s.hit(point, tolerance))
    }

    /// Whether the tree changed since the last pass.
    #[must_use]
    pub fn needs_layout(&self, tree: &LayoutTree) -> bool {
        self.last_revision != Some(tree.revision())
    }

    /// Lay out the whole tree inside `client_area`.
    pub fn layout(
        &mut self,
        tree: &mut LayoutTree,
        host: &mut impl LayoutHost,
        client_area: Rect,
    ) -> LayoutOutcome {
        if self.phase == LayoutPhase::LayingOut {
            tracing::debug!("layout requested while a pass is running; skipped");
            return LayoutOutcome::Skipped;
        }
        self.phase = LayoutPhase::LayingOut;

        let root = tree.root();
        let span = tracing::debug_span!(
            "sash.layout",
            root = %root,
            width = client_area.width,
            height = client_area.height,
        );
        let _guard = span.enter();

        let bounds = client_area.inner(self.config.margin);
        let mut pass = Pass {
            frame: LayoutFrame {
                client_area,
                bounds,
                ..LayoutFrame::default()
            },
            write_backs: 0,
        };
        self.layout_container(tree, host, root, bounds, &mut pass);

        let outcome = LayoutOutcome::Completed {
            sashes: pass.frame.sashes.len(),
            write_backs: pass.write_backs,
        };
        self.frame = pass.frame;
        self.last_client_area = Some(client_area);
        self.last_revision = Some(tree.revision());
        self.phase = LayoutPhase::Idle;
        tracing::debug!(?outcome, "layout pass complete");
        outcome
    }

    /// Repeat the last pass with the same client area.
    pub fn relayout(&mut self, tree: &mut LayoutTree, host: &mut impl LayoutHost) -> LayoutOutcome {
        match self.last_client_area {
            Some(client_area) => self.layout(tree, host, client_area),
            None => LayoutOutcome::Skipped,
        }
    }

    fn layout_container(
        &self,
        tree: &mut LayoutTree,
        host: &mut impl LayoutHost,
        container: NodeId,
        bounds: Rect,
        pass: &mut Pass,
    ) {
        let Some(orientation) = tree.orientation(container) else {
            return;
        };
        let children = tree.visible_children(container);
        if children.is_empty() {
            return;
        }

        let encoding = self.config.encoding;
        let sash_width = self.config.sash_width;
        let axis_extent = axis_len(bounds, orientation);

        let mut specs: Vec<SizeSpec> = children
            .iter()
            .map(|&child| SizeSpec::parse(encoding, tree.container_data(child).unwrap_or("")))
            .collect();
        let report = normalize(
            &mut specs,
            encoding,
            f64::from(axis_extent),
            f64::from(sash_width),
        );
        for index in report.changed() {
            let data = specs[index].serialize(encoding);
            tracing::debug!(
                container = %container,
                child = %children[index],
                data = %data,
                "normalized size spec"
            );
            if tree.set_container_data(children[index], data).is_ok() {
                pass.write_backs += 1;
            }
        }

        let solution = solve_axis(&specs, f64::from(axis_extent), f64::from(sash_width));

        let mut cursor = axis_start(bounds, orientation);
        let mut sizes = Vec::with_capacity(children.len());
        let mut rects = Vec::with_capacity(children.len());
        for (index, (&child, &nominal)) in children.iter().zip(&solution.sizes).enumerate() {
            if index > 0 {
                pass.frame.sashes.push(SashRecord {
                    rect: axis_rect(bounds, orientation, cursor, sash_width),
                    container,
                    left: children[index - 1],
                    right: child,
                    orientation,
                });
                cursor = cursor.saturating_add(sash_width);
            }
            let size = round_pixels(nominal.clamp(0.0, f64::from(axis_extent)));
            rects.push(axis_rect(bounds, orientation, cursor, size));
            sizes.push(size);
            cursor = cursor.saturating_add(size);
        }

        tracing::trace!(
            container = %container,
            children = children.len(),
            total_weight = solution.total_weight,
            available = solution.available_relative,
            ?sizes,
            "solved container"
        );
        if let Some(debugger) = self.debugger.as_ref().filter(|d| d.enabled()) {
            debugger.record(SolveRecord {
                container,
                orientation,
                bounds,
                sash_width,
                total_weight: solution.total_weight,
                available_relative: solution.available_relative,
                children: children.clone(),
                specs: specs.clone(),
                sizes: sizes.clone(),
                rects: rects.clone(),
            });
        }

        for (&child, &rect) in children.iter().zip(&rects) {
            pass.frame.rects.insert(child, rect);
            if let Some(widget) = tree.widget(child) {
                host.set_bounds(widget, rect);
            }
            if tree.orientation(child).is_some() {
                self.layout_container(tree, host, child, rect, pass);
            }
        }
    }

    /// Switch a child between weighted and fixed sizing, keeping its
    /// current pixel extent.
    ///
    /// Returns `Ok(false)` when the child is already in `mode`. The tree is
    /// updated but not relaid out.
    pub fn convert_mode(
        &self,
        tree: &mut LayoutTree,
        node: NodeId,
        mode: SizeMode,
    ) -> Result<bool, TreeError> {
        if tree.node(node).is_none() {
            return Err(TreeError::MissingNode { node });
        }
        let container = tree.parent(node).ok_or(TreeError::NotLaidOut { node })?;
        let orientation = tree
            .orientation(container)
            .ok_or(TreeError::NotAContainer { node: container })?;
        let bounds = self
            .container_rect(tree, container)
            .ok_or(TreeError::NotLaidOut { node })?;
        let children = tree.visible_children(container);
        let index = children
            .iter()
            .position(|&child| child == node)
            .ok_or(TreeError::NotLaidOut { node })?;

        let encoding = self.config.encoding;
        let specs: Vec<SizeSpec> = children
            .iter()
            .map(|&child| SizeSpec::parse(encoding, tree.container_data(child).unwrap_or("")))
            .collect();
        let mut spec = specs[index];
        let target_absolute = mode == SizeMode::Fixed;
        if spec.mode == mode && spec.is_absolute() == target_absolute {
            return Ok(false);
        }

        let axis_extent = f64::from(axis_len(bounds, orientation));
        let solution = solve_axis(&specs, axis_extent, f64::from(self.config.sash_width));
        let pixels = solution.sizes[index];

        spec.mode = mode;
        if target_absolute {
            spec.default_value = pixels;
            spec.default_is_absolute = true;
        } else {
            let mut others = specs.clone();
            others.remove(index);
            let weight = pixels_to_weight(pixels, total_weight(&others), solution.available_relative);
            spec.default_value = if weight > 0.0 {
                weight
            } else {
                encoding.normalized_weight()
            };
            spec.default_is_absolute = false;
        }

        let data = spec.serialize(encoding);
        tracing::debug!(node = %node, ?mode, data = %data, "converted size mode");
        tree.set_container_data(node, data)?;
        Ok(true)
    }
}

struct Pass {
    frame: LayoutFrame,
    write_backs: usize,
}

pub(crate) const fn axis_len(rect: Rect, orientation: Orientation) -> i32 {
    match orientation {
        Orientation::Horizontal => rect.width,
        Orientation::Vertical => rect.height,
    }
}

pub(crate) const fn axis_start(rect: Rect, orientation: Orientation) -> i32 {
    match orientation {
        Orientation::Horizontal => rect.x,
        Orientation::Vertical => rect.y,
    }
}

pub(crate) const fn axis_end(rect: Rect, orientation: Orientation) -> i32 {
    match orientation {
        Orientation::Horizontal => rect.right(),
        Orientation::Vertical => rect.bottom(),
    }
}

const fn axis_rect(bounds: Rect, orientation: Orientation, start: i32, extent: i32) -> Rect {
    match orientation {
        Orientation::Horizontal => Rect::new(start, bounds.y, extent, bounds.height),
        Orientation::Vertical => Rect::new(bounds.x, start, bounds.width, extent),
    }
}
