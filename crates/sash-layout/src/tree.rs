#![forbid(unsafe_code)]

//! Layout tree: split containers and leaves addressed by stable ids.
//!
//! The tree is an arena keyed by [`NodeId`]. Parents hold an ordered child
//! list (the order is sash adjacency order); children refer back to their
//! parent by id only, so there are no ownership cycles.
//!
//! ```text
//! Split(Horizontal)           root, never assigned bounds itself
//! ├── Leaf  "30"              widget 7
//! ├── Split(Vertical) "70"
//! │   ├── Leaf "fixed:120px"
//! │   └── Leaf ""
//! └── Leaf "200px" (hidden)   excluded from sizing
//! ```
//!
//! Every mutation bumps [`LayoutTree::revision`], which the layout engine
//! uses to tell whether a new pass is needed.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

/// Stable identifier for layout nodes.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Lowest valid node ID.
    pub const MIN: Self = Self(1);

    /// Create a new node ID, rejecting 0.
    pub fn new(raw: u64) -> Result<Self, TreeError> {
        if raw == 0 {
            return Err(TreeError::ZeroNodeId);
        }
        Ok(Self(raw))
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    fn checked_next(self) -> Result<Self, TreeError> {
        let Some(next) = self.0.checked_add(1) else {
            return Err(TreeError::NodeIdOverflow { current: self });
        };
        Self::new(next)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Host handle of the native widget rendering a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub u64);

/// Axis along which a container places its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Children left to right; sashes are vertical bars.
    Horizontal,
    /// Children top to bottom; sashes are horizontal bars.
    Vertical,
}

impl Orientation {
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }
}

/// Split container payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitContainer {
    pub orientation: Orientation,
    pub children: Vec<NodeId>,
}

/// Leaf vs. container payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    Leaf,
    Split(SplitContainer),
}

/// One node of the layout tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
    pub to_be_rendered: bool,
    pub visible: bool,
    /// Persisted size spec within the parent container.
    pub container_data: String,
    pub widget: Option<WidgetId>,
}

impl LayoutNode {
    fn new(id: NodeId, parent: Option<NodeId>, kind: NodeKind, container_data: String) -> Self {
        Self {
            id,
            parent,
            kind,
            to_be_rendered: true,
            visible: true,
            container_data,
            widget: None,
        }
    }

    /// Rendered and visible: takes part in sizing.
    #[must_use]
    pub const fn is_shown(&self) -> bool {
        self.to_be_rendered && self.visible
    }

    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Split(_))
    }

    #[must_use]
    pub fn orientation(&self) -> Option<Orientation> {
        match &self.kind {
            NodeKind::Split(split) => Some(split.orientation),
            NodeKind::Leaf => None,
        }
    }
}

/// Structural errors from tree editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    ZeroNodeId,
    NodeIdOverflow { current: NodeId },
    MissingNode { node: NodeId },
    NotAContainer { node: NodeId },
    CannotRemoveRoot { root: NodeId },
    NotLaidOut { node: NodeId },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroNodeId => write!(f, "node id 0 is reserved"),
            Self::NodeIdOverflow { current } => {
                write!(f, "node id overflow after {current}")
            }
            Self::MissingNode { node } => write!(f, "node {node} does not exist"),
            Self::NotAContainer { node } => write!(f, "node {node} is not a split container"),
            Self::CannotRemoveRoot { root } => write!(f, "cannot remove root node {root}"),
            Self::NotLaidOut { node } => {
                write!(f, "node {node} has no bounds from the last layout pass")
            }
        }
    }
}

impl std::error::Error for TreeError {}

/// Arena of layout nodes rooted at a split container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTree {
    root: NodeId,
    next_id: NodeId,
    nodes: BTreeMap<NodeId, LayoutNode>,
    #[serde(skip)]
    revision: u64,
}

impl LayoutTree {
    /// A tree holding only an empty root container.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        let root = NodeId::MIN;
        let mut nodes = BTreeMap::new();
        nodes.insert(
            root,
            LayoutNode::new(
                root,
                None,
                NodeKind::Split(SplitContainer {
                    orientation,
                    children: Vec::new(),
                }),
                String::new(),
            ),
        );
        Self {
            root,
            next_id: NodeId(2),
            nodes,
            revision: 0,
        }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Monotonic mutation counter.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &LayoutNode> + '_ {
        self.nodes.values()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut LayoutNode, TreeError> {
        self.nodes
            .get_mut(&id)
            .ok_or(TreeError::MissingNode { node: id })
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // -- Queries ---------------------------------------------------------------

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// All children in order; empty for leaves and unknown ids.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(NodeKind::Split(split)) => &split.children,
            _ => &[],
        }
    }

    /// Children that are both rendered and visible, in order.
    #[must_use]
    pub fn visible_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.is_shown(child))
            .collect()
    }

    #[must_use]
    pub fn is_to_be_rendered(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.to_be_rendered)
    }

    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|node| node.visible)
    }

    #[must_use]
    pub fn is_shown(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(LayoutNode::is_shown)
    }

    #[must_use]
    pub fn container_data(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|node| node.container_data.as_str())
    }

    #[must_use]
    pub fn widget(&self, id: NodeId) -> Option<WidgetId> {
        self.nodes.get(&id).and_then(|node| node.widget)
    }

    #[must_use]
    pub fn orientation(&self, id: NodeId) -> Option<Orientation> {
        self.nodes.get(&id).and_then(LayoutNode::orientation)
    }

    #[must_use]
    pub fn is_horizontal(&self, id: NodeId) -> bool {
        self.orientation(id).is_some_and(Orientation::is_horizontal)
    }

    // -- Editing ---------------------------------------------------------------

    /// Append a leaf to `parent`.
    pub fn add_leaf(
        &mut self,
        parent: NodeId,
        container_data: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.insert(parent, None, NodeKind::Leaf, container_data.into())
    }

    /// Append a nested split container to `parent`.
    pub fn add_split(
        &mut self,
        parent: NodeId,
        orientation: Orientation,
        container_data: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let kind = NodeKind::Split(SplitContainer {
            orientation,
            children: Vec::new(),
        });
        self.insert(parent, None, kind, container_data.into())
    }

    /// Insert a leaf at `index` within `parent` (clamped to the end).
    pub fn insert_leaf(
        &mut self,
        parent: NodeId,
        index: usize,
        container_data: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        self.insert(parent, Some(index), NodeKind::Leaf, container_data.into())
    }

    fn insert(
        &mut self,
        parent: NodeId,
        index: Option<usize>,
        kind: NodeKind,
        container_data: String,
    ) -> Result<NodeId, TreeError> {
        match self.nodes.get(&parent).map(|node| &node.kind) {
            None => return Err(TreeError::MissingNode { node: parent }),
            Some(NodeKind::Leaf) => return Err(TreeError::NotAContainer { node: parent }),
            Some(NodeKind::Split(_)) => {}
        }
        let id = self.next_id;
        self.next_id = id.checked_next()?;

        if let NodeKind::Split(split) = &mut self.node_mut(parent)?.kind {
            let at = index.unwrap_or(split.children.len()).min(split.children.len());
            split.children.insert(at, id);
        }
        self.nodes
            .insert(id, LayoutNode::new(id, Some(parent), kind, container_data));
        self.touch();
        Ok(id)
    }

    /// Remove a node and its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::CannotRemoveRoot { root: id });
        }
        let parent = self.node_mut(id)?.parent;
        if let Some(parent) = parent
            && let Ok(node) = self.node_mut(parent)
            && let NodeKind::Split(split) = &mut node.kind
        {
            split.children.retain(|&child| child != id);
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next)
                && let NodeKind::Split(split) = node.kind
            {
                stack.extend(split.children);
            }
        }
        self.touch();
        Ok(())
    }

    pub fn set_container_data(
        &mut self,
        id: NodeId,
        container_data: impl Into<String>,
    ) -> Result<(), TreeError> {
        let container_data = container_data.into();
        let node = self.node_mut(id)?;
        if node.container_data != container_data {
            node.container_data = container_data;
            self.touch();
        }
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<(), TreeError> {
        self.node_mut(id)?.visible = visible;
        self.touch();
        Ok(())
    }

    pub fn set_to_be_rendered(&mut self, id: NodeId, to_be_rendered: bool) -> Result<(), TreeError> {
        self.node_mut(id)?.to_be_rendered = to_be_rendered;
        self.touch();
        Ok(())
    }

    pub fn set_widget(&mut self, id: NodeId, widget: Option<WidgetId>) -> Result<(), TreeError> {
        self.node_mut(id)?.widget = widget;
        self.touch();
        Ok(())
    }

    pub fn set_orientation(
        &mut self,
        id: NodeId,
        orientation: Orientation,
    ) -> Result<(), TreeError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Split(split) => split.orientation = orientation,
            NodeKind::Leaf => return Err(TreeError::NotAContainer { node: id }),
        }
        self.touch();
        Ok(())
    }

    /// Indented dump of the tree, one node per line.
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let label = match &node.kind {
            NodeKind::Leaf => "Leaf".to_string(),
            NodeKind::Split(split) => format!("Split({:?})", split.orientation),
        };
        let _ = write!(out, "{:indent$}{label} {id}", "", indent = depth * 2);
        if !node.container_data.is_empty() {
            let _ = write!(out, " {:?}", node.container_data);
        }
        if !node.is_shown() {
            out.push_str(" (hidden)");
        }
        out.push('\n');
        for &child in self.children(id) {
            self.dump_node(child, depth + 1, out);
        }
    }
}
