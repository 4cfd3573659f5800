//! Tree graph arena and public surface.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::{self, Connector, Spacing};

/// Caller-facing node identifier. Id `0` is reserved for the synthetic root.
pub type NodeId = u64;

/// Id of the synthetic root that aggregates top-level nodes.
pub const ROOT_ID: NodeId = 0;

/// Arena slot of the synthetic root.
pub(crate) const ROOT: usize = 0;

/// RGB node color, one byte per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb([r, g, b])
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(components: [u8; 3]) -> Self {
        Rgb(components)
    }
}

impl TryFrom<&[u8]> for Rgb {
    type Error = Error;

    /// Accepts exactly three components.
    fn try_from(components: &[u8]) -> Result<Self> {
        match components {
            [r, g, b] => Ok(Rgb([*r, *g, *b])),
            _ => Err(Error::InvalidColor {
                actual: components.len(),
            }),
        }
    }
}

impl TryFrom<Vec<u8>> for Rgb {
    type Error = Error;

    fn try_from(components: Vec<u8>) -> Result<Self> {
        Rgb::try_from(components.as_slice())
    }
}

/// Caller-supplied node payload and box size.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    pub message: String,
    pub color: Rgb,
    pub url: String,
}

/// A tree node in the arena.
///
/// Geometry is populated by [`TreeGraph::render`]: `x`/`y` are the final
/// top-left coordinates, `offset` is the preliminary horizontal position
/// within the node's level and `modifier` the shift inherited by the
/// subtree below. Relations are arena slots, resolved through the graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub offset: f64,
    pub modifier: f64,
    pub message: String,
    pub color: Rgb,
    pub url: String,
    /// Elbow connectors to each child, keyed by child id in child order.
    pub links: IndexMap<NodeId, Connector>,
    pub(crate) children: Vec<usize>,
    pub(crate) parent: Option<usize>,
    pub(crate) left_sibling: Option<usize>,
    pub(crate) right_sibling: Option<usize>,
}

impl Node {
    fn new(id: NodeId, label: NodeLabel) -> Self {
        Node {
            id,
            width: label.width,
            height: label.height,
            x: 0.0,
            y: 0.0,
            offset: 0.0,
            modifier: 0.0,
            message: label.message,
            color: label.color,
            url: label.url,
            links: IndexMap::new(),
            children: Vec::new(),
            parent: None,
            left_sibling: None,
            right_sibling: None,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Tree of variable-sized boxes with Walker-style top-down layout.
///
/// Nodes are registered with [`TreeGraph::add`] and laid out by
/// [`TreeGraph::render`]: the root row sits at `y = 0` and every child row
/// hangs `row_space` below its parent's bottom edge, horizontally packed so
/// that neighbors and branches never overlap. Rendering happens exactly
/// once; a rendered graph is frozen and further `add` calls are rejected.
#[derive(Debug, Clone)]
pub struct TreeGraph {
    nodes: Vec<Node>,
    id_to_slot: FxHashMap<NodeId, usize>,
    spacing: Spacing,
    cursor: usize,
    rendered: bool,
    width: f64,
    height: f64,
}

impl Default for TreeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeGraph {
    /// Empty graph with the default gaps (rows 40, columns 40, branches 80).
    pub fn new() -> Self {
        Self::with_spacing(Spacing::default())
    }

    pub fn with_spacing(spacing: Spacing) -> Self {
        let mut id_to_slot = FxHashMap::default();
        id_to_slot.insert(ROOT_ID, ROOT);
        TreeGraph {
            nodes: vec![Node::new(ROOT_ID, NodeLabel::default())],
            id_to_slot,
            spacing,
            cursor: 1,
            rendered: false,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Registers a node under `parent_id`. A parent id that is not (yet)
    /// registered attaches the node to the synthetic root instead.
    pub fn add(&mut self, id: NodeId, parent_id: NodeId, label: NodeLabel) -> Result<()> {
        if self.rendered {
            return Err(Error::AlreadyRendered);
        }
        if self.id_to_slot.contains_key(&id) {
            return Err(Error::DuplicateId { id });
        }

        let parent_slot = self.id_to_slot.get(&parent_id).copied().unwrap_or(ROOT);
        let slot = self.nodes.len();
        let mut node = Node::new(id, label);
        node.parent = Some(parent_slot);
        self.nodes.push(node);
        self.id_to_slot.insert(id, slot);
        self.nodes[parent_slot].children.push(slot);
        Ok(())
    }

    /// Looks up a node by id. Id `0` resolves to the synthetic root.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.id_to_slot.get(&id).map(|&slot| &self.nodes[slot])
    }

    /// The `index`-th child of `id`, in insertion order.
    pub fn child_at(&self, id: NodeId, index: usize) -> Option<&Node> {
        let node = self.get(id)?;
        node.children.get(index).map(|&slot| &self.nodes[slot])
    }

    /// The parent of `id`; top-level nodes report the synthetic root.
    pub fn parent(&self, id: NodeId) -> Option<&Node> {
        self.get(id)?.parent.map(|slot| &self.nodes[slot])
    }

    /// The level-wide left neighbor of `id`, populated by [`TreeGraph::render`].
    pub fn left_sibling(&self, id: NodeId) -> Option<&Node> {
        self.get(id)?.left_sibling.map(|slot| &self.nodes[slot])
    }

    /// The level-wide right neighbor of `id`, populated by [`TreeGraph::render`].
    pub fn right_sibling(&self, id: NodeId) -> Option<&Node> {
        self.get(id)?.right_sibling.map(|slot| &self.nodes[slot])
    }

    /// Children of `id` in insertion order; empty for unknown ids.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        let slots = self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[]);
        slots.iter().map(|&slot| &self.nodes[slot])
    }

    /// Midpoint of a node's children span in offset space; `None` for
    /// childless or unknown ids.
    pub fn children_center(&self, id: NodeId) -> Option<f64> {
        let slot = self.id_to_slot.get(&id).copied()?;
        layout::children_center(&self.nodes, slot)
    }

    /// Number of inserted nodes; the synthetic root does not count.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    /// Runs the layout passes. Further calls are no-ops; coordinates,
    /// extents and connectors are stable once computed.
    pub fn render(&mut self) {
        if self.rendered {
            return;
        }
        let extent = layout::run(&mut self.nodes, &self.spacing);
        self.width = extent.width;
        self.height = extent.height;
        self.rendered = true;
        tracing::debug!(
            nodes = self.node_count(),
            width = self.width,
            height = self.height,
            "tree layout complete"
        );
    }

    /// Canvas width, rendering first if needed. Carries a fixed 10-unit
    /// margin past the rightmost node edge.
    pub fn width(&mut self) -> f64 {
        self.render();
        self.width
    }

    /// Canvas height estimate, rendering first if needed. Tracks `y + width`
    /// of every placed node rather than the exact bounding box, so wide
    /// nodes over-allocate vertically; this matches the canvas sizing of the
    /// classic org-chart layouters this engine is compatible with.
    pub fn height(&mut self) -> f64 {
        self.render();
        self.height
    }

    /// Yields inserted nodes in insertion order, rendering on first use;
    /// `None` once exhausted.
    pub fn next_node(&mut self) -> Option<&Node> {
        if self.cursor >= self.nodes.len() {
            return None;
        }
        self.render();
        let node = &self.nodes[self.cursor];
        self.cursor += 1;
        Some(node)
    }

    /// Whether the cursor has nodes left. Never renders or advances.
    pub fn has_next(&self) -> bool {
        self.cursor < self.nodes.len()
    }

    /// Renders, then iterates inserted nodes in insertion order without
    /// touching the cursor.
    pub fn nodes(&mut self) -> impl Iterator<Item = &Node> {
        self.render();
        self.nodes.iter().skip(1)
    }
}
