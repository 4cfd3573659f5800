//! Serializable snapshot of a rendered layout.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::{NodeId, Rgb, TreeGraph};
use crate::layout::Connector;

/// Flat, renderer-facing dump of a rendered tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeLayout {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<LayoutNode>,
}

/// One placed node with its outgoing connectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub message: String,
    pub color: Rgb,
    pub url: String,
    pub links: IndexMap<NodeId, Connector>,
}

impl TreeLayout {
    /// Renders `graph` if needed and snapshots its inserted nodes in
    /// insertion order.
    pub fn from_graph(graph: &mut TreeGraph) -> Self {
        let width = graph.width();
        let height = graph.height();
        let nodes = graph
            .nodes()
            .map(|n| LayoutNode {
                id: n.id,
                x: n.x,
                y: n.y,
                width: n.width,
                height: n.height,
                message: n.message.clone(),
                color: n.color,
                url: n.url.clone(),
                links: n.links.clone(),
            })
            .collect();
        TreeLayout {
            width,
            height,
            nodes,
        }
    }
}
