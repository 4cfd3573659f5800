//! Walker-style layout passes.
//!
//! The first pass walks the tree post-order, assigning each node a
//! preliminary horizontal `offset` within its level and a `modifier` that
//! shifts the subtree hanging below it. Sibling chains are level-wide: two
//! nodes at the same depth under different parents are chained, which lets
//! leaves pack tightly across parent boundaries and makes branch collisions
//! detectable. The second pass walks pre-order, turning offsets into
//! absolute coordinates and accumulating the canvas extents. Connectors are
//! built last from the final geometry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::{Node, NodeId, ROOT};

/// Layout gaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    /// Vertical gap between a parent's bottom edge and its children's row.
    pub row_space: f64,
    /// Horizontal gap between level-adjacent nodes.
    pub col_space: f64,
    /// Minimum gap enforced between colliding subtrees.
    pub branch_space: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing {
            row_space: 40.0,
            col_space: 40.0,
            branch_space: 80.0,
        }
    }
}

/// 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Elbow path from a parent's bottom-center to a child's top-center, with
/// two control points held at the vertical midpoint between the rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub xa: f64,
    pub ya: f64,
    pub xb: f64,
    pub yb: f64,
    pub xc: f64,
    pub yc: f64,
    pub xd: f64,
    pub yd: f64,
}

impl Connector {
    fn between(parent: &Node, child: &Node) -> Self {
        let xa = parent.x + parent.width / 2.0;
        let ya = parent.y + parent.height;
        let xd = child.x + child.width / 2.0;
        let yd = child.y;
        let ym = (ya + yd) / 2.0;
        Connector {
            xa,
            ya,
            xb: xa,
            yb: ym,
            xc: xd,
            yc: ym,
            xd,
            yd,
        }
    }

    pub fn start(&self) -> Point {
        Point {
            x: self.xa,
            y: self.ya,
        }
    }

    pub fn end(&self) -> Point {
        Point {
            x: self.xd,
            y: self.yd,
        }
    }
}

/// Canvas extents accumulated by the coordinate pass.
///
/// `height` tracks `y + width` of every visited node and `width` carries a
/// fixed 10-unit margin past the rightmost edge; the canvas is
/// over-allocated rather than fitted to the exact bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Rightmost node seen so far at each level. Rebuilt from scratch on every
/// run; chains are never trusted across runs.
#[derive(Default)]
struct LevelChain {
    prev: Vec<Option<usize>>,
}

impl LevelChain {
    /// Records `slot` as the level's rightmost node, returning the previous
    /// holder.
    fn push(&mut self, level: usize, slot: usize) -> Option<usize> {
        if self.prev.len() <= level {
            self.prev.resize(level + 1, None);
        }
        self.prev[level].replace(slot)
    }
}

/// Runs both passes over the arena and builds the connectors.
pub(crate) fn run(nodes: &mut [Node], spacing: &Spacing) -> Extent {
    let mut levels = LevelChain::default();
    first_pass(nodes, spacing, &mut levels, ROOT, 0);

    let mut extent = Extent::default();
    if let Some(&first) = nodes[ROOT].children.first() {
        second_pass(nodes, spacing, &mut extent, first, 0.0, 0.0);
    }

    build_connectors(nodes);
    extent
}

/// Midpoint of `slot`'s children span in offset space.
pub(crate) fn children_center(nodes: &[Node], slot: usize) -> Option<f64> {
    let first = nodes[slot].children.first().copied()?;
    let last = nodes[slot].children.last().copied()?;
    let (first, last) = (&nodes[first], &nodes[last]);
    Some(first.offset + ((last.offset - first.offset) + last.width) / 2.0)
}

/// Post-order offset pass. Hooks `slot` into its level chain on entry, then
/// positions it after its children are done: leaves pack against their left
/// neighbor, parents center over their children and pick up a `modifier`
/// when the packed offset differs from the centered one.
fn first_pass(
    nodes: &mut [Node],
    spacing: &Spacing,
    levels: &mut LevelChain,
    slot: usize,
    level: usize,
) {
    if let Some(prev) = levels.push(level, slot) {
        nodes[slot].left_sibling = Some(prev);
        nodes[prev].right_sibling = Some(slot);
    }

    let children = nodes[slot].children.clone();
    for &child in &children {
        first_pass(nodes, spacing, levels, child, level + 1);
    }

    if children.is_empty() {
        nodes[slot].offset = match nodes[slot].left_sibling {
            Some(left) => nodes[left].offset + nodes[left].width + spacing.col_space,
            None => 0.0,
        };
        return;
    }

    let center = children_center(nodes, slot).expect("node with children has a children center");
    let midpoint = center - nodes[slot].width / 2.0;
    match nodes[slot].left_sibling {
        Some(left) => {
            nodes[slot].offset = nodes[left].offset + nodes[left].width + spacing.col_space;
            nodes[slot].modifier = nodes[slot].offset - midpoint;
            resolve_collisions(nodes, spacing, slot, level);
        }
        None => nodes[slot].offset = midpoint,
    }
}

/// Pushes `slot`'s subtree rightward until its leftmost branch clears the
/// neighbor branches at every depth the two share. The required shift is
/// distributed in strictly decreasing amounts across the sibling chain from
/// `slot` back to the neighbor branch's ancestor, so intervening subtrees
/// spread out instead of piling against the collision point.
fn resolve_collisions(nodes: &mut [Node], spacing: &Spacing, slot: usize, level: usize) {
    let mut right = nodes[slot].children.first().copied();
    let mut depth = 1;

    while depth <= level {
        let Some(right_slot) = right else { break };
        let Some(left_slot) = nodes[right_slot].left_sibling else { break };

        // Modifier sums along both parent chains up to the compared level.
        let mut right_mods = 0.0;
        let mut left_mods = 0.0;
        let mut right_anc = right_slot;
        let mut left_anc = left_slot;
        for _ in 0..depth {
            right_anc = nodes[right_anc].parent.expect("descendant has a parent chain");
            left_anc = nodes[left_anc].parent.expect("descendant has a parent chain");
            right_mods += nodes[right_anc].modifier;
            left_mods += nodes[left_anc].modifier;
        }

        let mut gap = (nodes[left_slot].offset
            + left_mods
            + nodes[left_slot].width
            + spacing.branch_space)
            - (nodes[right_slot].offset + right_mods);

        if gap > 0.0 {
            // Chain length from `slot` back to the left ancestor, `slot`
            // inclusive, the ancestor exclusive.
            let mut count = 0usize;
            let mut walk = Some(slot);
            while let Some(p) = walk {
                if p == left_anc {
                    break;
                }
                count += 1;
                walk = nodes[p].left_sibling;
            }

            if walk.is_some() {
                tracing::trace!(
                    node = nodes[slot].id,
                    gap,
                    subtrees = count,
                    "shifting colliding branches"
                );
                let single = gap / count as f64;
                let mut cur = slot;
                while cur != left_anc {
                    nodes[cur].offset += gap;
                    nodes[cur].modifier += gap;
                    gap -= single;
                    cur = nodes[cur]
                        .left_sibling
                        .expect("chain verified to reach the ancestor");
                }
            }
        }

        depth += 1;
        right = if nodes[right_slot].has_children() {
            nodes[right_slot].children.first().copied()
        } else {
            leftmost_descendant(nodes, slot, 0, depth)
        };
    }
}

/// Walker's leftmost search: the first descendant found `depth` generations
/// below `slot`, trying the first child and then the right-sibling chain at
/// each step. `None` when every branch is shallower than `depth`.
fn leftmost_descendant(nodes: &[Node], slot: usize, level: usize, depth: usize) -> Option<usize> {
    if level >= depth {
        return Some(slot);
    }
    let mut rightmost = nodes[slot].children.first().copied()?;
    let mut leftmost = leftmost_descendant(nodes, rightmost, level + 1, depth);
    while leftmost.is_none() {
        let Some(next) = nodes[rightmost].right_sibling else { break };
        rightmost = next;
        leftmost = leftmost_descendant(nodes, next, level + 1, depth);
    }
    leftmost
}

/// Pre-order coordinate pass. Each node lands at `offset + x` with its row's
/// `y`; its children inherit `x + modifier` one row below. The walk follows
/// first children and the level-wide right-sibling chains, so nodes under
/// neighboring parents are revisited with the earlier parent's basis; the
/// last write, via the node's own parent chain, wins. Extents accumulate
/// over every visit.
fn second_pass(
    nodes: &mut [Node],
    spacing: &Spacing,
    extent: &mut Extent,
    slot: usize,
    x: f64,
    y: f64,
) {
    let mut cur = Some(slot);
    while let Some(s) = cur {
        let node = &mut nodes[s];
        node.x = node.offset + x;
        node.y = y;
        extent.height = extent.height.max(node.y + node.width);
        extent.width = extent.width.max(node.x + node.width + 10.0);

        if let Some(&first) = nodes[s].children.first() {
            let child_x = x + nodes[s].modifier;
            let child_y = y + nodes[s].height + spacing.row_space;
            second_pass(nodes, spacing, extent, first, child_x, child_y);
        }
        cur = nodes[s].right_sibling;
    }
}

/// Builds the per-node elbow connectors from the final geometry, keyed by
/// child id in child order.
fn build_connectors(nodes: &mut [Node]) {
    for slot in 0..nodes.len() {
        let links: IndexMap<NodeId, Connector> = nodes[slot]
            .children
            .iter()
            .map(|&child| (nodes[child].id, Connector::between(&nodes[slot], &nodes[child])))
            .collect();
        nodes[slot].links = links;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: NodeId, width: f64) -> Node {
        Node {
            id,
            width,
            height: 20.0,
            x: 0.0,
            y: 0.0,
            offset: 0.0,
            modifier: 0.0,
            message: String::new(),
            color: crate::graph::Rgb::default(),
            url: String::new(),
            links: IndexMap::new(),
            children: Vec::new(),
            parent: None,
            left_sibling: None,
            right_sibling: None,
        }
    }

    /// root(0) -> a(1), b(2); a -> c(3); c -> d(4); b is a leaf.
    fn arena() -> Vec<Node> {
        let mut nodes = vec![
            node(0, 0.0),
            node(1, 50.0),
            node(2, 50.0),
            node(3, 50.0),
            node(4, 50.0),
        ];
        nodes[0].children = vec![1, 2];
        nodes[1].parent = Some(0);
        nodes[2].parent = Some(0);
        nodes[1].children = vec![3];
        nodes[3].parent = Some(1);
        nodes[3].children = vec![4];
        nodes[4].parent = Some(3);
        nodes
    }

    #[test]
    fn leftmost_descendant_finds_the_deep_branch() {
        let mut nodes = arena();
        let spacing = Spacing::default();
        let mut levels = LevelChain::default();
        first_pass(&mut nodes, &spacing, &mut levels, 0, 0);

        assert_eq!(leftmost_descendant(&nodes, 0, 0, 1), Some(1));
        assert_eq!(leftmost_descendant(&nodes, 0, 0, 2), Some(3));
        assert_eq!(leftmost_descendant(&nodes, 0, 0, 3), Some(4));
    }

    #[test]
    fn leftmost_descendant_is_absent_past_the_deepest_branch() {
        let mut nodes = arena();
        let spacing = Spacing::default();
        let mut levels = LevelChain::default();
        first_pass(&mut nodes, &spacing, &mut levels, 0, 0);

        assert_eq!(leftmost_descendant(&nodes, 0, 0, 4), None);
        assert_eq!(leftmost_descendant(&nodes, 2, 0, 1), None);
    }

    #[test]
    fn leftmost_descendant_falls_back_to_the_sibling_chain() {
        // root -> a(1), b(2); only b has a child, so the depth-2 search must
        // walk the level chain past the childless a.
        let mut nodes = vec![node(0, 0.0), node(1, 50.0), node(2, 50.0), node(3, 50.0)];
        nodes[0].children = vec![1, 2];
        nodes[1].parent = Some(0);
        nodes[2].parent = Some(0);
        nodes[2].children = vec![3];
        nodes[3].parent = Some(2);
        let spacing = Spacing::default();
        let mut levels = LevelChain::default();
        first_pass(&mut nodes, &spacing, &mut levels, 0, 0);

        assert_eq!(leftmost_descendant(&nodes, 0, 0, 2), Some(3));
    }

    #[test]
    fn children_center_spans_first_to_last_child() {
        let mut nodes = arena();
        nodes[1].offset = 10.0;
        nodes[2].offset = 100.0;
        assert_eq!(children_center(&nodes, 0), Some(10.0 + (90.0 + 50.0) / 2.0));
        assert_eq!(children_center(&nodes, 2), None);
    }

    #[test]
    fn first_pass_builds_the_level_chains() {
        let mut nodes = arena();
        let spacing = Spacing::default();
        let mut levels = LevelChain::default();
        first_pass(&mut nodes, &spacing, &mut levels, 0, 0);

        assert_eq!(nodes[1].right_sibling, Some(2));
        assert_eq!(nodes[2].left_sibling, Some(1));
        assert_eq!(nodes[3].left_sibling, None);
        assert_eq!(nodes[4].left_sibling, None);
    }

    #[test]
    fn connector_holds_the_vertical_midpoint() {
        let mut parent = node(1, 100.0);
        parent.height = 50.0;
        parent.x = 30.0;
        let mut child = node(2, 60.0);
        child.y = 90.0;

        let c = Connector::between(&parent, &child);
        assert_eq!(c.xa, 80.0);
        assert_eq!(c.ya, 50.0);
        assert_eq!(c.xb, 80.0);
        assert_eq!(c.yb, 70.0);
        assert_eq!(c.xc, 30.0);
        assert_eq!(c.yc, 70.0);
        assert_eq!(c.xd, 30.0);
        assert_eq!(c.yd, 90.0);
    }
}
