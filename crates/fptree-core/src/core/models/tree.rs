use super::ids::NodeId;
use super::label::TaxonLabel;
use crate::core::color::Rgb;
use slotmap::SlotMap;

/// Display attributes written onto a node by the annotation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    pub color: Rgb,
    pub font_size: u32,
    pub line_width: u32,
    /// Marker diameter at the node; 0 hides the marker entirely.
    pub marker_size: u32,
}

/// A single tree node stored in the arena.
///
/// `branch_length` is the length of the edge to the parent; it is unused
/// (kept at zero) for the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: Option<TaxonLabel>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub branch_length: f64,
    pub style: Option<NodeStyle>,
}

impl Node {
    fn leaf(label: TaxonLabel) -> Self {
        Self {
            label: Some(label),
            parent: None,
            children: Vec::new(),
            branch_length: 0.0,
            style: None,
        }
    }

    fn internal() -> Self {
        Self {
            label: None,
            parent: None,
            children: Vec::new(),
            branch_length: 0.0,
            style: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An arena-backed phylogenetic tree.
///
/// All nodes live in one owning [`SlotMap`] and reference each other through
/// stable [`NodeId`]s, so structural operations such as rerooting amount to
/// relinking ids rather than moving ownership around. The parent/child links
/// always form a strict arborescence below [`Tree::root`].
#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an unattached leaf node.
    pub fn add_leaf(&mut self, label: TaxonLabel) -> NodeId {
        self.nodes.insert(Node::leaf(label))
    }

    /// Inserts an unattached, unlabeled internal node.
    pub fn add_internal(&mut self) -> NodeId {
        self.nodes.insert(Node::internal())
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Designates `id` as the root and clears its parent edge.
    pub fn set_root(&mut self, id: NodeId) -> Option<()> {
        let node = self.nodes.get_mut(id)?;
        node.parent = None;
        node.branch_length = 0.0;
        self.root = Some(id);
        Some(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Makes `child` a child of `parent` with the given branch length.
    ///
    /// The child must not currently have a parent; detach it first when
    /// re-linking. Returns `None` if either id is stale or the child is
    /// still attached.
    pub fn attach(&mut self, parent: NodeId, child: NodeId, branch_length: f64) -> Option<()> {
        if !self.nodes.contains_key(parent) || self.nodes.get(child)?.parent.is_some() {
            return None;
        }
        {
            let child_node = self.nodes.get_mut(child)?;
            child_node.parent = Some(parent);
            child_node.branch_length = branch_length;
        }
        self.nodes.get_mut(parent)?.children.push(child);
        Some(())
    }

    /// Severs the edge between `child` and its parent, leaving the child
    /// unattached. The child's branch length is reset to zero.
    pub fn detach(&mut self, child: NodeId) -> Option<()> {
        let parent = self.nodes.get(child)?.parent?;
        self.nodes
            .get_mut(parent)?
            .children
            .retain(|&id| id != child);
        let child_node = self.nodes.get_mut(child)?;
        child_node.parent = None;
        child_node.branch_length = 0.0;
        Some(())
    }

    /// Removes a node that has exactly one child, merging its parent edge
    /// into the child's. Used after rerooting, when the former root can be
    /// left with a single child.
    pub fn splice_unary(&mut self, id: NodeId) -> Option<()> {
        let node = self.nodes.get(id)?;
        if node.children.len() != 1 {
            return None;
        }
        let child = node.children[0];
        let parent = node.parent;
        let edge_to_parent = node.branch_length;
        let edge_to_child = self.nodes.get(child)?.branch_length;

        self.detach(child)?;
        match parent {
            Some(parent) => {
                self.detach(id)?;
                self.attach(parent, child, edge_to_parent + edge_to_child)?;
            }
            None => {
                // Splicing the root promotes the child.
                self.set_root(child)?;
            }
        }
        self.nodes.remove(id);
        Some(())
    }

    /// Node ids in preorder (root first, children in insertion order).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let Some(root) = self.root else {
            return order;
        };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    /// Ids of all leaves reachable from the root, in preorder.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.nodes[id].is_leaf())
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn internal_count(&self) -> usize {
        self.preorder()
            .into_iter()
            .filter(|&id| !self.nodes[id].is_leaf())
            .count()
    }

    /// Finds the leaf whose raw label equals `raw`.
    pub fn find_leaf(&self, raw: &str) -> Option<NodeId> {
        self.leaves().into_iter().find(|&id| {
            self.nodes[id]
                .label
                .as_ref()
                .is_some_and(|l| l.raw() == raw)
        })
    }

    /// Path of node ids from the root down to `id`, inclusive.
    pub fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes.get(current).and_then(|n| n.parent) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Lowest common ancestor of two nodes under the current root.
    pub fn lowest_common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let path_a = self.path_from_root(a);
        let path_b = self.path_from_root(b);
        path_a
            .iter()
            .zip(path_b.iter())
            .take_while(|(x, y)| x == y)
            .last()
            .map(|(&id, _)| id)
    }

    /// Sum of branch lengths along the path between two nodes.
    pub fn path_distance(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let ancestor = self.lowest_common_ancestor(a, b)?;
        let ascend = |mut id: NodeId| -> f64 {
            let mut total = 0.0;
            while id != ancestor {
                let node = &self.nodes[id];
                total += node.branch_length;
                id = node.parent.expect("ancestor is on the root path");
            }
            total
        };
        Some(ascend(a) + ascend(b))
    }

    /// Sum of all branch lengths in the tree.
    pub fn total_branch_length(&self) -> f64 {
        self.preorder()
            .into_iter()
            .filter(|&id| Some(id) != self.root)
            .map(|id| self.nodes[id].branch_length)
            .sum()
    }
}
