//! Outgroup rerooting.
//!
//! Neighbor joining yields an unrooted tree; to display it the caller names
//! two leaves whose most recent common ancestor marks the outgroup side.
//! The edge above that ancestor is split in half (documented policy: equal
//! split) and a new root inserted at the split point. Because the tree
//! lives in an id arena, rerooting is pure relinking: parent/child edges
//! along the old root path flip direction, ownership never moves.

use crate::core::models::ids::NodeId;
use crate::core::models::tree::Tree;
use crate::engine::error::EngineError;
use tracing::debug;

/// Re-roots the tree at the edge above the common ancestor of the two
/// named leaves.
///
/// Leaf-to-leaf path distances and the total branch length are preserved.
/// If the ancestor already is the root, the tree is left untouched.
///
/// # Errors
///
/// Returns [`EngineError::TaxonNotFound`] if either label is missing and
/// [`EngineError::Internal`] if the tree has no root.
pub fn reroot(tree: &mut Tree, label_a: &str, label_b: &str) -> Result<(), EngineError> {
    let old_root = tree
        .root()
        .ok_or_else(|| EngineError::Internal("cannot reroot a tree without a root".into()))?;
    let leaf_a = find_leaf(tree, label_a)?;
    let leaf_b = find_leaf(tree, label_b)?;

    let ancestor = tree
        .lowest_common_ancestor(leaf_a, leaf_b)
        .ok_or_else(|| EngineError::Internal("leaves share no common ancestor".into()))?;
    if ancestor == old_root {
        debug!("outgroup ancestor already is the root; nothing to do");
        return Ok(());
    }

    // Path from the ancestor up to the old root. The ancestor's parent edge
    // is split; every edge further up flips direction.
    let chain: Vec<NodeId> = {
        let mut path = tree.path_from_root(ancestor);
        path.reverse();
        path
    };
    let edge_lengths: Vec<f64> = chain
        .iter()
        .map(|&id| tree.node(id).expect("chain node exists").branch_length)
        .collect();

    let new_root = tree.add_internal();
    relink(tree, new_root, ancestor, edge_lengths[0] / 2.0)?;

    let mut parent = new_root;
    let mut carry = edge_lengths[0] / 2.0;
    for k in 1..chain.len() {
        let current = chain[k];
        let next_carry = edge_lengths[k];
        relink(tree, parent, current, carry)?;
        parent = current;
        carry = next_carry;
    }
    tree.set_root(new_root)
        .ok_or_else(|| EngineError::Internal("stale root id".into()))?;

    // The old root loses its chain child; if only one child remains it is a
    // redundant degree-2 node and gets spliced out.
    let survivor_children = tree
        .node(old_root)
        .map(|n| n.children.len())
        .unwrap_or_default();
    if survivor_children == 1 {
        tree.splice_unary(old_root)
            .ok_or_else(|| EngineError::Internal("failed to splice former root".into()))?;
    }

    Ok(())
}

/// Detaches `child` from its current parent (if any) and re-attaches it
/// under `parent` with the given edge length.
fn relink(
    tree: &mut Tree,
    parent: NodeId,
    child: NodeId,
    length: f64,
) -> Result<(), EngineError> {
    // The old root has no parent edge; detaching it is a no-op.
    let _ = tree.detach(child);
    tree.attach(parent, child, length)
        .ok_or_else(|| EngineError::Internal("relink of a tree node failed".into()))
}

fn find_leaf(tree: &Tree, label: &str) -> Result<NodeId, EngineError> {
    tree.find_leaf(label).ok_or_else(|| EngineError::TaxonNotFound {
        label: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::label::TaxonLabel;

    const TOL: f64 = 1e-9;

    /// Unrooted 5-leaf tree as neighbor joining would deliver it: the root
    /// is the last join with three children.
    ///
    /// Topology: ((a:1,b:2)u:3,(c:4,d:5)v:6,e:7)root
    fn five_leaf_tree() -> Tree {
        let mut tree = Tree::new();
        let a = tree.add_leaf(TaxonLabel::new("a"));
        let b = tree.add_leaf(TaxonLabel::new("b"));
        let c = tree.add_leaf(TaxonLabel::new("c"));
        let d = tree.add_leaf(TaxonLabel::new("d"));
        let e = tree.add_leaf(TaxonLabel::new("e"));
        let u = tree.add_internal();
        let v = tree.add_internal();
        let root = tree.add_internal();
        tree.attach(u, a, 1.0).unwrap();
        tree.attach(u, b, 2.0).unwrap();
        tree.attach(v, c, 4.0).unwrap();
        tree.attach(v, d, 5.0).unwrap();
        tree.attach(root, u, 3.0).unwrap();
        tree.attach(root, v, 6.0).unwrap();
        tree.attach(root, e, 7.0).unwrap();
        tree.set_root(root).unwrap();
        tree
    }

    fn leaf_names(tree: &Tree, id: crate::core::models::ids::NodeId) -> Vec<String> {
        let mut names: Vec<String> = descendant_leaves(tree, id)
            .into_iter()
            .map(|leaf| tree.node(leaf).unwrap().label.as_ref().unwrap().raw().to_string())
            .collect();
        names.sort();
        names
    }

    fn descendant_leaves(
        tree: &Tree,
        id: crate::core::models::ids::NodeId,
    ) -> Vec<crate::core::models::ids::NodeId> {
        let node = tree.node(id).unwrap();
        if node.is_leaf() {
            return vec![id];
        }
        node.children
            .iter()
            .flat_map(|&child| descendant_leaves(tree, child))
            .collect()
    }

    fn all_pair_distances(tree: &Tree) -> Vec<(String, String, f64)> {
        let leaves = tree.leaves();
        let mut out = Vec::new();
        for (i, &x) in leaves.iter().enumerate() {
            for &y in &leaves[i + 1..] {
                let mut pair = [
                    tree.node(x).unwrap().label.as_ref().unwrap().raw().to_string(),
                    tree.node(y).unwrap().label.as_ref().unwrap().raw().to_string(),
                ];
                pair.sort();
                let [first, second] = pair;
                out.push((first, second, tree.path_distance(x, y).unwrap()));
            }
        }
        out.sort_by(|l, r| (&l.0, &l.1).cmp(&(&r.0, &r.1)));
        out
    }

    #[test]
    fn reroot_splits_edge_and_partitions_leaves() {
        let mut tree = five_leaf_tree();
        let total_before = tree.total_branch_length();

        reroot(&mut tree, "c", "d").unwrap();

        let root = tree.root().unwrap();
        let children = tree.node(root).unwrap().children.clone();
        assert_eq!(children.len(), 2);

        // One side is exactly {c, d}; the other holds the rest.
        let mut partitions: Vec<Vec<String>> = children
            .iter()
            .map(|&child| leaf_names(&tree, child))
            .collect();
        partitions.sort_by_key(|p| p.len());
        assert_eq!(partitions[0], vec!["c", "d"]);
        assert_eq!(partitions[1], vec!["a", "b", "e"]);

        // Split edge: 6.0 shared equally on both sides of the new root.
        for &child in &children {
            let length = tree.node(child).unwrap().branch_length;
            assert!((length - 3.0).abs() < TOL);
        }

        assert!((tree.total_branch_length() - total_before).abs() < TOL);
        assert_eq!(tree.leaf_count(), 5);
    }

    #[test]
    fn reroot_preserves_leaf_path_distances() {
        let reference = five_leaf_tree();
        let mut tree = five_leaf_tree();
        reroot(&mut tree, "a", "b").unwrap();

        let before = all_pair_distances(&reference);
        let after = all_pair_distances(&tree);
        assert_eq!(before.len(), after.len());
        for ((la, lb, d_before), (ra, rb, d_after)) in before.iter().zip(after.iter()) {
            assert_eq!((la, lb), (ra, rb));
            assert!((d_before - d_after).abs() < TOL);
        }
    }

    #[test]
    fn rerooting_twice_at_the_same_outgroup_is_stable() {
        let mut tree = five_leaf_tree();
        reroot(&mut tree, "c", "d").unwrap();
        let first = all_pair_distances(&tree);
        let total_first = tree.total_branch_length();

        reroot(&mut tree, "c", "d").unwrap();
        let second = all_pair_distances(&tree);

        assert_eq!(first, second);
        assert!((tree.total_branch_length() - total_first).abs() < TOL);
        assert_eq!(tree.leaf_count(), 5);
        assert_eq!(tree.node(tree.root().unwrap()).unwrap().children.len(), 2);
    }

    #[test]
    fn missing_taxon_is_reported() {
        let mut tree = five_leaf_tree();
        let result = reroot(&mut tree, "c", "nope");
        assert!(matches!(
            result,
            Err(EngineError::TaxonNotFound { label }) if label == "nope"
        ));
    }

    #[test]
    fn ancestor_at_root_is_a_no_op() {
        let mut tree = five_leaf_tree();
        let before = crate::core::io::newick::to_newick(&tree).unwrap();
        // a sits under u, e directly under the root; their ancestor is the
        // root itself.
        reroot(&mut tree, "a", "e").unwrap();
        let after = crate::core::io::newick::to_newick(&tree).unwrap();
        assert_eq!(before, after);
    }
}
