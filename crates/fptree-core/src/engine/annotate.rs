//! Leaf annotation.
//!
//! Turns each leaf's parsed emission maximum into a display color and
//! writes the resolved style onto the tree, returning the same data as
//! flat [`LeafDecoration`] records for the renderer. Leaves without
//! spectral metadata render black, the same fallback as an out-of-range
//! wavelength. Annotation never touches topology or branch lengths.

use crate::core::color::{Rgb, wavelength_to_rgb};
use crate::core::io::decoration::LeafDecoration;
use crate::core::models::tree::{NodeStyle, Tree};
use crate::engine::config::StyleConfig;
use tracing::debug;

/// Resolves and applies a display style to every leaf.
///
/// The configured wavelength offset is added to each emission maximum
/// before color mapping, compensating for the gap between emission peak
/// and apparent color. Records come back in preorder, matching the order
/// leaves appear in the serialized tree.
pub fn annotate(tree: &mut Tree, style: &StyleConfig) -> Vec<LeafDecoration> {
    let mut decorations = Vec::with_capacity(tree.leaf_count());

    for id in tree.leaves() {
        let Some(node) = tree.node_mut(id) else {
            continue;
        };
        let Some(label) = node.label.clone() else {
            continue;
        };

        let color = match label.emission_nm() {
            Some(emission) => {
                let shifted = f64::from(emission) + f64::from(style.wavelength_offset);
                wavelength_to_rgb(shifted)
            }
            None => {
                debug!(label = label.raw(), "no spectral metadata; using black");
                Rgb::BLACK
            }
        };

        node.style = Some(NodeStyle {
            color,
            font_size: style.font_size,
            line_width: style.line_width,
            marker_size: 0,
        });
        decorations.push(LeafDecoration {
            label: label.raw().to_string(),
            color_hex: color.to_hex(),
            r: color.r,
            g: color.g,
            b: color.b,
            font_size: style.font_size,
            line_width: style.line_width,
        });
    }

    decorations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::newick::to_newick;
    use crate::core::models::label::TaxonLabel;

    fn two_leaf_tree(label_a: &str, label_b: &str) -> Tree {
        let mut tree = Tree::new();
        let a = tree.add_leaf(TaxonLabel::new(label_a));
        let b = tree.add_leaf(TaxonLabel::new(label_b));
        let root = tree.add_internal();
        tree.attach(root, a, 1.0).unwrap();
        tree.attach(root, b, 2.0).unwrap();
        tree.set_root(root).unwrap();
        tree
    }

    #[test]
    fn emission_maximum_drives_the_color() {
        let mut tree = two_leaf_tree("Cpop|CpYGFP|508/518", "mystery");
        let decorations = annotate(&mut tree, &StyleConfig::default());

        // 518 nm shifted by the default 15 nm offset lands at 533 nm.
        assert_eq!(decorations.len(), 2);
        assert_eq!(decorations[0].label, "Cpop|CpYGFP|508/518");
        assert_eq!(
            (decorations[0].r, decorations[0].g, decorations[0].b),
            (83, 255, 0)
        );
        assert_eq!(decorations[0].color_hex, "#53ff00");
        assert_eq!(decorations[0].font_size, 6);
        assert_eq!(decorations[0].line_width, 1);
    }

    #[test]
    fn malformed_label_renders_black() {
        let mut tree = two_leaf_tree("Amac|GFPxm/476/496", "a|b|500/510");
        let decorations = annotate(&mut tree, &StyleConfig::default());

        assert_eq!(decorations[0].color_hex, "#000000");
        assert_ne!(decorations[1].color_hex, "#000000");
    }

    #[test]
    fn styles_land_on_the_leaf_nodes() {
        let mut tree = two_leaf_tree("a|b|500/510", "c|d|600/610");
        let style = StyleConfig {
            wavelength_offset: 0,
            font_size: 8,
            line_width: 2,
        };
        annotate(&mut tree, &style);

        for id in tree.leaves() {
            let node_style = tree.node(id).unwrap().style.expect("leaf styled");
            assert_eq!(node_style.font_size, 8);
            assert_eq!(node_style.line_width, 2);
            assert_eq!(node_style.marker_size, 0);
        }
        assert_eq!(
            tree.node(tree.root().unwrap()).unwrap().style,
            None,
            "internal nodes stay unstyled"
        );
    }

    #[test]
    fn offset_can_push_a_leaf_out_of_the_visible_range() {
        let mut tree = two_leaf_tree("x|y|760/770", "a|b|500/510");
        let decorations = annotate(&mut tree, &StyleConfig::default());
        assert_eq!(decorations[0].color_hex, "#000000");
    }

    #[test]
    fn annotation_leaves_topology_untouched() {
        let mut tree = two_leaf_tree("a|b|500/510", "c|d|600/610");
        let before = to_newick(&tree).unwrap();
        annotate(&mut tree, &StyleConfig::default());
        assert_eq!(to_newick(&tree).unwrap(), before);
    }
}
