use super::builder::TreeBuilder;
use super::node::TreeNode;
use rand::{Rng, RngCore};

/// With probability `rate`, replace one uniformly chosen node with a freshly
/// grown subtree of depth `1..=max_subtree_depth`. Returns whether the tree changed.
pub fn point_mutation(
    tree: &mut TreeNode,
    builder: &TreeBuilder<'_>,
    rate: f64,
    max_subtree_depth: usize,
    rng: &mut dyn RngCore,
) -> bool {
    if rng.gen::<f64>() >= rate {
        return false;
    }

    let index = rng.gen_range(0..tree.size());
    let depth = rng.gen_range(1..=max_subtree_depth.max(1));
    let replacement = builder.grow(depth, rng);
    tree.replace_subtree(index, replacement).is_some()
}

/// Swap one random non-root subtree of `a` with one of `b`, in place.
///
/// Does nothing when either tree is a lone root.
pub fn subtree_crossover(a: &mut TreeNode, b: &mut TreeNode, rng: &mut dyn RngCore) -> bool {
    let (size_a, size_b) = (a.size(), b.size());
    if size_a < 2 || size_b < 2 {
        return false;
    }

    let index_a = rng.gen_range(1..size_a);
    let index_b = rng.gen_range(1..size_b);

    match (a.subtree_mut(index_a), b.subtree_mut(index_b)) {
        (Some(left), Some(right)) => {
            std::mem::swap(left, right);
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeConfig;
    use crate::engines::tree::builder::TerminalSet;
    use crate::engines::tree::node::{Operator, Terminal};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn constant(value: f64) -> TreeNode {
        TreeNode::Terminal(Terminal::Constant(value))
    }

    fn sum(lhs: TreeNode, rhs: TreeNode) -> TreeNode {
        TreeNode::function(Operator::Add, vec![lhs, rhs]).unwrap()
    }

    #[test]
    fn test_crossover_swaps_non_root_subtrees() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut a = sum(constant(1.0), constant(2.0));
        let mut b = sum(constant(10.0), constant(20.0));
        let total_before = a.evaluate(0.0, 0.0) + b.evaluate(0.0, 0.0);

        assert!(subtree_crossover(&mut a, &mut b, &mut rng));
        // leaves moved between trees, roots stayed
        assert!(matches!(a, TreeNode::Function { op: Operator::Add, .. }));
        assert!(matches!(b, TreeNode::Function { op: Operator::Add, .. }));
        assert_ne!(a, sum(constant(1.0), constant(2.0)));
        assert_eq!(a.evaluate(0.0, 0.0) + b.evaluate(0.0, 0.0), total_before);
    }

    #[test]
    fn test_crossover_with_lone_root_is_noop() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut a = constant(1.0);
        let mut b = sum(constant(10.0), constant(20.0));
        assert!(!subtree_crossover(&mut a, &mut b, &mut rng));
        assert_eq!(a, constant(1.0));
        assert_eq!(b, sum(constant(10.0), constant(20.0)));
    }

    #[test]
    fn test_mutation_rate_zero_leaves_tree() {
        let config = TreeConfig::default();
        let mut rng = StdRng::seed_from_u64(4);
        let terminals = TerminalSet::random(&config, &mut rng);
        let builder = TreeBuilder::new(&config, &terminals);
        let mut tree = sum(constant(1.0), constant(2.0));

        for _ in 0..20 {
            assert!(!point_mutation(&mut tree, &builder, 0.0, 3, &mut rng));
        }
        assert_eq!(tree, sum(constant(1.0), constant(2.0)));
    }

    #[test]
    fn test_mutation_keeps_tree_bounded() {
        let config = TreeConfig::default();
        let mut rng = StdRng::seed_from_u64(8);
        let terminals = TerminalSet::random(&config, &mut rng);
        let builder = TreeBuilder::new(&config, &terminals);
        let mut tree = builder.grow(4, &mut rng);

        for _ in 0..30 {
            let depth_before = tree.depth();
            assert!(point_mutation(&mut tree, &builder, 1.0, 3, &mut rng));
            assert!(tree.depth() <= depth_before + 3);
        }
    }
}
