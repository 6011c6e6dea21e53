use super::node::{Operator, OperatorFamily, Terminal, TreeNode};
use crate::config::TreeConfig;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Leaves available to one individual: the four coordinate inputs plus its own
/// random constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalSet {
    terminals: Vec<Terminal>,
}

impl TerminalSet {
    pub fn random(config: &TreeConfig, rng: &mut dyn RngCore) -> Self {
        let mut terminals = vec![Terminal::X, Terminal::Y, Terminal::R, Terminal::Theta];
        terminals.extend((0..config.constant_count).map(|_| {
            let unit: f64 = rng.gen();
            Terminal::Constant((unit - 0.5) * 2.0 * config.constant_range)
        }));
        Self { terminals }
    }

    pub fn as_slice(&self) -> &[Terminal] {
        &self.terminals
    }

    pub fn constants(&self) -> impl Iterator<Item = f64> + '_ {
        self.terminals.iter().filter_map(|t| match t {
            Terminal::Constant(value) => Some(*value),
            _ => None,
        })
    }

    fn pick(&self, rng: &mut dyn RngCore) -> Terminal {
        self.terminals.choose(rng).copied().unwrap_or(Terminal::X)
    }
}

/// Random tree construction using the "grow" method.
pub struct TreeBuilder<'a> {
    config: &'a TreeConfig,
    terminals: &'a TerminalSet,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a TreeConfig, terminals: &'a TerminalSet) -> Self {
        Self { config, terminals }
    }

    /// Grow a tree no deeper than `max_depth`.
    ///
    /// A budget of 1 always yields a terminal; above that a terminal is chosen
    /// with `terminal_probability`, otherwise an operator family is drawn by
    /// weight and every child gets a budget one smaller.
    pub fn grow(&self, max_depth: usize, rng: &mut dyn RngCore) -> TreeNode {
        if max_depth <= 1 || rng.gen::<f64>() < self.config.terminal_probability {
            return TreeNode::Terminal(self.terminals.pick(rng));
        }

        let family: &[Operator] = match self.pick_family(rng) {
            OperatorFamily::Binary => &Operator::BINARY,
            OperatorFamily::Unary => &Operator::UNARY,
            OperatorFamily::Ternary => &Operator::TERNARY,
        };
        let op = family.choose(rng).copied().unwrap_or(Operator::Add);

        let children = (0..op.arity())
            .map(|_| self.grow(max_depth - 1, rng))
            .collect();
        TreeNode::Function { op, children }
    }

    fn pick_family(&self, rng: &mut dyn RngCore) -> OperatorFamily {
        let weights = [
            (OperatorFamily::Binary, self.config.binary_weight),
            (OperatorFamily::Unary, self.config.unary_weight),
            (OperatorFamily::Ternary, self.config.ternary_weight),
        ];
        let total: f64 = weights.iter().map(|(_, w)| w.max(0.0)).sum();
        let mut spin = rng.gen::<f64>() * total;

        for (family, weight) in weights {
            spin -= weight.max(0.0);
            if spin < 0.0 {
                return family;
            }
        }
        OperatorFamily::Binary
    }
}
