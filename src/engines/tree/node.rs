use crate::engines::expression::ast::DIVISOR_EPSILON;
use crate::error::{EvoartError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest argument passed to `exp` inside a tree.
const EXP_ARGUMENT_CAP: f64 = 10.0;
/// Value used whenever a function node yields NaN or infinity.
const NON_FINITE_FALLBACK: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Terminal {
    X,
    Y,
    /// `sqrt(x² + y²)`
    R,
    /// `atan2(x, -y)`: angle measured clockwise from the top, unlike the
    /// grammar variables which use `atan2(y, x)`.
    Theta,
    Constant(f64),
}

impl Terminal {
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match self {
            Terminal::X => x,
            Terminal::Y => y,
            Terminal::R => (x * x + y * y).sqrt(),
            Terminal::Theta => x.atan2(-y),
            Terminal::Constant(value) => *value,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::X => write!(f, "x"),
            Terminal::Y => write!(f, "y"),
            Terminal::R => write!(f, "r"),
            Terminal::Theta => write!(f, "theta"),
            Terminal::Constant(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorFamily {
    Unary,
    Binary,
    Ternary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Max,
    Min,
    Mod,
    Sin,
    Cos,
    Exp,
    Log,
    Sqrt,
    Abs,
    IfPos,
}

impl Operator {
    pub const BINARY: [Operator; 7] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Max,
        Operator::Min,
        Operator::Mod,
    ];
    pub const UNARY: [Operator; 6] = [
        Operator::Sin,
        Operator::Cos,
        Operator::Exp,
        Operator::Log,
        Operator::Sqrt,
        Operator::Abs,
    ];
    pub const TERNARY: [Operator; 1] = [Operator::IfPos];

    pub fn family(&self) -> OperatorFamily {
        match self {
            Operator::Add
            | Operator::Sub
            | Operator::Mul
            | Operator::Div
            | Operator::Max
            | Operator::Min
            | Operator::Mod => OperatorFamily::Binary,
            Operator::IfPos => OperatorFamily::Ternary,
            _ => OperatorFamily::Unary,
        }
    }

    pub fn arity(&self) -> usize {
        match self.family() {
            OperatorFamily::Unary => 1,
            OperatorFamily::Binary => 2,
            OperatorFamily::Ternary => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Max => "max",
            Operator::Min => "min",
            Operator::Mod => "mod",
            Operator::Sin => "sin",
            Operator::Cos => "cos",
            Operator::Exp => "exp",
            Operator::Log => "log",
            Operator::Sqrt => "sqrt",
            Operator::Abs => "abs",
            Operator::IfPos => "ifpos",
        }
    }

    /// Protected application; `args.len()` equals `self.arity()`.
    fn apply(&self, args: &[f64]) -> f64 {
        let value = match self {
            Operator::Add => args[0] + args[1],
            Operator::Sub => args[0] - args[1],
            Operator::Mul => args[0] * args[1],
            Operator::Div => {
                if args[1].abs() > DIVISOR_EPSILON {
                    args[0] / args[1]
                } else {
                    1.0
                }
            }
            Operator::Max => args[0].max(args[1]),
            Operator::Min => args[0].min(args[1]),
            Operator::Mod => {
                if args[1].abs() > DIVISOR_EPSILON {
                    args[0] % args[1]
                } else {
                    args[0]
                }
            }
            Operator::Sin => args[0].sin(),
            Operator::Cos => args[0].cos(),
            Operator::Exp => args[0].min(EXP_ARGUMENT_CAP).exp(),
            Operator::Log => (args[0].abs() + DIVISOR_EPSILON).ln(),
            Operator::Sqrt => args[0].abs().sqrt(),
            Operator::Abs => args[0].abs(),
            Operator::IfPos => {
                if args[0] > 0.0 {
                    args[1]
                } else {
                    args[2]
                }
            }
        };

        if value.is_finite() {
            value
        } else {
            NON_FINITE_FALLBACK
        }
    }
}

/// GP expression tree. Each tree is owned by one individual; copies are deep.
///
/// Nodes are addressed by pre-order index: 0 is the root, then each child
/// subtree in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Terminal(Terminal),
    Function {
        op: Operator,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn terminal(terminal: Terminal) -> Self {
        TreeNode::Terminal(terminal)
    }

    /// Function node; fails if the child count does not match the arity.
    pub fn function(op: Operator, children: Vec<TreeNode>) -> Result<Self> {
        if children.len() != op.arity() {
            return Err(EvoartError::InvalidTree(format!(
                "operator {} takes {} children, got {}",
                op.name(),
                op.arity(),
                children.len()
            )));
        }
        Ok(TreeNode::Function { op, children })
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Terminal(_) => &[],
            TreeNode::Function { children, .. } => children,
        }
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        match self {
            TreeNode::Terminal(terminal) => terminal.evaluate(x, y),
            TreeNode::Function { op, children } => {
                if children.len() != op.arity() {
                    return NON_FINITE_FALLBACK;
                }
                let mut args = [0.0; 3];
                for (slot, child) in args.iter_mut().zip(children) {
                    *slot = child.evaluate(x, y);
                }
                op.apply(&args[..children.len()])
            }
        }
    }

    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(TreeNode::depth).max().unwrap_or(0)
    }

    pub fn size(&self) -> usize {
        1 + self.children().iter().map(TreeNode::size).sum::<usize>()
    }

    /// Self and all descendants in pre-order.
    pub fn nodes(&self) -> Vec<&TreeNode> {
        let mut nodes = Vec::with_capacity(self.size());
        self.collect_nodes(&mut nodes);
        nodes
    }

    fn collect_nodes<'a>(&'a self, nodes: &mut Vec<&'a TreeNode>) {
        nodes.push(self);
        for child in self.children() {
            child.collect_nodes(nodes);
        }
    }

    pub fn subtree(&self, index: usize) -> Option<&TreeNode> {
        if index == 0 {
            return Some(self);
        }
        let mut remaining = index - 1;
        for child in self.children() {
            let size = child.size();
            if remaining < size {
                return child.subtree(remaining);
            }
            remaining -= size;
        }
        None
    }

    pub fn subtree_mut(&mut self, index: usize) -> Option<&mut TreeNode> {
        if index == 0 {
            return Some(self);
        }
        let mut remaining = index - 1;
        match self {
            TreeNode::Terminal(_) => None,
            TreeNode::Function { children, .. } => {
                for child in children.iter_mut() {
                    let size = child.size();
                    if remaining < size {
                        return child.subtree_mut(remaining);
                    }
                    remaining -= size;
                }
                None
            }
        }
    }

    /// Put `replacement` at pre-order `index`, returning the subtree it displaced.
    pub fn replace_subtree(&mut self, index: usize, replacement: TreeNode) -> Option<TreeNode> {
        self.subtree_mut(index)
            .map(|slot| std::mem::replace(slot, replacement))
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeNode::Terminal(terminal) => write!(f, "{}", terminal),
            TreeNode::Function { op, children } => match children.as_slice() {
                [only] => write!(f, "{}({})", op.name(), only),
                [lhs, rhs] => write!(f, "({} {} {})", lhs, op.name(), rhs),
                _ => {
                    let args: Vec<String> = children.iter().map(ToString::to_string).collect();
                    write!(f, "{}({})", op.name(), args.join(", "))
                }
            },
        }
    }
}
