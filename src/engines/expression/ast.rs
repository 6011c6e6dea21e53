use std::f64::consts::PI;
use std::fmt;

/// Divisors with magnitude at or below this are replaced by `1.0`.
pub const DIVISOR_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    X,
    Y,
    /// `sqrt(x² + y²)`
    R,
    /// `atan2(y, x)`
    Theta,
    T,
}

impl Variable {
    pub fn name(&self) -> &'static str {
        match self {
            Variable::X => "x",
            Variable::Y => "y",
            Variable::R => "r",
            Variable::Theta => "theta",
            Variable::T => "t",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Exp,
    Log,
    Sqrt,
    Abs,
    Floor,
    Ceil,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Function::Sin,
            "cos" => Function::Cos,
            "tan" => Function::Tan,
            "exp" => Function::Exp,
            "log" => Function::Log,
            "sqrt" => Function::Sqrt,
            "abs" => Function::Abs,
            "floor" => Function::Floor,
            "ceil" => Function::Ceil,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Exp => "exp",
            Function::Log => "log",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Function::Sin => value.sin(),
            Function::Cos => value.cos(),
            Function::Tan => value.tan(),
            Function::Exp => value.exp(),
            Function::Log => value.ln(),
            Function::Sqrt => value.sqrt(),
            Function::Abs => value.abs(),
            Function::Floor => value.floor(),
            Function::Ceil => value.ceil(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl BinaryOp {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Rem => '%',
        }
    }

    /// Division and modulo use `1.0` in place of a near-zero divisor.
    pub fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / guard_divisor(rhs),
            BinaryOp::Rem => lhs % guard_divisor(rhs),
        }
    }
}

pub fn guard_divisor(divisor: f64) -> f64 {
    if divisor.abs() <= DIVISOR_EPSILON {
        1.0
    } else {
        divisor
    }
}

/// Values bound to the expression variables for one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Inputs {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl Inputs {
    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, t: 0.0 }
    }

    pub fn radial(t: f64) -> Self {
        Self { x: 0.0, y: 0.0, t }
    }

    fn get(&self, variable: Variable) -> f64 {
        match variable {
            Variable::X => self.x,
            Variable::Y => self.y,
            Variable::R => (self.x * self.x + self.y * self.y).sqrt(),
            Variable::Theta => self.y.atan2(self.x),
            Variable::T => self.t,
        }
    }
}

/// Parsed arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Var(Variable),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        function: Function,
        arg: Box<Expr>,
    },
    /// `ifpos(c, a, b)` is `a` when `c > 0`, otherwise `b`.
    IfPos {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
}

impl Expr {
    /// Raw evaluation; may return NaN or infinity; callers sanitize.
    pub fn evaluate(&self, inputs: &Inputs) -> f64 {
        match self {
            Expr::Number(value) => *value,
            Expr::Var(variable) => inputs.get(*variable),
            Expr::Neg(inner) => -inner.evaluate(inputs),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.evaluate(inputs), rhs.evaluate(inputs)),
            Expr::Call { function, arg } => function.apply(arg.evaluate(inputs)),
            Expr::IfPos {
                condition,
                then,
                otherwise,
            } => {
                if condition.evaluate(inputs) > 0.0 {
                    then.evaluate(inputs)
                } else {
                    otherwise.evaluate(inputs)
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Expr::Number(_) | Expr::Var(_) => 1,
            Expr::Neg(inner) => 1 + inner.node_count(),
            Expr::Binary { lhs, rhs, .. } => 1 + lhs.node_count() + rhs.node_count(),
            Expr::Call { arg, .. } => 1 + arg.node_count(),
            Expr::IfPos {
                condition,
                then,
                otherwise,
            } => 1 + condition.node_count() + then.node_count() + otherwise.node_count(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) if *value == PI => write!(f, "3.14159"),
            Expr::Number(value) if *value == 2.0 * PI => write!(f, "6.28318"),
            Expr::Number(value) => write!(f, "{}", value),
            Expr::Var(variable) => write!(f, "{}", variable.name()),
            Expr::Neg(inner) => write!(f, "-{}", inner),
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            Expr::Call { function, arg } => write!(f, "{}({})", function.name(), arg),
            Expr::IfPos {
                condition,
                then,
                otherwise,
            } => write!(f, "ifpos({}, {}, {})", condition, then, otherwise),
        }
    }
}
