use super::ast::{Expr, Inputs, Variable};
use super::parser::parse;

/// Variables an expression may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// `x`, `y` plus the derived `r` and `theta`.
    Planar,
    /// A single parameter `t`.
    Radial,
}

impl Signature {
    pub fn resolve(&self, name: &str) -> Option<Variable> {
        match (self, name) {
            (Signature::Planar, "x") => Some(Variable::X),
            (Signature::Planar, "y") => Some(Variable::Y),
            (Signature::Planar, "r") => Some(Variable::R),
            (Signature::Planar, "theta") => Some(Variable::Theta),
            (Signature::Radial, "t") => Some(Variable::T),
            _ => None,
        }
    }
}

/// Turns derived expression strings into safe evaluators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionCompiler {
    signature: Signature,
    fallback: f64,
}

impl ExpressionCompiler {
    pub fn new(signature: Signature, fallback: f64) -> Self {
        Self {
            signature,
            fallback,
        }
    }

    /// `f(x, y)` evaluator falling back to `0.0`.
    pub fn planar() -> Self {
        Self::new(Signature::Planar, 0.0)
    }

    /// `f(t)` evaluator falling back to `1.0`.
    pub fn radial() -> Self {
        Self::new(Signature::Radial, 1.0)
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    /// Never fails: an expression that does not parse compiles to a constant.
    pub fn compile(&self, source: &str) -> CompiledExpression {
        let program = match parse(source, &self.signature) {
            Ok(expr) => Some(expr),
            Err(e) => {
                log::debug!("Expression '{}' compiled to constant fallback: {}", source, e);
                None
            }
        };

        CompiledExpression {
            program,
            fallback: self.fallback,
        }
    }
}

/// Callable produced by [`ExpressionCompiler::compile`].
///
/// Every evaluation returns a finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    program: Option<Expr>,
    fallback: f64,
}

impl CompiledExpression {
    pub fn evaluate(&self, inputs: Inputs) -> f64 {
        match &self.program {
            Some(expr) => {
                let value = expr.evaluate(&inputs);
                if value.is_finite() {
                    value
                } else {
                    self.fallback
                }
            }
            None => self.fallback,
        }
    }

    pub fn eval_xy(&self, x: f64, y: f64) -> f64 {
        self.evaluate(Inputs::planar(x, y))
    }

    pub fn eval_t(&self, t: f64) -> f64 {
        self.evaluate(Inputs::radial(t))
    }

    /// True when the source failed to parse.
    pub fn is_constant_fallback(&self) -> bool {
        self.program.is_none()
    }

    pub fn program(&self) -> Option<&Expr> {
        self.program.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_division_guard() {
        let compiled = ExpressionCompiler::planar().compile("1/x");
        assert_eq!(compiled.eval_xy(0.0, 0.0), compiled.eval_xy(1.0, 0.0));
        assert_eq!(compiled.eval_xy(1e-7, 0.0), 1.0);
        assert_eq!(compiled.eval_xy(4.0, 0.0), 0.25);
    }

    #[test]
    fn test_modulo_guard() {
        let compiled = ExpressionCompiler::planar().compile("x%y");
        assert_eq!(compiled.eval_xy(2.5, 0.0), 2.5 % 1.0);
        assert_eq!(compiled.eval_xy(7.0, 4.0), 3.0);
        assert_eq!(compiled.eval_xy(-7.0, 4.0), -3.0);
    }

    #[test]
    fn test_guard_applies_to_whole_right_operand() {
        let compiled = ExpressionCompiler::planar().compile("2.0/(x-y)*3.0");
        assert_eq!(compiled.eval_xy(1.0, 1.0), 6.0);
    }

    #[test]
    fn test_derived_variables() {
        let compiled = ExpressionCompiler::planar().compile("r");
        assert!((compiled.eval_xy(3.0, 4.0) - 5.0).abs() < 1e-12);

        let compiled = ExpressionCompiler::planar().compile("theta");
        assert!((compiled.eval_xy(0.0, 1.0) - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_results_use_fallback() {
        let planar = ExpressionCompiler::planar();
        assert_eq!(planar.compile("log(x)").eval_xy(-1.0, 0.0), 0.0);
        assert_eq!(planar.compile("sqrt(x)").eval_xy(-4.0, 0.0), 0.0);
        assert_eq!(planar.compile("exp(x*1000.0)").eval_xy(1.0, 0.0), 0.0);

        let radial = ExpressionCompiler::radial();
        assert_eq!(radial.compile("log(t-t)").eval_t(2.0), 1.0);
    }

    #[test]
    fn test_unparseable_source_is_constant() {
        let compiled = ExpressionCompiler::radial().compile("sin(x)");
        assert!(compiled.is_constant_fallback());
        assert_eq!(compiled.eval_t(0.3), 1.0);

        let compiled = ExpressionCompiler::new(Signature::Planar, -2.0).compile("((");
        assert_eq!(compiled.eval_xy(0.3, 0.1), -2.0);
    }

    #[test]
    fn test_default_substitution_output_compiles() {
        // forced derivations can leave "t" in a planar expression
        let compiled = ExpressionCompiler::planar().compile("1.0 + 0.5 * sin(t)");
        assert_eq!(compiled.eval_xy(0.5, 0.5), 0.0);
        let compiled = ExpressionCompiler::radial().compile("1.0 + 0.5 * sin(t)");
        assert!((compiled.eval_t(PI / 2.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_results_finite_over_grid() {
        let planar = ExpressionCompiler::planar();
        let sources = [
            "tan(x)/floor(y)",
            "exp(exp(exp(r)))",
            "ceil(theta)%(x*y)",
            "ifpos(x-y,log(x),sqrt(y))",
            "1.0/(x+y)/(x-y)",
        ];
        for source in sources {
            let compiled = planar.compile(source);
            for i in -10..=10 {
                for j in -10..=10 {
                    let value = compiled.eval_xy(i as f64 / 5.0, j as f64 / 5.0);
                    assert!(value.is_finite(), "{} at ({}, {})", source, i, j);
                }
            }
        }
    }
}
