//! Built-in grammars for the expression-based variants.

use super::grammar::Grammar;

impl Grammar {
    /// Plain arithmetic over `x` and `y`, start symbol `<expr>`.
    pub fn math_expression() -> Self {
        Self::from_rules([
            (
                "<expr>",
                vec![
                    vec!["<expr>", "<op>", "<expr>"],
                    vec!["<func>", "(", "<expr>", ")"],
                    vec!["<var>"],
                    vec!["<const>"],
                ],
            ),
            ("<op>", vec![vec!["+"], vec!["-"], vec!["*"], vec!["/"]]),
            (
                "<func>",
                vec![
                    vec!["sin"],
                    vec!["cos"],
                    vec!["exp"],
                    vec!["log"],
                    vec!["sqrt"],
                    vec!["abs"],
                ],
            ),
            ("<var>", vec![vec!["x"], vec!["y"]]),
            (
                "<const>",
                vec![
                    vec!["0.1"],
                    vec!["0.5"],
                    vec!["1.0"],
                    vec!["2.0"],
                    vec!["-1.0"],
                    vec!["3.14159"],
                ],
            ),
        ])
    }

    /// Planar image patterns, start symbol `<pattern>`.
    pub fn image_pattern() -> Self {
        Self::from_rules([
            ("<pattern>", vec![vec!["<expr>"]]),
            (
                "<expr>",
                vec![
                    vec!["<expr>", "<op>", "<expr>"],
                    vec!["<func>", "(", "<expr>", ")"],
                    vec!["ifpos", "(", "<expr>", ",", "<expr>", ",", "<expr>", ")"],
                    vec!["<var>"],
                    vec!["<const>"],
                ],
            ),
            (
                "<op>",
                vec![vec!["+"], vec!["-"], vec!["*"], vec!["/"], vec!["%"]],
            ),
            (
                "<func>",
                vec![
                    vec!["sin"],
                    vec!["cos"],
                    vec!["tan"],
                    vec!["exp"],
                    vec!["log"],
                    vec!["sqrt"],
                    vec!["abs"],
                    vec!["floor"],
                    vec!["ceil"],
                ],
            ),
            (
                "<var>",
                vec![
                    vec!["x"],
                    vec!["y"],
                    vec!["r"],
                    vec!["theta"],
                    vec!["(x+y)"],
                    vec!["(x-y)"],
                    vec!["(x*y)"],
                ],
            ),
            (
                "<const>",
                vec![
                    vec!["0.1"],
                    vec!["0.5"],
                    vec!["1.0"],
                    vec!["2.0"],
                    vec!["3.0"],
                    vec!["-1.0"],
                    vec!["-0.5"],
                    vec!["3.14159"],
                    vec!["6.28318"],
                ],
            ),
        ])
    }

    /// Polar radius curves `r(t)`, start symbol `<polar>`.
    pub fn polar_drawing() -> Self {
        Self::from_rules([
            ("<polar>", vec![vec!["<expr>"]]),
            (
                "<expr>",
                vec![
                    vec!["<expr>", "<op>", "<expr>"],
                    vec!["<func>", "(", "<expr>", ")"],
                    vec!["<var>"],
                    vec!["<const>"],
                ],
            ),
            ("<op>", vec![vec!["+"], vec!["-"], vec!["*"], vec!["/"]]),
            (
                "<func>",
                vec![
                    vec!["sin"],
                    vec!["cos"],
                    vec!["tan"],
                    vec!["exp"],
                    vec!["log"],
                    vec!["sqrt"],
                    vec!["abs"],
                ],
            ),
            (
                "<var>",
                vec![
                    vec!["t"],
                    vec!["(t*2)"],
                    vec!["(t/2)"],
                    vec!["(t*3)"],
                    vec!["(t/3)"],
                ],
            ),
            (
                "<const>",
                vec![
                    vec!["1.0"],
                    vec!["2.0"],
                    vec!["3.0"],
                    vec!["0.5"],
                    vec!["0.1"],
                    vec!["5.0"],
                    vec!["10.0"],
                    vec!["3.14159"],
                    vec!["6.28318"],
                ],
            ),
        ])
    }
}
