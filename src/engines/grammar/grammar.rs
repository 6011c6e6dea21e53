use super::gene_consumer::GeneConsumer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One alternative on the right-hand side of a rule.
pub type Production = Vec<String>;

/// Caps on a single derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationLimits {
    pub max_derivations: usize,
    /// Limit on the parenthesis nesting estimate, see [`Grammar::estimate_depth`].
    pub max_depth: usize,
}

impl Default for DerivationLimits {
    fn default() -> Self {
        Self {
            max_derivations: 1000,
            max_depth: 15,
        }
    }
}

/// Result of expanding a start symbol against a genome.
///
/// `symbols` never contains a non-terminal.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub symbols: Vec<String>,
    pub steps: usize,
    pub codons_used: usize,
    /// True when leftover non-terminals had to be replaced by defaults.
    pub forced: bool,
}

impl Derivation {
    pub fn to_expression(&self) -> String {
        self.symbols.concat()
    }
}

/// Context-free grammar keyed by `<non-terminal>` symbols.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grammar {
    rules: BTreeMap<String, Vec<Production>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(non-terminal, alternatives)` pairs.
    pub fn from_rules<'a, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, Vec<Vec<&'a str>>)>,
    {
        let mut grammar = Self::new();
        for (non_terminal, productions) in rules {
            grammar.add_rule(non_terminal, productions);
        }
        grammar
    }

    pub fn add_rule(&mut self, non_terminal: &str, productions: Vec<Vec<&str>>) {
        let productions = productions
            .into_iter()
            .map(|p| p.into_iter().map(str::to_string).collect())
            .collect();
        self.rules.insert(non_terminal.to_string(), productions);
    }

    /// Alternatives for `non_terminal`; empty when the grammar has no rule for it.
    pub fn productions(&self, non_terminal: &str) -> &[Production] {
        self.rules
            .get(non_terminal)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_non_terminal(symbol: &str) -> bool {
        symbol.len() >= 2 && symbol.starts_with('<') && symbol.ends_with('>')
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Expand `start` by rewriting the left-most non-terminal until none remain
    /// or a limit is hit.
    ///
    /// Each step picks production `codon % alternatives`, reading the genome
    /// cyclically. Whatever is left unexpanded is replaced by
    /// [`default_terminal`], so the result is always fully terminal.
    pub fn derive(&self, start: &str, genome: &[u8], limits: DerivationLimits) -> Derivation {
        let mut symbols = vec![start.to_string()];
        let mut consumer = GeneConsumer::new(genome);
        let mut steps = 0;
        let mut depth = 0;

        while steps < limits.max_derivations && depth < limits.max_depth {
            let Some(position) = symbols.iter().position(|s| Self::is_non_terminal(s)) else {
                break;
            };

            let productions = self.productions(&symbols[position]);
            let Some(choice) = consumer.choose(productions.len()) else {
                // empty genome or no rule for this symbol
                break;
            };

            let replacement = productions[choice].iter().cloned();
            symbols.splice(position..=position, replacement);

            steps += 1;
            depth = Self::estimate_depth(&symbols);
        }

        let forced = symbols.iter().any(|s| Self::is_non_terminal(s));
        if forced {
            log::debug!(
                "Derivation from {} stopped after {} steps (depth {}), substituting defaults",
                start,
                steps,
                depth
            );
            for symbol in symbols.iter_mut() {
                if Self::is_non_terminal(symbol) {
                    *symbol = default_terminal(symbol).to_string();
                }
            }
        }

        Derivation {
            symbols,
            steps,
            codons_used: consumer.consumed(),
            forced,
        }
    }

    /// Maximum nesting of literal `(` / `)` symbols.
    ///
    /// Purely textual: parentheses embedded inside a longer terminal such as
    /// `(x+y)` are not counted, so this can differ from the real expression depth.
    pub fn estimate_depth(symbols: &[String]) -> usize {
        let mut depth = 0;
        let mut level: usize = 0;

        for symbol in symbols {
            match symbol.as_str() {
                "(" => {
                    level += 1;
                    depth = depth.max(level);
                }
                ")" => level = level.saturating_sub(1),
                _ => {}
            }
        }

        depth
    }
}

/// Terminal used in place of a non-terminal left over after a derivation stops.
pub fn default_terminal(non_terminal: &str) -> &'static str {
    match non_terminal {
        "<op>" => "+",
        "<func>" => "sin",
        "<var>" => "t",
        _ => "1.0",
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grammar Rules:")?;
        for (non_terminal, productions) in &self.rules {
            let alternatives: Vec<String> = productions.iter().map(|p| p.join(" ")).collect();
            writeln!(f, "{} ::= {}", non_terminal, alternatives.join(" | "))?;
        }
        Ok(())
    }
}
