/// Linear genome for grammatical evolution.
///
/// Each codon (0..=255) selects a production when the grammar is expanded:
/// `production = codon % alternatives`. The genome is read cyclically, so any
/// non-empty genome maps to a complete expression.
///
/// ```
/// use evoart::engines::grammar::{DerivationLimits, Grammar};
///
/// let genome: evoart::engines::generation::ByteGenome = vec![1, 1, 0];
/// let grammar = Grammar::from_rules([("<S>", vec![vec!["a"], vec!["b", "<S>"]])]);
/// let derivation = grammar.derive("<S>", &genome, DerivationLimits::default());
/// assert_eq!(derivation.to_expression(), "bba");
/// ```
pub type ByteGenome = Vec<u8>;
