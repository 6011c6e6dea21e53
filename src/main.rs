use anyhow::Context;
use evoart::config::{AppConfig, ConfigManager, VariantKind};
use evoart::engines::evolution::EvolutionaryAlgorithm;
use evoart::individuals::{
    BinaryPatternIndividual, ExpressionSpec, Individual, PatternIndividual, RadiusIndividual,
    SuperFormulaIndividual, TreePatternIndividual,
};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::Arc;

const DEFAULT_GENERATIONS: usize = 5;
/// How many individuals the automatic rater picks each round.
const PICKS: usize = 3;

/// Headless session: rates every generation automatically and logs the result.
///
/// Usage: `evoart [config.toml] [generations]`
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let manager = ConfigManager::new();
    if let Some(path) = args.next() {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading configuration from {}", path))?;
    }
    let generations = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid generation count '{}'", raw))?,
        None => DEFAULT_GENERATIONS,
    };

    let config = manager.get();
    log::info!("Running {:?} variant for {} generations", config.variant, generations);

    match config.variant {
        VariantKind::Pattern => {
            let spec = Arc::new(ExpressionSpec::pattern(config.pattern.clone()));
            let spawn =
                move |rng: &mut dyn RngCore| PatternIndividual::random(Arc::clone(&spec), rng);
            run(&config, generations, spawn, |i| i.phenotype())
        }
        VariantKind::Radius => {
            let spec = Arc::new(ExpressionSpec::radius(config.radius.clone()));
            let spawn =
                move |rng: &mut dyn RngCore| RadiusIndividual::random(Arc::clone(&spec), rng);
            run(&config, generations, spawn, |i| i.phenotype())
        }
        VariantKind::Tree => {
            let tree = Arc::new(config.tree.clone());
            let spawn =
                move |rng: &mut dyn RngCore| TreePatternIndividual::random(Arc::clone(&tree), rng);
            run(&config, generations, spawn, |i| i.phenotype().to_string())
        }
        VariantKind::Binary => run(&config, generations, BinaryPatternIndividual::random, |i| {
            format!("{} cells on", i.ones())
        }),
        VariantKind::SuperFormula => {
            run(&config, generations, SuperFormulaIndividual::random, |i| {
                i.phenotype().to_string()
            })
        }
    }
}

fn run<I, S, D>(config: &AppConfig, generations: usize, spawn: S, describe: D) -> anyhow::Result<()>
where
    I: Individual + 'static,
    S: Fn(&mut dyn RngCore) -> I + 'static,
    D: Fn(&I) -> String,
{
    let mut algorithm = EvolutionaryAlgorithm::new(config.evolution.clone(), spawn)?;
    let mut rater = match config.evolution.seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
        None => StdRng::from_entropy(),
    };

    for _ in 0..generations {
        let picks = rate(&algorithm, &mut rater);
        for (rank, id) in picks.iter().enumerate() {
            // the favourite gets an extra point
            let points = if rank == 0 { 2 } else { 1 };
            for _ in 0..points {
                algorithm.increment_fitness(*id);
            }
        }

        if let Some(best) = picks.first().and_then(|id| algorithm.get(*id)) {
            log::info!(
                "Generation {}: favourite {} = {}",
                algorithm.generation(),
                best.id(),
                describe(best)
            );
        }
        log::info!(
            "Generation {}: average fitness {:.2}",
            algorithm.generation(),
            algorithm.average_fitness()
        );

        algorithm.evolve()?;
    }

    let kept = algorithm.population().len();
    println!(
        "Finished at generation {} with {} individuals ({} snapshots in history)",
        algorithm.generation(),
        kept,
        algorithm.history().len()
    );
    for individual in algorithm.population().iter().take(PICKS) {
        println!("  {} {}", individual.id(), describe(individual));
    }
    Ok(())
}

/// Favour high-contrast images; non-visual variants are picked at random.
fn rate<I: Individual>(
    algorithm: &EvolutionaryAlgorithm<I>,
    rng: &mut StdRng,
) -> Vec<evoart::IndividualId> {
    let mut scored: Vec<(f64, evoart::IndividualId)> = algorithm
        .population()
        .iter()
        .map(|individual| {
            let score = match individual.as_visual() {
                Some(visual) => contrast(&visual.intensity_field(16, 16)),
                None => rng.gen(),
            };
            (score, individual.id())
        })
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let picks = PICKS.max(algorithm.config().min_selected);
    scored.into_iter().take(picks).map(|(_, id)| id).collect()
}

fn contrast(field: &[f64]) -> f64 {
    if field.is_empty() {
        return 0.0;
    }
    let mean = field.iter().sum::<f64>() / field.len() as f64;
    field.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / field.len() as f64
}
