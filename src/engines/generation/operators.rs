use rand::{Rng, RngCore};

/// Tournament selection: best of `tournament_size` random draws (with
/// replacement). The first of equally fit candidates wins.
///
/// Returns an index into `candidates`, `None` if it is empty.
pub fn tournament_selection<T, F>(
    candidates: &[T],
    tournament_size: usize,
    fitness: F,
    rng: &mut dyn RngCore,
) -> Option<usize>
where
    F: Fn(&T) -> u32,
{
    if candidates.is_empty() {
        return None;
    }

    let mut best_idx = rng.gen_range(0..candidates.len());
    let mut best_fitness = fitness(&candidates[best_idx]);

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..candidates.len());
        let candidate_fitness = fitness(&candidates[idx]);
        if candidate_fitness > best_fitness {
            best_idx = idx;
            best_fitness = candidate_fitness;
        }
    }

    Some(best_idx)
}

/// Uniform crossover: each position comes from either parent with equal chance.
///
/// Children take `parent1`'s length; positions `parent2` lacks are filled
/// with random codons below `gene_max`.
pub fn uniform_crossover(
    parent1: &[u8],
    parent2: &[u8],
    gene_max: u32,
    rng: &mut dyn RngCore,
) -> (Vec<u8>, Vec<u8>) {
    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent1.len());

    for (i, &own) in parent1.iter().enumerate() {
        let other = match parent2.get(i) {
            Some(&gene) => gene,
            None => random_gene(gene_max, rng),
        };
        if rng.gen::<f64>() < 0.5 {
            child1.push(own);
            child2.push(other);
        } else {
            child1.push(other);
            child2.push(own);
        }
    }

    (child1, child2)
}

/// Single-point crossover: swap genome tails after a random cut.
pub fn single_point_crossover(
    parent1: &[u8],
    parent2: &[u8],
    rng: &mut dyn RngCore,
) -> (Vec<u8>, Vec<u8>) {
    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let point = rng.gen_range(1..len);

    let mut child1 = parent1.to_vec();
    let mut child2 = parent2.to_vec();

    child1[point..len].copy_from_slice(&parent2[point..len]);
    child2[point..len].copy_from_slice(&parent1[point..len]);

    (child1, child2)
}

/// Replace each codon with a fresh random one with probability `mutation_rate`.
pub fn mutate(genome: &mut [u8], mutation_rate: f64, gene_max: u32, rng: &mut dyn RngCore) {
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *gene = random_gene(gene_max, rng);
        }
    }
}

/// Flip 0/1 genes with probability `mutation_rate`.
pub fn flip_bits(genome: &mut [u8], mutation_rate: f64, rng: &mut dyn RngCore) {
    for gene in genome.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            *gene = if *gene == 1 { 0 } else { 1 };
        }
    }
}

/// Generate random genome
pub fn random_genome(length: usize, gene_max: u32, rng: &mut dyn RngCore) -> Vec<u8> {
    (0..length).map(|_| random_gene(gene_max, rng)).collect()
}

fn random_gene(gene_max: u32, rng: &mut dyn RngCore) -> u8 {
    rng.gen_range(0..gene_max.clamp(1, 256)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tournament_prefers_fitter() {
        let mut rng = StdRng::seed_from_u64(9);
        let fitness = [0u32, 0, 5, 0];
        let mut wins = 0;
        for _ in 0..200 {
            let idx = tournament_selection(&fitness, 3, |f| *f, &mut rng).unwrap();
            if idx == 2 {
                wins += 1;
            }
        }
        // P(candidate drawn at least once in 3) = 1 - (3/4)^3 ≈ 0.58
        assert!(wins > 80, "wins = {}", wins);
    }

    #[test]
    fn test_tournament_ties_keep_first_draw() {
        let mut rng = StdRng::seed_from_u64(10);
        let fitness = [4u32; 5];
        let mut replay = StdRng::seed_from_u64(10);
        let first_draw = replay.gen_range(0..5);
        assert_eq!(tournament_selection(&fitness, 3, |f| *f, &mut rng), Some(first_draw));
    }

    #[test]
    fn test_tournament_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let empty: [u32; 0] = [];
        assert_eq!(tournament_selection(&empty, 3, |f| *f, &mut rng), None);
    }

    #[test]
    fn test_uniform_crossover_mixes_positions() {
        let mut rng = StdRng::seed_from_u64(12);
        let a = vec![1u8; 64];
        let b = vec![2u8; 64];
        let (c1, c2) = uniform_crossover(&a, &b, 256, &mut rng);
        assert_eq!(c1.len(), 64);
        assert_eq!(c2.len(), 64);
        for i in 0..64 {
            assert_ne!(c1[i], c2[i]);
        }
        assert!(c1.contains(&1) && c1.contains(&2));
    }

    #[test]
    fn test_uniform_crossover_keeps_zero_genes() {
        let mut rng = StdRng::seed_from_u64(13);
        let a = vec![0u8; 16];
        let b = vec![0u8; 16];
        let (c1, c2) = uniform_crossover(&a, &b, 256, &mut rng);
        assert!(c1.iter().chain(c2.iter()).all(|g| *g == 0));
    }

    #[test]
    fn test_uniform_crossover_fills_short_partner() {
        let mut rng = StdRng::seed_from_u64(14);
        let (c1, c2) = uniform_crossover(&[5; 10], &[6; 4], 8, &mut rng);
        assert_eq!(c1.len(), 10);
        assert_eq!(c2.len(), 10);
        assert!(c1.iter().chain(c2.iter()).all(|g| *g == 5 || *g < 8));
    }

    #[test]
    fn test_single_point_crossover_swaps_tails() {
        let mut rng = StdRng::seed_from_u64(15);
        let (c1, c2) = single_point_crossover(&[1, 1, 1, 1], &[2, 2, 2, 2], &mut rng);
        assert_eq!(c1[0], 1);
        assert_eq!(c2[0], 2);
        assert_eq!(c1[3], 2);
        assert_eq!(c2[3], 1);
    }

    #[test]
    fn test_mutation_bounds() {
        let mut rng = StdRng::seed_from_u64(16);
        let mut genome = vec![0u8; 100];
        mutate(&mut genome, 1.0, 4, &mut rng);
        assert!(genome.iter().all(|g| *g < 4));

        let mut bits = vec![0u8, 1, 0, 1];
        flip_bits(&mut bits, 1.0, &mut rng);
        assert_eq!(bits, vec![1, 0, 1, 0]);
    }
}
