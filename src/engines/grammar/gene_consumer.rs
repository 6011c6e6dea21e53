/// Deterministically consumes codons from a byte genome.
///
/// The genome is read cyclically: once the last codon has been used, reading
/// continues from the start.
pub struct GeneConsumer<'a> {
    genome: &'a [u8],
    position: usize,
    consumed: usize,
}

impl<'a> GeneConsumer<'a> {
    pub fn new(genome: &'a [u8]) -> Self {
        Self {
            genome,
            position: 0,
            consumed: 0,
        }
    }

    /// Consume next codon, `None` only for an empty genome
    pub fn consume(&mut self) -> Option<u8> {
        if self.genome.is_empty() {
            return None;
        }
        if self.position >= self.genome.len() {
            self.position = 0;
        }

        let gene = self.genome[self.position];
        self.position += 1;
        self.consumed += 1;
        Some(gene)
    }

    /// Consume codon and map to choice index
    pub fn choose(&mut self, num_choices: usize) -> Option<usize> {
        if num_choices == 0 {
            return None;
        }
        self.consume().map(|gene| gene as usize % num_choices)
    }

    /// Total codons read, counting wrap-around reuse.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn has_wrapped(&self) -> bool {
        self.consumed > self.genome.len()
    }
}
