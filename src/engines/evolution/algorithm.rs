use super::history::{GenerationHistory, GenerationSnapshot};
use crate::config::traits::ConfigSection;
use crate::config::EvolutionConfig;
use crate::engines::generation::operators::tournament_selection;
use crate::error::{EvoartError, Result};
use crate::individuals::{Individual, MidiSink};
use crate::types::IndividualId;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;

/// Creates one random individual of the population's variant.
pub type Spawner<I> = Box<dyn Fn(&mut dyn RngCore) -> I>;

/// Notified after every recorded generation (evolve, reset).
pub trait GenerationObserver {
    fn on_generation_recorded(&mut self, generation: usize, average_fitness: f64);
}

/// Interactive generational loop: the user rates individuals, marks them
/// selected, and asks for the next generation.
///
/// Every operation runs to completion under `&mut self`, so a half-built
/// generation is never observable.
pub struct EvolutionaryAlgorithm<I: Individual> {
    config: EvolutionConfig,
    spawn: Spawner<I>,
    population: Vec<I>,
    /// Selected ids in the order they were selected.
    selected: Vec<IndividualId>,
    generation: usize,
    history: GenerationHistory<I>,
    midi_output: Option<Arc<dyn MidiSink>>,
    observer: Option<Box<dyn GenerationObserver>>,
    rng: StdRng,
}

impl<I: Individual> EvolutionaryAlgorithm<I> {
    /// Validate `config`, build a random population and record it as generation 0.
    pub fn new<F>(config: EvolutionConfig, spawn: F) -> Result<Self>
    where
        F: Fn(&mut dyn RngCore) -> I + 'static,
    {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut algorithm = Self {
            config,
            spawn: Box::new(spawn),
            population: Vec::new(),
            selected: Vec::new(),
            generation: 0,
            history: GenerationHistory::new(),
            midi_output: None,
            observer: None,
            rng,
        };
        algorithm.initialize_population();
        algorithm.save_generation();

        log::info!(
            "Evolution started with {} individuals",
            algorithm.population.len()
        );
        Ok(algorithm)
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn population(&self) -> &[I] {
        &self.population
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn history(&self) -> &GenerationHistory<I> {
        &self.history
    }

    pub fn selected_ids(&self) -> &[IndividualId] {
        &self.selected
    }

    /// Selected individuals of the live population, in selection order.
    pub fn selected(&self) -> Vec<&I> {
        self.selected.iter().filter_map(|id| self.get(*id)).collect()
    }

    pub fn get(&self, id: IndividualId) -> Option<&I> {
        self.population.iter().find(|i| i.id() == id)
    }

    pub fn get_mut(&mut self, id: IndividualId) -> Option<&mut I> {
        self.population.iter_mut().find(|i| i.id() == id)
    }

    pub fn set_observer(&mut self, observer: Box<dyn GenerationObserver>) {
        self.observer = Some(observer);
    }

    /// Hand the MIDI sink to every current and future individual that plays audio.
    pub fn set_midi_output(&mut self, output: Arc<dyn MidiSink>) {
        for individual in self.population.iter_mut() {
            if let Some(player) = individual.as_playback() {
                player.set_midi_output(Arc::clone(&output));
            }
        }
        self.midi_output = Some(output);
    }

    /// Add one point. The first point marks the individual as selected.
    ///
    /// Returns the new fitness, or `None` for an id outside the population.
    pub fn increment_fitness(&mut self, id: IndividualId) -> Option<u32> {
        let individual = self.population.iter_mut().find(|i| i.id() == id)?;
        let state = individual.state_mut();
        state.fitness = state.fitness.saturating_add(1);

        if state.fitness > 0 && !state.selected {
            state.selected = true;
            self.selected.push(id);
            log::debug!("Selected {}", id);
        }
        Some(state.fitness)
    }

    /// Remove one point, never going below zero. Reaching zero deselects.
    pub fn decrement_fitness(&mut self, id: IndividualId) -> Option<u32> {
        let individual = self.population.iter_mut().find(|i| i.id() == id)?;
        let state = individual.state_mut();
        state.fitness = state.fitness.saturating_sub(1);

        if state.fitness == 0 && state.selected {
            state.selected = false;
            self.selected.retain(|s| *s != id);
            log::debug!("Deselected {}", id);
        }
        Some(state.fitness)
    }

    /// Replace the population with the offspring of the selected individuals.
    ///
    /// Fails with [`EvoartError::InsufficientSelection`] and leaves everything
    /// untouched when fewer than `min_selected` individuals are selected.
    pub fn evolve(&mut self) -> Result<()> {
        let pool: Vec<I> = self.selected().into_iter().cloned().collect();
        if pool.len() < self.config.min_selected {
            log::warn!(
                "Evolve rejected: {} selected, {} required",
                pool.len(),
                self.config.min_selected
            );
            return Err(EvoartError::InsufficientSelection {
                required: self.config.min_selected,
                actual: pool.len(),
            });
        }

        self.stop_playback();

        let target = self.config.population_size;
        let mut next: Vec<I> = Vec::with_capacity(target);

        for elite in pool.iter().take(self.config.elite_count.min(target)) {
            let mut elite = elite.clone();
            elite.state_mut().selected = false;
            next.push(elite);
        }

        while next.len() < target {
            let (Some(first), Some(second)) = (self.tournament(&pool), self.tournament(&pool))
            else {
                break;
            };

            let (mut child1, mut child2) = pool[first].crossover(&pool[second], &mut self.rng);
            child1.mutate(self.config.mutation_rate, &mut self.rng);
            child2.mutate(self.config.mutation_rate, &mut self.rng);

            next.push(self.attach(child1));
            if next.len() < target {
                next.push(self.attach(child2));
            }
        }

        self.population = next;
        self.generation += 1;
        self.selected.clear();
        self.save_generation();

        log::info!(
            "Generation {} created from {} selected individuals",
            self.generation,
            pool.len()
        );
        Ok(())
    }

    /// Restore the population and selection recorded at history position `index`.
    pub fn load_generation(&mut self, index: usize) -> Result<()> {
        let snapshot = self
            .history
            .get(index)
            .ok_or(EvoartError::GenerationOutOfRange {
                index,
                available: self.history.len(),
            })?;

        let population = snapshot.population.clone();
        let selected: Vec<IndividualId> = snapshot.selected.iter().map(|i| i.id()).collect();
        let generation = snapshot.generation;

        self.stop_playback();
        self.population = population
            .into_iter()
            .map(|mut individual| {
                let id = individual.id();
                individual.state_mut().selected = selected.contains(&id);
                self.attach(individual)
            })
            .collect();
        self.selected = selected;
        self.generation = generation;

        log::info!("Loaded generation {} from history slot {}", generation, index);
        Ok(())
    }

    /// Start over with a fresh random population as generation 0.
    pub fn reset(&mut self) {
        self.stop_playback();
        self.generation = 0;
        self.history.clear();
        self.selected.clear();
        self.initialize_population();
        self.save_generation();
        log::info!("Evolution reset");
    }

    /// Mean fitness of the live population.
    pub fn average_fitness(&self) -> f64 {
        if self.population.is_empty() {
            return 0.0;
        }
        let total: u64 = self.population.iter().map(|i| u64::from(i.fitness())).sum();
        total as f64 / self.population.len() as f64
    }

    pub fn stop_playback(&mut self) {
        for individual in self.population.iter_mut() {
            if let Some(player) = individual.as_playback() {
                player.stop();
            }
        }
    }

    fn tournament(&mut self, pool: &[I]) -> Option<usize> {
        tournament_selection(
            pool,
            self.config.tournament_size,
            |i: &I| i.fitness(),
            &mut self.rng,
        )
    }

    fn attach(&self, mut individual: I) -> I {
        if let Some(output) = &self.midi_output {
            if let Some(player) = individual.as_playback() {
                player.set_midi_output(Arc::clone(output));
            }
        }
        individual
    }

    fn initialize_population(&mut self) {
        let mut population = Vec::with_capacity(self.config.population_size);
        for _ in 0..self.config.population_size {
            let individual = (self.spawn)(&mut self.rng);
            population.push(self.attach(individual));
        }
        self.population = population;
    }

    fn save_generation(&mut self) {
        let selected: Vec<I> = self.selected().into_iter().cloned().collect();
        let snapshot = GenerationSnapshot::capture(self.generation, &self.population, selected);
        let average = snapshot.average_fitness();
        self.history.push(snapshot);

        if let Some(observer) = self.observer.as_mut() {
            observer.on_generation_recorded(self.generation, average);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::operators::{flip_bits, uniform_crossover};
    use crate::individuals::Playback;
    use crate::types::IndividualState;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone)]
    struct Probe {
        state: IndividualState,
        genome: Vec<u8>,
        stops: Arc<AtomicUsize>,
        has_output: bool,
    }

    impl Probe {
        fn spawner(stops: Arc<AtomicUsize>) -> impl Fn(&mut dyn RngCore) -> Probe {
            move |rng: &mut dyn RngCore| {
                let mut genome = vec![0; 16];
                flip_bits(&mut genome, 0.5, rng);
                Probe {
                    state: IndividualState::new(),
                    genome,
                    stops: Arc::clone(&stops),
                    has_output: false,
                }
            }
        }

        fn child(&self, genome: Vec<u8>) -> Self {
            Probe {
                state: IndividualState::new(),
                genome,
                stops: Arc::clone(&self.stops),
                has_output: false,
            }
        }
    }

    impl Individual for Probe {
        type Genome = Vec<u8>;
        type Phenotype = Vec<u8>;

        fn state(&self) -> &IndividualState {
            &self.state
        }

        fn state_mut(&mut self) -> &mut IndividualState {
            &mut self.state
        }

        fn genome(&self) -> &Vec<u8> {
            &self.genome
        }

        fn phenotype(&self) -> Vec<u8> {
            self.genome.clone()
        }

        fn mutate(&mut self, rate: f64, rng: &mut dyn RngCore) {
            flip_bits(&mut self.genome, rate, rng);
        }

        fn crossover(&self, other: &Self, rng: &mut dyn RngCore) -> (Self, Self) {
            let (a, b) = uniform_crossover(&self.genome, &other.genome, 2, rng);
            (self.child(a), other.child(b))
        }

        fn as_playback(&mut self) -> Option<&mut dyn Playback> {
            Some(self)
        }
    }

    impl Playback for Probe {
        fn set_midi_output(&mut self, _output: Arc<dyn MidiSink>) {
            self.has_output = true;
        }

        fn play(&mut self) {}

        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct NullSink;

    impl MidiSink for NullSink {
        fn send(&self, _bytes: &[u8]) {}
    }

    fn config() -> EvolutionConfig {
        EvolutionConfig {
            population_size: 6,
            seed: Some(7),
            ..EvolutionConfig::default()
        }
    }

    fn algorithm() -> (EvolutionaryAlgorithm<Probe>, Arc<AtomicUsize>) {
        let stops = Arc::new(AtomicUsize::new(0));
        let algorithm = EvolutionaryAlgorithm::new(config(), Probe::spawner(Arc::clone(&stops)))
            .unwrap();
        (algorithm, stops)
    }

    fn ids(algorithm: &EvolutionaryAlgorithm<Probe>) -> Vec<IndividualId> {
        algorithm.population().iter().map(|i| i.id()).collect()
    }

    #[test]
    fn test_new_records_generation_zero() {
        let (algorithm, _) = algorithm();
        assert_eq!(algorithm.population().len(), 6);
        assert_eq!(algorithm.generation(), 0);
        assert_eq!(algorithm.history().len(), 1);
        assert_eq!(algorithm.history().get(0).map(|s| s.generation), Some(0));
        assert!(algorithm.selected_ids().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad = EvolutionConfig {
            population_size: 1,
            ..config()
        };
        let stops = Arc::new(AtomicUsize::new(0));
        let result = EvolutionaryAlgorithm::new(bad, Probe::spawner(stops));
        assert!(matches!(result, Err(EvoartError::Configuration(_))));
    }

    #[test]
    fn test_evolve_requires_two_selected() {
        let (mut algorithm, stops) = algorithm();
        let before = ids(&algorithm);
        algorithm.increment_fitness(before[0]);

        let result = algorithm.evolve();
        assert!(matches!(
            result,
            Err(EvoartError::InsufficientSelection {
                required: 2,
                actual: 1
            })
        ));
        assert_eq!(ids(&algorithm), before);
        assert_eq!(algorithm.generation(), 0);
        assert_eq!(algorithm.history().len(), 1);
        assert_eq!(algorithm.selected_ids(), &[before[0]]);
        assert_eq!(stops.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_evolve_keeps_first_selected_as_elites() {
        let (mut algorithm, stops) = algorithm();
        let before = ids(&algorithm);
        algorithm.increment_fitness(before[4]);
        algorithm.increment_fitness(before[1]);
        algorithm.increment_fitness(before[1]);
        algorithm.increment_fitness(before[2]);

        algorithm.evolve().unwrap();

        let population = algorithm.population();
        assert_eq!(population.len(), 6);
        assert_eq!(population[0].id(), before[4]);
        assert_eq!(population[1].id(), before[1]);
        assert_eq!(population[1].fitness(), 2);
        assert!(population.iter().all(|i| !i.is_selected()));
        assert!(population[2..].iter().all(|i| !before.contains(&i.id())));
        assert!(population[2..].iter().all(|i| i.fitness() == 0));

        assert_eq!(algorithm.generation(), 1);
        assert!(algorithm.selected_ids().is_empty());
        assert_eq!(algorithm.history().len(), 2);
        assert_eq!(stops.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_fitness_round_trip() {
        let (mut algorithm, _) = algorithm();
        let id = ids(&algorithm)[3];

        assert_eq!(algorithm.increment_fitness(id), Some(1));
        assert_eq!(algorithm.increment_fitness(id), Some(2));
        assert_eq!(algorithm.selected_ids(), &[id]);

        assert_eq!(algorithm.decrement_fitness(id), Some(1));
        assert!(algorithm.get(id).map_or(false, |i| i.is_selected()));

        assert_eq!(algorithm.decrement_fitness(id), Some(0));
        assert!(algorithm.selected_ids().is_empty());
        assert!(!algorithm.get(id).map_or(true, |i| i.is_selected()));

        assert_eq!(algorithm.decrement_fitness(id), Some(0));
        assert_eq!(algorithm.increment_fitness(IndividualId::next()), None);
    }

    #[test]
    fn test_selection_order_is_preserved() {
        let (mut algorithm, _) = algorithm();
        let before = ids(&algorithm);
        for index in [5, 0, 3] {
            algorithm.increment_fitness(before[index]);
        }
        let order: Vec<_> = algorithm.selected().iter().map(|i| i.id()).collect();
        assert_eq!(order, vec![before[5], before[0], before[3]]);
    }

    #[test]
    fn test_load_generation_restores_population() {
        let (mut algorithm, _) = algorithm();
        let generation_zero = ids(&algorithm);
        algorithm.increment_fitness(generation_zero[0]);
        algorithm.increment_fitness(generation_zero[1]);
        algorithm.evolve().unwrap();
        let latest = ids(&algorithm);
        algorithm.increment_fitness(latest[3]);

        algorithm.load_generation(0).unwrap();

        assert_eq!(ids(&algorithm), generation_zero);
        assert_eq!(algorithm.generation(), 0);
        assert!(algorithm.selected_ids().is_empty());
        assert!(algorithm.population().iter().all(|i| !i.is_selected()));
        assert!(algorithm.population().iter().all(|i| i.fitness() == 0));
        assert_eq!(algorithm.history().len(), 2);
    }

    #[test]
    fn test_load_generation_out_of_range() {
        let (mut algorithm, _) = algorithm();
        let before = ids(&algorithm);
        let result = algorithm.load_generation(3);
        assert!(matches!(
            result,
            Err(EvoartError::GenerationOutOfRange {
                index: 3,
                available: 1
            })
        ));
        assert_eq!(ids(&algorithm), before);
    }

    #[test]
    fn test_reset_stops_playback_and_clears_history() {
        let (mut algorithm, stops) = algorithm();
        let before = ids(&algorithm);
        algorithm.increment_fitness(before[0]);
        algorithm.increment_fitness(before[1]);
        algorithm.evolve().unwrap();
        let stops_after_evolve = stops.load(Ordering::SeqCst);

        algorithm.reset();

        assert_eq!(stops.load(Ordering::SeqCst), stops_after_evolve + 6);
        assert_eq!(algorithm.generation(), 0);
        assert_eq!(algorithm.history().len(), 1);
        assert!(algorithm.selected_ids().is_empty());
        assert!(ids(&algorithm).iter().all(|id| !before.contains(id)));
    }

    #[test]
    fn test_average_fitness() {
        let (mut algorithm, _) = algorithm();
        let before = ids(&algorithm);
        assert_eq!(algorithm.average_fitness(), 0.0);
        algorithm.increment_fitness(before[0]);
        algorithm.increment_fitness(before[0]);
        algorithm.increment_fitness(before[1]);
        assert_eq!(algorithm.average_fitness(), 0.5);
    }

    #[test]
    fn test_seed_makes_population_reproducible() {
        let (first, _) = algorithm();
        let (second, _) = algorithm();
        let genomes = |a: &EvolutionaryAlgorithm<Probe>| -> Vec<Vec<u8>> {
            a.population().iter().map(|i| i.genome().clone()).collect()
        };
        assert_eq!(genomes(&first), genomes(&second));
    }

    #[test]
    fn test_midi_output_reaches_offspring() {
        let (mut algorithm, _) = algorithm();
        algorithm.set_midi_output(Arc::new(NullSink));
        assert!(algorithm.population().iter().all(|i| i.has_output));

        let before = ids(&algorithm);
        algorithm.increment_fitness(before[0]);
        algorithm.increment_fitness(before[1]);
        algorithm.evolve().unwrap();
        assert!(algorithm.population().iter().all(|i| i.has_output));
    }

    #[test]
    fn test_observer_sees_recorded_generations() {
        struct Recorder(Rc<RefCell<Vec<usize>>>);

        impl GenerationObserver for Recorder {
            fn on_generation_recorded(&mut self, generation: usize, _average: f64) {
                self.0.borrow_mut().push(generation);
            }
        }

        let (mut algorithm, _) = algorithm();
        let seen = Rc::new(RefCell::new(Vec::new()));
        algorithm.set_observer(Box::new(Recorder(Rc::clone(&seen))));

        let before = ids(&algorithm);
        algorithm.increment_fitness(before[0]);
        algorithm.increment_fitness(before[1]);
        algorithm.evolve().unwrap();
        algorithm.reset();

        assert_eq!(*seen.borrow(), vec![1, 0]);
    }
}
