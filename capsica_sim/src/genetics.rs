// The breeding engine: genes, chromosomes, fitness, and the generational
// genetic-algorithm session.
//
// A `Gene` is a 128-bit vector (two u64 halves); the strength of a heritable
// trait is simply the number of set bits. A `Chromosome` bundles the four
// trait genes. Plant attributes derive from popcounts (see `plants.rs`);
// this module owns the recombination machinery:
//
// - `Gene::cross` — single-point crossover. The point masks each half into a
//   retained high segment (from self) and a replaced low segment (from the
//   other parent), independently for both halves.
// - `Gene::mutate` — toggles one bit index in BOTH halves. Applying the same
//   mutation twice restores the original gene.
// - `FitnessWeights` — the player-tunable four-way weighting. Setting one
//   weight renormalizes the remaining three proportionally to their prior
//   sizes so the vector always sums to 1.
// - `GeneticComputationState` — one breeding session: a bounded population
//   of candidates ordered by `(fitness, id)`, an elitist generation tick
//   (cross the two fittest both ways, maybe-mutate the children, reinsert
//   all four, evict the least fit), and progress measured against a fixed
//   10%-improvement target captured at session start.
//
// See also: `plants.rs` for attribute derivation, `naming.rs` for the
// display name a finalized candidate receives, `state.rs` for the catalyst
// burn and finalization flow.
//
// **Critical constraint: determinism.** The session owns its own `GameRng`
// (serialized with it) and keeps its population in a sorted `Vec` with the
// candidate id as tie-breaker — a restored save breeds the exact same
// pepper the interrupted session would have.

use crate::types::PlantTypeId;
use capsica_prng::GameRng;
use serde::{Deserialize, Serialize};

/// Bits per gene half.
pub const GENE_HALF_BITS: u32 = 64;
/// Bits per gene (two u64 halves).
pub const GENE_BITS: u32 = 2 * GENE_HALF_BITS;
/// Bits per chromosome (four genes).
pub const CHROMOSOME_BITS: u32 = 4 * GENE_BITS;

// ---------------------------------------------------------------------------
// Traits and genes
// ---------------------------------------------------------------------------

/// The four heritable traits, in chromosome order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GeneticTrait {
    Yield,
    Size,
    Potency,
    GrowthSpeed,
}

impl GeneticTrait {
    pub const ALL: [GeneticTrait; 4] = [
        GeneticTrait::Yield,
        GeneticTrait::Size,
        GeneticTrait::Potency,
        GeneticTrait::GrowthSpeed,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            GeneticTrait::Yield => "Yield",
            GeneticTrait::Size => "Size",
            GeneticTrait::Potency => "Spice",
            GeneticTrait::GrowthSpeed => "Speed",
        }
    }
}

/// A 128-bit trait vector. Trait strength = number of set bits.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Gene {
    pub lo: u64,
    pub hi: u64,
}

impl Gene {
    pub const EMPTY: Gene = Gene { lo: 0, hi: 0 };

    /// A gene with exactly `count` set bits, scattered uniformly across the
    /// 128 positions by a partial Fisher-Yates shuffle.
    ///
    /// Panics if `count > 128`.
    pub fn with_one_bits(count: u32, rng: &mut GameRng) -> Gene {
        assert!(count <= GENE_BITS, "with_one_bits: count exceeds gene width");
        let mut positions: [u8; GENE_BITS as usize] = std::array::from_fn(|i| i as u8);
        let mut gene = Gene::EMPTY;
        for i in 0..count {
            let j = rng.range_u32(i, GENE_BITS);
            positions.swap(i as usize, j as usize);
            let bit = positions[i as usize] as u32;
            if bit < GENE_HALF_BITS {
                gene.lo |= 1 << bit;
            } else {
                gene.hi |= 1 << (bit - GENE_HALF_BITS);
            }
        }
        gene
    }

    pub fn popcount(self) -> u32 {
        self.lo.count_ones() + self.hi.count_ones()
    }

    /// Toggle bit `bit` in both halves. Involution: mutating twice at the
    /// same index restores the original gene.
    ///
    /// Panics if `bit >= 64` in debug builds.
    pub fn mutate(self, bit: u32) -> Gene {
        debug_assert!(bit < GENE_HALF_BITS, "mutate: bit index out of range");
        let mask = 1u64 << bit;
        Gene {
            lo: self.lo ^ mask,
            hi: self.hi ^ mask,
        }
    }

    /// Single-point crossover: keep this gene's bits at positions >= `point`
    /// and take the other parent's bits below it, independently per half.
    /// `point == 0` reproduces `self`; `point == 64` reproduces `other`.
    pub fn cross(self, other: Gene, point: u32) -> Gene {
        debug_assert!(point <= GENE_HALF_BITS, "cross: point out of range");
        let retained = (!0u64).checked_shl(point).unwrap_or(0);
        Gene {
            lo: (self.lo & retained) | (other.lo & !retained),
            hi: (self.hi & retained) | (other.hi & !retained),
        }
    }
}

// ---------------------------------------------------------------------------
// Chromosome
// ---------------------------------------------------------------------------

/// The four named genes defining a plant type's heritable traits.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Chromosome {
    pub yield_gene: Gene,
    pub size: Gene,
    pub potency: Gene,
    pub growth: Gene,
}

impl Chromosome {
    pub const EMPTY: Chromosome = Chromosome {
        yield_gene: Gene::EMPTY,
        size: Gene::EMPTY,
        potency: Gene::EMPTY,
        growth: Gene::EMPTY,
    };

    pub fn gene(&self, trait_: GeneticTrait) -> Gene {
        match trait_ {
            GeneticTrait::Yield => self.yield_gene,
            GeneticTrait::Size => self.size,
            GeneticTrait::Potency => self.potency,
            GeneticTrait::GrowthSpeed => self.growth,
        }
    }

    pub fn total_popcount(&self) -> u32 {
        GeneticTrait::ALL
            .iter()
            .map(|t| self.gene(*t).popcount())
            .sum()
    }

    /// Weighted sum of trait strengths under the given weights.
    pub fn fitness(&self, weights: &FitnessWeights) -> f32 {
        GeneticTrait::ALL
            .iter()
            .map(|t| self.gene(*t).popcount() as f32 * weights.get(*t))
            .sum()
    }

    /// Toggle one bit: the gene is chosen by `point % 4`, the bit index
    /// within both halves is `point` itself.
    pub fn mutate(&self, point: u32) -> Chromosome {
        debug_assert!(point < GENE_HALF_BITS, "mutate: point out of range");
        let mut out = *self;
        match point % 4 {
            0 => out.yield_gene = out.yield_gene.mutate(point),
            1 => out.size = out.size.mutate(point),
            2 => out.potency = out.potency.mutate(point),
            _ => out.growth = out.growth.mutate(point),
        }
        out
    }

    /// Cross all four genes against `right` at the same point.
    pub fn cross(&self, right: &Chromosome, point: u32) -> Chromosome {
        Chromosome {
            yield_gene: self.yield_gene.cross(right.yield_gene, point),
            size: self.size.cross(right.size, point),
            potency: self.potency.cross(right.potency, point),
            growth: self.growth.cross(right.growth, point),
        }
    }
}

// ---------------------------------------------------------------------------
// Fitness weights
// ---------------------------------------------------------------------------

/// Player-tunable weighting of the four traits. Non-negative, sums to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    yield_weight: f32,
    size: f32,
    potency: f32,
    growth_speed: f32,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            yield_weight: 0.25,
            size: 0.25,
            potency: 0.25,
            growth_speed: 0.25,
        }
    }
}

impl FitnessWeights {
    pub fn get(&self, trait_: GeneticTrait) -> f32 {
        match trait_ {
            GeneticTrait::Yield => self.yield_weight,
            GeneticTrait::Size => self.size,
            GeneticTrait::Potency => self.potency,
            GeneticTrait::GrowthSpeed => self.growth_speed,
        }
    }

    pub fn sum(&self) -> f32 {
        self.yield_weight + self.size + self.potency + self.growth_speed
    }

    /// Set one weight and renormalize the other three proportionally to
    /// their previous relative sizes so the vector sums to 1 again. When
    /// the other three previously summed to zero, the remainder is split
    /// uniformly among them.
    pub fn set(&self, trait_: GeneticTrait, value: f32) -> FitnessWeights {
        let value = value.clamp(0.0, 1.0);
        let remainder = 1.0 - value;
        let others_sum: f32 = GeneticTrait::ALL
            .iter()
            .filter(|t| **t != trait_)
            .map(|t| self.get(*t))
            .sum();

        let rescale = |prior: f32| {
            if others_sum == 0.0 {
                remainder / (GeneticTrait::ALL.len() - 1) as f32
            } else {
                prior / others_sum * remainder
            }
        };

        let mut out = *self;
        for t in GeneticTrait::ALL {
            let new = if t == trait_ { value } else { rescale(self.get(t)) };
            match t {
                GeneticTrait::Yield => out.yield_weight = new,
                GeneticTrait::Size => out.size = new,
                GeneticTrait::Potency => out.potency = new,
                GeneticTrait::GrowthSpeed => out.growth_speed = new,
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Breeding session
// ---------------------------------------------------------------------------

/// One candidate offspring in a breeding session. Fitness is cached at
/// insertion — the weights are frozen for the whole session, so the cached
/// value never goes stale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: PlantTypeId,
    pub chromosome: Chromosome,
    pub fitness: f32,
}

/// A breeding session: parent selection, the candidate population, and the
/// generational state. Created idle; `activate` seeds the population and
/// locks the weights; `finalize` hands back the winner and resets to idle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneticComputationState {
    pub left_parent: PlantTypeId,
    pub right_parent: PlantTypeId,
    pub is_active: bool,
    /// Set on the first activation and cleared only by reset/finalize.
    /// While true, the fitness weights cannot change.
    pub was_started: bool,
    pub generation: u64,
    weights: FitnessWeights,
    /// Ascending by `(fitness, id)` — the fittest candidate is last.
    population: Vec<Candidate>,
    /// Average parent fitness, captured at session start.
    baseline_fitness: f32,
    /// `baseline * (1 + improvement_margin)`, captured at session start.
    target_fitness: f32,
    rng: GameRng,
}

impl GeneticComputationState {
    pub fn new(left_parent: PlantTypeId, right_parent: PlantTypeId, rng: GameRng) -> Self {
        Self {
            left_parent,
            right_parent,
            is_active: false,
            was_started: false,
            generation: 0,
            weights: FitnessWeights::default(),
            population: Vec::new(),
            baseline_fitness: 0.0,
            target_fitness: 0.0,
            rng,
        }
    }

    pub fn weights(&self) -> &FitnessWeights {
        &self.weights
    }

    pub fn population(&self) -> &[Candidate] {
        &self.population
    }

    pub fn best(&self) -> Option<&Candidate> {
        self.population.last()
    }

    /// Change one fitness weight. Ignored once the session has started —
    /// the weights are part of the frozen session setup.
    pub fn set_weight(&mut self, trait_: GeneticTrait, value: f32) {
        if self.was_started {
            return;
        }
        self.weights = self.weights.set(trait_, value);
    }

    /// Change a parent selection. Ignored once the session has started.
    pub fn set_left_parent(&mut self, id: PlantTypeId) {
        if !self.was_started {
            self.left_parent = id;
        }
    }

    pub fn set_right_parent(&mut self, id: PlantTypeId) {
        if !self.was_started {
            self.right_parent = id;
        }
    }

    /// Start or resume the session. The first activation locks the weights,
    /// fixes the improvement target from the parents' average fitness, and
    /// seeds the population by repeated crossover of the parents at random
    /// points until `population_size` candidates exist.
    pub fn activate(
        &mut self,
        left: &Chromosome,
        right: &Chromosome,
        population_size: usize,
        improvement_margin: f32,
    ) {
        if !self.was_started {
            self.was_started = true;
            self.generation = 0;
            let parent_average =
                (left.fitness(&self.weights) + right.fitness(&self.weights)) / 2.0;
            self.baseline_fitness = parent_average;
            self.target_fitness = parent_average * (1.0 + improvement_margin);
            self.population.clear();
            while self.population.len() < population_size {
                let point = self.rng.range_u32(0, GENE_HALF_BITS);
                let chromosome = left.cross(right, point);
                let candidate = self.make_candidate(chromosome);
                self.insert(candidate);
            }
        }
        self.is_active = true;
    }

    pub fn pause(&mut self) {
        self.is_active = false;
    }

    /// Advance `n` generations. Each generation pops the two fittest
    /// candidates, crosses them both ways at a fresh random point, gives
    /// each child an independent mutation roll, reinserts all four, and
    /// evicts the least fit back down to `population_size`.
    ///
    /// No-op before the first activation.
    pub fn tick_generations(&mut self, n: u64, population_size: usize, mutation_chance: f32) {
        if !self.was_started || self.population.len() < 2 {
            return;
        }
        for _ in 0..n {
            let (Some(fittest), Some(second)) = (self.population.pop(), self.population.pop())
            else {
                break;
            };

            let point = self.rng.range_u32(0, GENE_HALF_BITS);
            let child_a = fittest.chromosome.cross(&second.chromosome, point);
            let child_a = self.maybe_mutate(child_a, mutation_chance);
            let child_b = second.chromosome.cross(&fittest.chromosome, point);
            let child_b = self.maybe_mutate(child_b, mutation_chance);

            let child_a = self.make_candidate(child_a);
            let child_b = self.make_candidate(child_b);
            self.insert(fittest);
            self.insert(second);
            self.insert(child_a);
            self.insert(child_b);
            while self.population.len() > population_size {
                self.population.remove(0);
            }
            self.generation += 1;
        }
    }

    /// Progress toward the improvement target, clamped to `[0, 100]`.
    ///
    /// Monotone over generation ticks: the best candidate is never evicted,
    /// so its fitness — and therefore this ratio — can only rise.
    pub fn progress(&self) -> f32 {
        if !self.was_started {
            return 0.0;
        }
        let Some(best) = self.population.last() else {
            return 0.0;
        };
        let margin = self.target_fitness - self.baseline_fitness;
        if margin <= 0.0 {
            // Degenerate session: the parents score zero under the chosen
            // weights, so any candidate at or above target is done.
            return if best.fitness >= self.target_fitness {
                100.0
            } else {
                0.0
            };
        }
        ((best.fitness - self.baseline_fitness) / margin * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.was_started && self.progress() >= 100.0
    }

    /// Take the winning candidate and reset the session to idle. Parent
    /// selections and weight values survive; the weights unfreeze.
    pub fn finalize(&mut self) -> Option<Candidate> {
        let winner = self.population.pop()?;
        self.reset();
        Some(winner)
    }

    /// Abandon the session: clear the population and generation counter,
    /// unfreeze the weights, keep the parent selections.
    pub fn reset(&mut self) {
        self.population.clear();
        self.generation = 0;
        self.was_started = false;
        self.is_active = false;
        self.baseline_fitness = 0.0;
        self.target_fitness = 0.0;
    }

    fn make_candidate(&mut self, chromosome: Chromosome) -> Candidate {
        Candidate {
            id: PlantTypeId::mint(&mut self.rng),
            fitness: chromosome.fitness(&self.weights),
            chromosome,
        }
    }

    fn maybe_mutate(&mut self, chromosome: Chromosome, mutation_chance: f32) -> Chromosome {
        if self.rng.chance(mutation_chance) {
            chromosome.mutate(self.rng.range_u32(0, GENE_HALF_BITS))
        } else {
            chromosome
        }
    }

    fn insert(&mut self, candidate: Candidate) {
        let idx = self
            .population
            .binary_search_by(|c| {
                c.fitness
                    .total_cmp(&candidate.fitness)
                    .then(c.id.cmp(&candidate.id))
            })
            .unwrap_or_else(|i| i);
        self.population.insert(idx, candidate);
    }
}
