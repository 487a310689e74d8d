// Tunable game balance parameters.
//
// Every constant that shapes the economy or the breeding loop lives in
// `GameConfig`, owned by the `GameState` aggregate and persisted with it.
// The engine never reads magic numbers out of module bodies — formulas take
// their coefficients from here, so balance iteration is a data change, not
// a code change. The formula *shapes* are the contract; these defaults are
// just the current tuning.
//
// Catalog data that is per-tier or per-entry (upgrade prices, distillate
// thresholds, starter stats) stays with its enum; this struct holds the
// global knobs.

use serde::{Deserialize, Serialize};

/// One virtual day in engine milliseconds.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Virtual time added to the clock per `Tick` command, in milliseconds.
    pub tick_virtual_millis: i64,
    /// Width of a cost tick — the coarser boundary at which upkeep is
    /// charged and progression rules run. One virtual day.
    pub cost_tick_millis: i64,
    /// Price of one joule of electricity (light upkeep).
    pub electricity_unit_cost: i64,
    /// Price of one litre of water (growth-medium upkeep).
    pub water_unit_cost: i64,
    /// Balance a fresh game starts with.
    pub starting_balance: i64,
    /// Peppers harvested per set bit of the yield gene, before the light
    /// and medium multipliers.
    pub yield_per_bit: i64,
    /// Seed price per set bit across a bred variant's whole chromosome.
    pub seed_cost_per_bit: i64,
    /// Floor for the growth-duration scale; keeps a fully loaded growth
    /// gene from collapsing all phases to nothing.
    pub min_growth_scale: f32,
    /// Candidate population size held by a breeding session.
    pub population_size: usize,
    /// Probability that a freshly crossed child takes a single-bit mutation.
    pub mutation_chance: f32,
    /// Improvement bar for a breeding session: the target fitness is the
    /// parents' average scaled by `1 + improvement_margin`.
    pub improvement_margin: f32,
    /// Quantum Capsicum burned per generation tick, in thousandths of a unit.
    pub catalyst_burn_thousandths: i64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_virtual_millis: 1_800_000,
            cost_tick_millis: MILLIS_PER_DAY,
            electricity_unit_cost: 3,
            water_unit_cost: 1,
            starting_balance: 80,
            yield_per_bit: 3,
            seed_cost_per_bit: 2,
            min_growth_scale: 0.25,
            population_size: 25,
            mutation_chance: 0.5,
            improvement_margin: 0.1,
            catalyst_burn_thousandths: 2,
        }
    }
}
