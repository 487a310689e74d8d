// capsica_sim — pure Rust simulation engine.
//
// This crate contains all game logic for Capsica, an incremental
// chili-pepper growing and breeding game: the state aggregate, the plant
// growth model, the economy, the technology progression ratchet, and the
// genetic-algorithm breeding engine. It has zero thread, timer, or I/O
// dependencies and can be tested and run headless.
//
// Module overview:
// - `state.rs`:      The `GameState` aggregate, command dispatch, the tick.
// - `command.rs`:    `GameCommand` / `CommandOutcome` — all state mutations.
// - `genetics.rs`:   Genes, chromosomes, fitness weights, breeding sessions.
// - `naming.rs`:     Deterministic display names for bred variants.
// - `growth.rs`:     Growth phases and the phase-duration table.
// - `plants.rs`:     Plant types (starter catalog), planted instances, pots.
// - `upgrades.rs`:   Equipment tiers + Describe/Purchasable/Upgradable.
// - `technology.rs`: Technology catalog and the progression rule queues.
// - `economy.rs`:    Upkeep, sale pricing, the distillate catalog.
// - `config.rs`:     `GameConfig` — every tunable balance constant.
// - `types.rs`:      Currency, Scovilles, ids, inventory stock shapes.
// - `prng`:          Re-exported from `capsica_prng` — xoshiro256++ with
//                    SplitMix64 seeding.
//
// The companion crate `capsica_runtime` wraps this library in the threaded
// single-writer executor (command queue, tick/save timers, snapshot
// publication). That boundary is enforced at the compiler level — this
// crate cannot depend on wall clocks or thread scheduling.
//
// **Critical constraint: determinism.** The engine is a pure function:
// `(state, command) -> state'`. All randomness comes from seeded
// `GameRng`s serialized inside the state. No `HashMap` where iteration
// order is observable, no system time, no OS entropy.

pub mod command;
pub mod config;
pub mod economy;
pub mod genetics;
pub mod growth;
pub mod naming;
pub mod plants;
pub use capsica_prng as prng;
pub mod state;
pub mod technology;
pub mod types;
pub mod upgrades;
