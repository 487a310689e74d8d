// capsica_runtime — the threaded shell around the pure engine.
//
// `capsica_sim` is a pure function of commands; this crate supplies the
// concurrency: one unbounded command queue, one consumer thread that owns
// the `GameState`, two periodic producer threads (tick and save), snapshot
// publication for observers, and the persistence boundary.
//
// Module overview:
// - `executor.rs`:    `GameExecutor` — the single-writer command loop.
// - `persistence.rs`: The `Persistence` collaborator trait + in-memory impl.
//
// Everything is std: `std::thread` + `std::sync::mpsc`, run/pause flags on
// atomics, join-on-stop teardown. No async runtime.

pub mod executor;
pub mod persistence;

pub use executor::{ExecutorConfig, GameExecutor};
pub use persistence::{InMemoryStore, Persistence, load_or_new};
