// End-to-end tests for the executor lifecycle.
//
// Each test starts a real executor (threads, timers, channel) against a
// real `GameState` and drives it through the public surface only: enqueue,
// latest, pause/resume, and the game-over callback. Timer periods are
// shrunk to milliseconds; assertions poll with a generous deadline instead
// of assuming scheduler timing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use capsica_runtime::{ExecutorConfig, GameExecutor, InMemoryStore, load_or_new};
use capsica_sim::command::GameCommand;
use capsica_sim::plants::BELL_PEPPER_ID;
use capsica_sim::state::GameState;
use capsica_sim::types::Currency;
use capsica_sim::upgrades::Light;

/// Poll until `predicate` holds or five seconds pass.
fn wait_until(mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

/// Timers effectively disabled — the test drives every command itself.
fn manual_config() -> ExecutorConfig {
    ExecutorConfig {
        tick_period: Duration::from_secs(3_600),
        save_period: Duration::from_secs(3_600),
    }
}

fn fast_config() -> ExecutorConfig {
    ExecutorConfig {
        tick_period: Duration::from_millis(2),
        save_period: Duration::from_millis(20),
    }
}

#[test]
fn commands_drain_in_fifo_order_and_publish_snapshots() {
    let executor = GameExecutor::start(
        GameState::new(42),
        manual_config(),
        Box::new(InMemoryStore::new()),
        || {},
    );

    assert_eq!(executor.latest().balance, Currency(80));

    // Plant, then immediately sell the starting peppers: the sale must see
    // the post-plant balance, not race ahead of it.
    executor.enqueue(GameCommand::PlantSeed(BELL_PEPPER_ID));
    executor.enqueue(GameCommand::SellPeppers(BELL_PEPPER_ID));

    assert!(wait_until(|| {
        let snapshot = executor.latest();
        snapshot.plant_pots[0].plant.is_some()
            && snapshot.pepper_inventory[&BELL_PEPPER_ID].peppers == 0
    }));
    // 80 - 2 (seed) + 15 (five heatless peppers at 3 each).
    assert_eq!(executor.latest().balance, Currency(93));
    executor.stop();
}

#[test]
fn the_tick_timer_advances_the_virtual_clock() {
    let executor = GameExecutor::start(
        GameState::new(42),
        fast_config(),
        Box::new(InMemoryStore::new()),
        || {},
    );

    assert!(wait_until(|| executor.latest().date_millis > 0));
    executor.stop();
}

#[test]
fn the_save_timer_hands_consistent_snapshots_to_persistence() {
    let store = Arc::new(InMemoryStore::new());
    let executor = GameExecutor::start(
        GameState::new(42),
        fast_config(),
        Box::new(store.clone()),
        || {},
    );

    assert!(wait_until(|| store.save_count() >= 2));
    let saved = store.last().expect("at least one save happened");
    // The snapshot is a fully-applied state: starting stock intact, the
    // catalog never smaller than the two starters.
    assert_eq!(saved.pepper_inventory[&BELL_PEPPER_ID].peppers, 5);
    assert!(saved.plant_types.len() >= 2);
    executor.stop();

    // And it restores.
    let restored = load_or_new(&*store, 7);
    assert_eq!(restored.pepper_inventory[&BELL_PEPPER_ID].peppers, 5);
}

#[test]
fn terminal_tick_fires_game_over_once_and_closes_the_queue() {
    // Balance zero with a powered light: the first cost tick is unpayable.
    let mut state = GameState::new(42);
    state.balance = Currency(0);
    state.light = Light::Cfl;

    let game_overs = Arc::new(AtomicUsize::new(0));
    let counter = game_overs.clone();
    let executor = GameExecutor::start(
        state,
        fast_config(),
        Box::new(InMemoryStore::new()),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    assert!(wait_until(|| game_overs.load(Ordering::SeqCst) == 1));
    assert!(wait_until(|| !executor.is_running()));

    // The callback never fires twice, and the failed bill was not deducted.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(game_overs.load(Ordering::SeqCst), 1);
    assert_eq!(executor.latest().balance, Currency(0));

    // The queue is closed: enqueues are silent no-ops now.
    executor.enqueue(GameCommand::PlantSeed(BELL_PEPPER_ID));
    thread::sleep(Duration::from_millis(50));
    assert!(executor.latest().plant_pots[0].plant.is_none());
    executor.stop();
}

#[test]
fn pause_gates_the_timers_without_dropping_queued_commands() {
    let executor = GameExecutor::start(
        GameState::new(42),
        fast_config(),
        Box::new(InMemoryStore::new()),
        || {},
    );

    assert!(wait_until(|| executor.latest().date_millis > 0));
    executor.pause();

    // Let in-flight ticks drain, then the clock must hold still.
    thread::sleep(Duration::from_millis(30));
    let frozen = executor.latest().date_millis;
    thread::sleep(Duration::from_millis(60));
    assert_eq!(executor.latest().date_millis, frozen);

    // User commands still work while paused.
    executor.enqueue(GameCommand::PlantSeed(BELL_PEPPER_ID));
    assert!(wait_until(|| executor.latest().plant_pots[0].plant.is_some()));

    executor.resume();
    assert!(wait_until(|| executor.latest().date_millis > frozen));
    executor.stop();
}

#[test]
fn stop_tears_down_cleanly_mid_session() {
    let executor = GameExecutor::start(
        GameState::new(42),
        fast_config(),
        Box::new(InMemoryStore::new()),
        || {},
    );
    assert!(wait_until(|| executor.latest().date_millis > 0));
    // Returns only after all three threads joined.
    executor.stop();
}

#[test]
fn observers_never_see_a_half_applied_command() {
    let executor = GameExecutor::start(
        GameState::new(42),
        manual_config(),
        Box::new(InMemoryStore::new()),
        || {},
    );

    // An area upgrade mutates balance, area, and the pot vector together;
    // every published snapshot must satisfy the pots == area.total()
    // invariant.
    executor.enqueue(GameCommand::SellPeppers(BELL_PEPPER_ID));
    let rich = wait_until(|| executor.latest().balance.0 >= 93);
    assert!(rich);

    let mut state = GameState::new(42);
    state.balance = Currency(10_000);
    let executor = GameExecutor::start(
        state,
        manual_config(),
        Box::new(InMemoryStore::new()),
        || {},
    );
    executor.enqueue(GameCommand::UpgradeArea);
    for _ in 0..100 {
        let snapshot = executor.latest();
        assert_eq!(snapshot.plant_pots.len(), snapshot.area.total());
    }
    assert!(wait_until(|| executor.latest().plant_pots.len() == 4));
    executor.stop();
}
