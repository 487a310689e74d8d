// The single-writer command executor.
//
// Architecture: thread-per-producer with a central `mpsc` channel.
//
// - **Consumer thread**: the only owner of the `GameState`. Drains the
//   channel strictly in FIFO order, applies each command, publishes a fresh
//   snapshot after every one. `Save` hands the snapshot to the persistence
//   collaborator; a terminal `Tick` (upkeep exceeded the balance) stops the
//   timers, fires the game-over callback exactly once, and exits — closing
//   the queue behind it.
// - **Tick timer thread**: enqueues `Tick` every `tick_period` unless
//   paused.
// - **Save timer thread**: enqueues `Save` every `save_period` unless
//   paused.
// - **External callers**: `enqueue` from any thread. Fire-and-forget — it
//   never waits for the command's effects, and after termination it is a
//   silent no-op.
//
// Pausing (e.g. the frontend going to the background) gates only the two
// timers; commands already queued still drain, and nothing is dropped.
//
// Readers never touch the live state: the consumer publishes an
// `Arc<GameState>` after each command (copy-on-publish), and `latest()`
// clones the `Arc` under a momentary lock — an observer can never see a
// half-applied command, and never blocks on one being applied.
//
// Timer threads sleep with `park_timeout` so that both game-over and
// `stop()` can wake them immediately instead of waiting out a period.

use capsica_sim::command::{CommandOutcome, GameCommand};
use capsica_sim::state::GameState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::persistence::Persistence;

/// Periods for the two producer timers.
#[derive(Clone, Copy, Debug)]
pub struct ExecutorConfig {
    pub tick_period: Duration,
    pub save_period: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(250),
            save_period: Duration::from_secs(10),
        }
    }
}

/// Handle to a running game session. Dropping it (or calling `stop`) tears
/// the threads down; the game-over transition tears them down from inside.
pub struct GameExecutor {
    sender: Option<Sender<GameCommand>>,
    running: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    published: Arc<Mutex<Arc<GameState>>>,
    timer_threads: Arc<Mutex<Vec<thread::Thread>>>,
    handles: Vec<thread::JoinHandle<()>>,
}

impl GameExecutor {
    /// Start a session: spawn the consumer and both timers. The callback
    /// runs exactly once, from the consumer thread, on the first terminal
    /// tick.
    pub fn start<F>(
        state: GameState,
        config: ExecutorConfig,
        persistence: Box<dyn Persistence>,
        on_game_over: F,
    ) -> GameExecutor
    where
        F: FnOnce() + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<GameCommand>();
        let running = Arc::new(AtomicBool::new(true));
        let paused = Arc::new(AtomicBool::new(false));
        let published = Arc::new(Mutex::new(Arc::new(state.snapshot())));
        let timer_threads: Arc<Mutex<Vec<thread::Thread>>> = Arc::new(Mutex::new(Vec::new()));

        let consumer = spawn_consumer(
            state,
            receiver,
            persistence,
            on_game_over,
            running.clone(),
            published.clone(),
            timer_threads.clone(),
        );
        let tick_timer = spawn_timer(
            GameCommand::Tick,
            config.tick_period,
            sender.clone(),
            running.clone(),
            paused.clone(),
        );
        let save_timer = spawn_timer(
            GameCommand::Save,
            config.save_period,
            sender.clone(),
            running.clone(),
            paused.clone(),
        );

        register_timer(&timer_threads, &tick_timer);
        register_timer(&timer_threads, &save_timer);

        GameExecutor {
            sender: Some(sender),
            running,
            paused,
            published,
            timer_threads,
            handles: vec![consumer, tick_timer, save_timer],
        }
    }

    /// Enqueue a command. Fire-and-forget: blocks at most on queue
    /// admission (the queue is unbounded), never on processing, and
    /// silently no-ops once the session has terminated.
    pub fn enqueue(&self, command: GameCommand) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(command);
        }
    }

    /// The latest fully-applied snapshot. Never blocks on the consumer's
    /// work — this is a clone of a published `Arc`, not a view of live
    /// state.
    pub fn latest(&self) -> Arc<GameState> {
        match self.published.lock() {
            Ok(snapshot) => snapshot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Stop both timers (e.g. the frontend went to the background).
    /// Queued commands still drain; nothing is dropped.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    /// Resume the timers after `pause`.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
        unpark_all(&self.timer_threads);
    }

    /// Whether the session is still alive (no terminal tick, no stop).
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Host-driven teardown: stop the timers, close the queue, and wait for
    /// all threads. Equivalent to dropping the executor.
    pub fn stop(self) {}

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        unpark_all(&self.timer_threads);
        // Closing our sender lets the consumer's `recv` finish once the
        // timer clones are gone.
        self.sender.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for GameExecutor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn register_timer(timer_threads: &Mutex<Vec<thread::Thread>>, handle: &thread::JoinHandle<()>) {
    match timer_threads.lock() {
        Ok(mut threads) => threads.push(handle.thread().clone()),
        Err(poisoned) => poisoned.into_inner().push(handle.thread().clone()),
    }
}

fn unpark_all(timer_threads: &Mutex<Vec<thread::Thread>>) {
    let threads = match timer_threads.lock() {
        Ok(threads) => threads,
        Err(poisoned) => poisoned.into_inner(),
    };
    for t in threads.iter() {
        t.unpark();
    }
}

fn spawn_consumer<F>(
    mut state: GameState,
    receiver: Receiver<GameCommand>,
    persistence: Box<dyn Persistence>,
    on_game_over: F,
    running: Arc<AtomicBool>,
    published: Arc<Mutex<Arc<GameState>>>,
    timer_threads: Arc<Mutex<Vec<thread::Thread>>>,
) -> thread::JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    thread::spawn(move || {
        let mut on_game_over = Some(on_game_over);
        // `recv` fails only when every sender is gone — both timers dead
        // and the external handle dropped. That is the stop() path.
        while let Ok(command) = receiver.recv() {
            let outcome = state.apply(&command);
            if outcome == CommandOutcome::SaveRequested {
                persistence.save(&state);
            }

            let snapshot = Arc::new(state.snapshot());
            match published.lock() {
                Ok(mut slot) => *slot = snapshot,
                Err(poisoned) => *poisoned.into_inner() = snapshot,
            }

            if outcome == CommandOutcome::GameOver {
                running.store(false, Ordering::SeqCst);
                unpark_all(&timer_threads);
                if let Some(callback) = on_game_over.take() {
                    callback();
                }
                // Dropping the receiver closes the queue: later enqueues
                // become silent no-ops.
                break;
            }
        }
    })
}

fn spawn_timer(
    command: GameCommand,
    period: Duration,
    sender: Sender<GameCommand>,
    running: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            if !running.load(Ordering::SeqCst) {
                break;
            }
            if !paused.load(Ordering::SeqCst) && sender.send(command.clone()).is_err() {
                break;
            }
            thread::park_timeout(period);
        }
    })
}
