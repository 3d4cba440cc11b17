//! The engine thread. Commands are executed strictly in arrival order; only
//! `stop` bypasses the queue, through the engine's stop flag.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::Receiver;
use kestrel_engine::{Engine, SearchRequest};
use tracing::{debug, warn};

use crate::protocol::{Command, GoParams};

pub const MAX_HASH_MB: usize = 4096;

/// Searches queued but not yet answered, and how many of them a `stop`
/// has already been addressed to.
#[derive(Default)]
struct Outstanding {
    searches: u32,
    stops: u32,
}

/// Ties each `stop` to an outstanding `go`.
///
/// A `stop` raises the engine's flag only when some queued search has not
/// been stopped yet, so a stop that arrives after the search ended cannot
/// cut the next one short. Stops are matched to searches in queue order: the
/// flag stays up across a finished search while a later one still has a
/// stop owed to it.
#[derive(Clone)]
pub struct SearchGate {
    outstanding: Arc<Mutex<Outstanding>>,
    stop: Arc<AtomicBool>,
}

impl SearchGate {
    pub fn new(stop: Arc<AtomicBool>) -> Self {
        Self {
            outstanding: Arc::new(Mutex::new(Outstanding::default())),
            stop,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Outstanding> {
        self.outstanding.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn open(&self) {
        self.lock().searches += 1;
    }

    pub fn request_stop(&self) {
        let mut outstanding = self.lock();
        if outstanding.stops < outstanding.searches {
            outstanding.stops += 1;
            self.stop.store(true, Ordering::SeqCst);
        }
    }

    /// The oldest search has written its `bestmove`.
    fn close(&self) {
        let mut outstanding = self.lock();
        outstanding.searches = outstanding.searches.saturating_sub(1);
        outstanding.stops = outstanding.stops.saturating_sub(1);
        self.stop.store(outstanding.stops > 0, Ordering::SeqCst);
    }
}

pub fn spawn_worker(mut engine: Engine, commands: Receiver<Command>, gate: SearchGate) -> JoinHandle<()> {
    thread::spawn(move || {
        for command in commands {
            match command {
                Command::Uci => {
                    let mut out = io::stdout().lock();
                    writeln!(out, "id name Kestrel {}", env!("CARGO_PKG_VERSION")).ok();
                    writeln!(out, "id author the Kestrel developers").ok();
                    writeln!(
                        out,
                        "option name Hash type spin default {} min 1 max {MAX_HASH_MB}",
                        engine.config().hash_mb
                    )
                    .ok();
                    writeln!(out, "uciok").ok();
                    out.flush().ok();
                }
                Command::IsReady => emit("readyok"),
                Command::UciNewGame => engine.new_game(),
                Command::Position { fen, moves } => {
                    let moves: Vec<&str> = moves.iter().map(String::as_str).collect();
                    if let Err(err) = engine.set_position(fen.as_deref(), &moves) {
                        warn!(%err, "rejected position");
                    }
                }
                Command::Go(params) => {
                    go(&mut engine, params);
                    gate.close();
                }
                Command::SetOption { name, value } => set_option(&mut engine, &name, value.as_deref()),
                Command::Display => emit(&engine.board().to_string()),
                Command::Stop | Command::Quit => {}
            }
        }
        debug!("engine thread finished");
    })
}

fn emit(line: &str) {
    let mut out = io::stdout().lock();
    writeln!(out, "{line}").ok();
    out.flush().ok();
}

fn go(engine: &mut Engine, params: GoParams) {
    if let Some(depth) = params.perft {
        let start = Instant::now();
        let divide = engine.perft_divide(depth);
        let mut out = io::stdout().lock();
        for (mv, nodes) in &divide {
            writeln!(out, "{mv}: {nodes}").ok();
        }
        let total: u64 = divide.iter().map(|(_, nodes)| nodes).sum();
        writeln!(out).ok();
        writeln!(out, "Nodes searched: {total}").ok();
        out.flush().ok();
        debug!(depth, total, elapsed = ?start.elapsed(), "perft finished");
        return;
    }

    let request = SearchRequest {
        max_depth: params.depth.unwrap_or(0),
        max_nodes: params.nodes.unwrap_or(0),
        max_time_ms: params.movetime.unwrap_or(0),
        white_ms: params.wtime.unwrap_or(0),
        black_ms: params.btime.unwrap_or(0),
    };
    let outcome = engine.start_search(&request, |report| emit(&report.to_string()));
    emit(&outcome.to_string());
}

fn set_option(engine: &mut Engine, name: &str, value: Option<&str>) {
    match (name.to_ascii_lowercase().as_str(), value) {
        ("hash", Some(value)) => match value.parse::<usize>() {
            Ok(mb) if (1..=MAX_HASH_MB).contains(&mb) => engine.set_hash_size(mb),
            _ => warn!(value, "invalid Hash value"),
        },
        _ => debug!(name, "unknown option"),
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
