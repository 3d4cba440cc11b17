//! Search limits, clock allocation and the shared stop flag.
//!
//! The stop flag is an atomic so another thread may end a search; the
//! search itself polls it cheaply and consults the clock only every
//! `check_interval` nodes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::types::Color;

/// Moves-to-go horizon used by the clock allocation.
const MOVE_HORIZON: u64 = 50;
const MIN_BUDGET: Duration = Duration::from_millis(1);

/// What bounds a single search. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum iteration depth in plies
    pub depth: Option<u8>,
    /// Node budget
    pub nodes: Option<u64>,
    /// Fixed time for this move; takes precedence over the clocks
    pub move_time: Option<Duration>,
    pub white_time: Option<Duration>,
    pub black_time: Option<Duration>,
}

impl SearchLimits {
    pub fn depth(depth: u8) -> Self {
        Self {
            depth: Some(depth),
            ..Self::default()
        }
    }

    pub fn nodes(nodes: u64) -> Self {
        Self {
            nodes: Some(nodes),
            ..Self::default()
        }
    }

    pub fn time(move_time: Duration) -> Self {
        Self {
            move_time: Some(move_time),
            ..Self::default()
        }
    }

    /// Builds limits from raw protocol numbers where zero means unbounded.
    pub fn from_budgets(depth: u32, nodes: u64, move_time_ms: u64, white_ms: u64, black_ms: u64) -> Self {
        let ms = |v: u64| (v > 0).then(|| Duration::from_millis(v));
        Self {
            depth: (depth > 0).then(|| depth.min(u8::MAX as u32) as u8),
            nodes: (nodes > 0).then_some(nodes),
            move_time: ms(move_time_ms),
            white_time: ms(white_ms),
            black_time: ms(black_ms),
        }
    }

    pub fn clock(&self, side: Color) -> Option<Duration> {
        match side {
            Color::White => self.white_time,
            Color::Black => self.black_time,
        }
    }

    /// Wall-clock budget for `side` to move with `legal_moves` choices.
    ///
    /// An explicit move time wins; otherwise the side's clock is split with
    /// [`allocate_time`]. `None` when neither is given.
    pub fn time_budget(&self, side: Color, legal_moves: usize, overhead: Duration) -> Option<Duration> {
        if let Some(move_time) = self.move_time {
            return Some(move_time);
        }
        self.clock(side)
            .map(|remaining| allocate_time(remaining, legal_moves, overhead))
    }
}

/// Splits the remaining clock: `remaining * (min(legal, 50) + 10) / 1200`,
/// capped at a tenth of the remaining time and never below 1 ms.
pub fn allocate_time(remaining: Duration, legal_moves: usize, overhead: Duration) -> Duration {
    let usable = remaining.saturating_sub(overhead).as_millis() as u64;
    let weight = (legal_moves as u64).min(MOVE_HORIZON) + 10;
    let budget = (usable * weight / 1200).min(usable / 10);
    Duration::from_millis(budget).max(MIN_BUDGET)
}

/// Clock and node-budget tracker shared by one search.
///
/// Cloning shares the stop flag, so a clone handed to another thread can
/// stop the search.
#[derive(Debug, Clone)]
pub struct TimeControl {
    stopped: Arc<AtomicBool>,
    start_time: Instant,
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    /// How often to read the clock, in nodes
    check_interval: u64,
}

impl TimeControl {
    pub fn new(time_limit: Option<Duration>, node_limit: Option<u64>) -> Self {
        Self {
            stopped: Arc::new(AtomicBool::new(false)),
            start_time: Instant::now(),
            time_limit,
            node_limit,
            check_interval: 2048,
        }
    }

    pub fn with_check_interval(mut self, interval: u64) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    /// Shares an existing stop flag instead of a fresh one.
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stopped = flag;
        self
    }

    /// Restarts the clock and clears the stop flag.
    pub fn start(&mut self) {
        self.start_time = Instant::now();
        self.stopped.store(false, Ordering::SeqCst);
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }

    /// Handle for stopping the search from elsewhere.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stopped)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    /// Reads the clock and raises the stop flag once the time limit passed.
    pub fn check_time(&self) -> bool {
        if self.is_stopped() {
            return true;
        }
        if let Some(limit) = self.time_limit
            && self.start_time.elapsed() >= limit
        {
            self.stop();
            return true;
        }
        false
    }

    #[inline]
    pub fn should_check_time(&self, nodes: u64) -> bool {
        nodes.is_multiple_of(self.check_interval)
    }

    /// Per-node poll: node budget every call, the clock every `check_interval` nodes.
    #[inline]
    pub fn tick(&self, nodes: u64) -> bool {
        if self.is_stopped() {
            return true;
        }
        if let Some(limit) = self.node_limit
            && nodes >= limit
        {
            self.stop();
            return true;
        }
        self.should_check_time(nodes) && self.check_time()
    }

    /// Whether starting another iteration is pointless: half the time budget
    /// or the whole node budget is already spent.
    pub fn soft_limit_reached(&self, nodes: u64) -> bool {
        if self.is_stopped() {
            return true;
        }
        let time_spent = self
            .time_limit
            .is_some_and(|limit| self.start_time.elapsed() >= limit / 2);
        let nodes_spent = self.node_limit.is_some_and(|limit| nodes >= limit);
        time_spent || nodes_spent
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Time left before the hard limit; `None` without a limit.
    pub fn remaining(&self) -> Option<Duration> {
        let limit = self.time_limit?;
        Some(limit.saturating_sub(self.elapsed()))
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
