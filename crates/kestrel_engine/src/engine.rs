//! The engine facade driven by the protocol adapter.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use kestrel_core::{Board, FenError, Move, MoveTextError, SearchLimits, parse_uci_move};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::eval::{Evaluator, MaterialEvaluator};
use crate::search::{IterationInfo, SearchOutcome, Searcher};

/// Raw search budgets as they arrive from the protocol; zero means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub max_depth: u32,
    pub max_nodes: u64,
    pub max_time_ms: u64,
    pub white_ms: u64,
    pub black_ms: u64,
}

impl SearchRequest {
    pub fn depth(depth: u32) -> Self {
        Self {
            max_depth: depth,
            ..Self::default()
        }
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits::from_budgets(
            self.max_depth,
            self.max_nodes,
            self.max_time_ms,
            self.white_ms,
            self.black_ms,
        )
    }
}

pub struct Engine<E: Evaluator = MaterialEvaluator> {
    board: Board,
    searcher: Searcher<E>,
    config: EngineConfig,
}

impl Engine<MaterialEvaluator> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_evaluator(MaterialEvaluator, config)
    }
}

impl Default for Engine<MaterialEvaluator> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<E: Evaluator> Engine<E> {
    pub fn with_evaluator(evaluator: E, config: EngineConfig) -> Self {
        Self {
            board: Board::startpos(),
            searcher: Searcher::with_evaluator(evaluator, config.hash_mb, config.search),
            config,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn searcher(&self) -> &Searcher<E> {
        &self.searcher
    }

    /// Setting the flag ends a running search at its next node.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.searcher.stop_flag()
    }

    /// Replaces the position with `fen` (start position when `None`) and
    /// plays `moves` on it. Move texts that do not parse or are not legal
    /// are skipped. On a FEN error the current position is kept.
    pub fn set_position(&mut self, fen: Option<&str>, moves: &[&str]) -> Result<(), FenError> {
        let mut board = match fen {
            Some(fen) => Board::from_fen(fen)?,
            None => Board::startpos(),
        };

        for &text in moves {
            if board.history_full() {
                warn!(text, "game history full, ignoring remaining moves");
                break;
            }
            match parse_uci_move(&board, text) {
                Ok(mv) => board.make_move(mv),
                Err(err) => warn!(%err, "skipping move"),
            }
        }

        debug!(fen = %board.to_fen(), "position set");
        self.board = board;
        Ok(())
    }

    /// Plays one move given in coordinate text. The position is unchanged
    /// on error.
    pub fn make_move(&mut self, text: &str) -> Result<Move, MoveTextError> {
        if self.board.history_full() {
            return Err(MoveTextError::HistoryFull);
        }
        let mv = parse_uci_move(&self.board, text)?;
        self.board.make_move(mv);
        Ok(mv)
    }

    /// Runs a blocking search on the current position. `on_info` is called
    /// once per completed iteration.
    pub fn start_search<F>(&mut self, request: &SearchRequest, on_info: F) -> SearchOutcome
    where
        F: FnMut(&IterationInfo),
    {
        let limits = request.limits();
        debug!(?limits, "starting search");
        self.searcher
            .search(&mut self.board, &limits, self.config.move_overhead(), on_info)
    }

    pub fn perft(&mut self, depth: u8) -> u64 {
        kestrel_core::perft(&mut self.board, depth)
    }

    pub fn perft_divide(&mut self, depth: u8) -> Vec<(Move, u64)> {
        kestrel_core::perft_divide(&mut self.board, depth)
    }

    /// Forgets everything learned in previous games and resets to the start position.
    pub fn new_game(&mut self) {
        self.board = Board::startpos();
        self.searcher.new_game();
    }

    pub fn set_hash_size(&mut self, mb: usize) {
        self.config.hash_mb = mb;
        self.searcher.resize_tt(mb);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
