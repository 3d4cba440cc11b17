//! Principal variation search.
//!
//! `Searcher` is the search context: it owns the transposition table, the
//! ordering heuristics, the PV table and the limits of the running search,
//! and is threaded through the recursion by `&mut self`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use kestrel_core::{
    Board, GenType, Move, SearchLimits, TimeControl, generate_moves, legal_moves, legal_moves_into,
};
use tracing::{debug, info};

use crate::config::SearchParams;
use crate::eval::{Evaluator, INFINITY, MATE, MATE_BOUND, MAX_PLY, MaterialEvaluator, is_mate_score};
use crate::ordering::{Heuristics, MovePicker, captured_value};
use crate::tt::{Bound, TranspositionTable};

/// Widest aspiration half-window before falling back to a full window.
const MAX_ASPIRATION_DELTA: i32 = 1000;
const LMR_TABLE_SIZE: usize = 64;

/// `0.75 + ln(depth) * ln(index) / 2.25`, indexed by `[depth][move index]`.
static LMR_TABLE: LazyLock<[[u8; LMR_TABLE_SIZE]; LMR_TABLE_SIZE]> = LazyLock::new(|| {
    let mut table = [[0u8; LMR_TABLE_SIZE]; LMR_TABLE_SIZE];
    for (depth, row) in table.iter_mut().enumerate().skip(1) {
        for (index, cell) in row.iter_mut().enumerate().skip(1) {
            let r = 0.75 + (depth as f64).ln() * (index as f64).ln() / 2.25;
            *cell = r as u8;
        }
    }
    table
});

fn lmr_reduction(depth: i32, index: usize) -> i32 {
    let d = (depth.max(0) as usize).min(LMR_TABLE_SIZE - 1);
    let i = index.min(LMR_TABLE_SIZE - 1);
    LMR_TABLE[d][i] as i32
}

/// Triangular principal variation table.
struct PvTable {
    moves: Box<[[Move; MAX_PLY]; MAX_PLY]>,
    len: [usize; MAX_PLY],
}

impl PvTable {
    fn new() -> Self {
        Self {
            moves: Box::new([[Move::NULL; MAX_PLY]; MAX_PLY]),
            len: [0; MAX_PLY],
        }
    }

    #[inline]
    fn clear(&mut self, ply: usize) {
        self.len[ply] = ply;
    }

    /// `mv` followed by the child's line becomes the line at `ply`.
    fn update(&mut self, ply: usize, mv: Move) {
        let child_len = self.len[ply + 1].max(ply + 1);
        self.moves[ply][ply] = mv;
        for i in ply + 1..child_len {
            self.moves[ply][i] = self.moves[ply + 1][i];
        }
        self.len[ply] = child_len;
    }

    fn line(&self) -> &[Move] {
        &self.moves[0][..self.len[0]]
    }
}

/// Score as reported to the protocol layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreReport {
    Centipawns(i32),
    /// Moves to mate; negative when being mated
    Mate(i32),
}

impl ScoreReport {
    pub fn from_score(score: i32) -> Self {
        if !is_mate_score(score) {
            ScoreReport::Centipawns(score)
        } else if score > 0 {
            ScoreReport::Mate((MATE - score + 1) / 2)
        } else {
            ScoreReport::Mate(-(MATE + score) / 2)
        }
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreReport::Centipawns(cp) => write!(f, "cp {cp}"),
            ScoreReport::Mate(moves) => write!(f, "mate {moves}"),
        }
    }
}

/// Progress report for one completed iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationInfo {
    pub depth: u8,
    pub score: i32,
    pub nodes: u64,
    pub elapsed: Duration,
    pub hashfull: usize,
    pub pv: Vec<Move>,
}

impl fmt::Display for IterationInfo {
    /// `info depth D score cp S nodes N pv m1 m2 ...`
    ///
    /// A score inside the mate band prints as `score mate M` instead of
    /// `score cp S`, where `M` counts full moves and is negative when the
    /// side to move is getting mated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "info depth {} score {} nodes {} pv",
            self.depth,
            ScoreReport::from_score(self.score),
            self.nodes
        )?;
        for mv in &self.pv {
            write!(f, " {mv}")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` only when the root has no legal move
    pub best_move: Option<Move>,
    pub score: i32,
    /// Deepest completed iteration
    pub depth: u8,
    pub nodes: u64,
    pub pv: Vec<Move>,
}

impl fmt::Display for SearchOutcome {
    /// `bestmove <move>`, with `0000` when there is none.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bestmove {}", self.best_move.unwrap_or(Move::NULL))
    }
}

pub struct Searcher<E: Evaluator = MaterialEvaluator> {
    evaluator: E,
    params: SearchParams,
    tt: TranspositionTable,
    heuristics: Heuristics,
    pv: PvTable,
    time: TimeControl,
    stop_flag: Arc<AtomicBool>,
    nodes: u64,
    /// Budget checks are armed once the first iteration completed
    armed: bool,
    aborted: bool,
    root_best: Move,
}

impl Searcher<MaterialEvaluator> {
    pub fn new(hash_mb: usize, params: SearchParams) -> Self {
        Self::with_evaluator(MaterialEvaluator, hash_mb, params)
    }
}

impl<E: Evaluator> Searcher<E> {
    pub fn with_evaluator(evaluator: E, hash_mb: usize, params: SearchParams) -> Self {
        let time = TimeControl::default();
        Self {
            evaluator,
            params,
            tt: TranspositionTable::new(hash_mb),
            heuristics: Heuristics::new(),
            pv: PvTable::new(),
            stop_flag: time.stop_flag(),
            time,
            nodes: 0,
            armed: false,
            aborted: false,
            root_best: Move::NULL,
        }
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Setting the returned flag ends the running search at the next node.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }

    pub fn resize_tt(&mut self, hash_mb: usize) {
        self.tt.resize(hash_mb);
    }

    pub fn new_game(&mut self) {
        self.tt.clear();
        self.heuristics.clear();
    }

    fn begin(&mut self, time: TimeControl) {
        self.time = time.with_stop_flag(Arc::clone(&self.stop_flag));
        self.nodes = 0;
        self.armed = false;
        self.aborted = false;
        self.root_best = Move::NULL;
    }

    /// Iterative deepening driver. `on_info` receives every completed
    /// iteration; the outcome always comes from a completed iteration.
    ///
    /// A stop requested before the call ends the search at its first node.
    /// The flag is lowered again once the search returns.
    pub fn search<F>(
        &mut self,
        board: &mut Board,
        limits: &SearchLimits,
        move_overhead: Duration,
        on_info: F,
    ) -> SearchOutcome
    where
        F: FnMut(&IterationInfo),
    {
        let outcome = self.iterate(board, limits, move_overhead, on_info);
        self.stop_flag.store(false, Ordering::SeqCst);
        outcome
    }

    fn iterate<F>(
        &mut self,
        board: &mut Board,
        limits: &SearchLimits,
        move_overhead: Duration,
        mut on_info: F,
    ) -> SearchOutcome
    where
        F: FnMut(&IterationInfo),
    {
        let root_moves = legal_moves(board);
        let budget = limits.time_budget(board.side_to_move(), root_moves.len(), move_overhead);
        self.begin(
            TimeControl::new(budget, limits.nodes).with_check_interval(self.params.check_interval),
        );
        self.tt.new_search();
        self.heuristics.age();

        let Some(&first) = root_moves.first() else {
            let score = if board.in_check() { -MATE } else { 0 };
            info!(score, "no legal moves at the root");
            return SearchOutcome {
                best_move: None,
                score,
                depth: 0,
                nodes: 0,
                pv: Vec::new(),
            };
        };

        let max_depth = limits
            .depth
            .map_or(MAX_PLY as u8 - 1, |d| d.min(MAX_PLY as u8 - 1))
            .max(1);
        let mut outcome = SearchOutcome {
            best_move: Some(first),
            score: 0,
            depth: 0,
            nodes: 0,
            pv: vec![first],
        };

        for depth in 1..=max_depth {
            if depth > 1 && self.time.soft_limit_reached(self.nodes) {
                debug!(depth, "soft limit reached, not starting iteration");
                break;
            }

            let score = self.aspiration(board, depth as i32, outcome.score);
            if self.aborted {
                debug!(depth, nodes = self.nodes, "iteration abandoned");
                break;
            }

            let pv = self.pv.line().to_vec();
            self.root_best = pv.first().copied().unwrap_or(first);
            outcome = SearchOutcome {
                best_move: Some(self.root_best),
                score,
                depth,
                nodes: self.nodes,
                pv,
            };
            let report = IterationInfo {
                depth,
                score,
                nodes: self.nodes,
                elapsed: self.time.elapsed(),
                hashfull: self.tt.hashfull(),
                pv: outcome.pv.clone(),
            };
            debug!(depth, score, nodes = self.nodes, elapsed = ?report.elapsed, "iteration complete");
            on_info(&report);
            self.armed = true;

            // A mate inside the searched horizon cannot improve further
            if is_mate_score(score) && MATE - score.abs() <= depth as i32 {
                break;
            }
        }

        outcome.nodes = self.nodes;
        info!(
            best = %outcome.best_move.unwrap_or(Move::NULL),
            score = outcome.score,
            depth = outcome.depth,
            nodes = self.nodes,
            "search finished"
        );
        outcome
    }

    /// Searches the root inside a window around `previous`, widening the
    /// failing side until the score lands inside.
    fn aspiration(&mut self, board: &mut Board, depth: i32, previous: i32) -> i32 {
        let mut delta = self.params.aspiration_delta;
        let (mut alpha, mut beta) = if depth >= self.params.aspiration_min_depth && !is_mate_score(previous) {
            ((previous - delta).max(-INFINITY), (previous + delta).min(INFINITY))
        } else {
            (-INFINITY, INFINITY)
        };

        loop {
            let score = self.alpha_beta(board, depth, alpha, beta, 0);
            if self.aborted {
                return score;
            }

            delta *= 2;
            if score <= alpha {
                debug!(depth, score, alpha, "aspiration fail low");
                alpha = (score - delta).max(-INFINITY);
            } else if score >= beta {
                debug!(depth, score, beta, "aspiration fail high");
                beta = (score + delta).min(INFINITY);
            } else {
                return score;
            }
            if delta > MAX_ASPIRATION_DELTA {
                alpha = -INFINITY;
                beta = INFINITY;
            }
        }
    }

    /// Polls the stop flag every node and the budgets once armed.
    #[inline]
    fn should_stop(&mut self) -> bool {
        if !self.aborted {
            self.aborted = if self.armed {
                self.time.tick(self.nodes)
            } else {
                self.time.is_stopped()
            };
        }
        self.aborted
    }

    fn alpha_beta(&mut self, board: &mut Board, depth: i32, mut alpha: i32, mut beta: i32, ply: usize) -> i32 {
        self.pv.clear(ply);
        let root = ply == 0;

        if !root && board.is_draw() {
            return 0;
        }
        if depth <= 0 {
            return self.quiescence(board, alpha, beta, ply);
        }

        self.nodes += 1;
        if self.should_stop() {
            return 0;
        }
        if ply >= MAX_PLY - 1 || board.history_full() {
            return self.evaluator.evaluate(board);
        }

        if !root {
            // Mate distance pruning
            alpha = alpha.max(-MATE + ply as i32);
            beta = beta.min(MATE - ply as i32 - 1);
            if alpha >= beta {
                return alpha;
            }
        }

        let pv_node = beta - alpha > 1;
        let key = board.hash();
        let hit = self.tt.probe(key, ply);
        if !pv_node
            && let Some(hit) = hit
            && hit.depth as i32 >= depth
        {
            let cutoff = match hit.bound {
                Bound::Exact => true,
                Bound::Lower => hit.score >= beta,
                Bound::Upper => hit.score <= alpha,
            };
            if cutoff {
                return hit.score;
            }
        }
        let tt_move = if root && !self.root_best.is_null() {
            self.root_best
        } else {
            hit.map_or(Move::NULL, |h| h.mv)
        };

        let in_check = board.in_check();
        let static_eval = if in_check {
            -INFINITY
        } else {
            self.evaluator.evaluate(board)
        };

        if !pv_node && !in_check {
            let p = self.params;

            // Reverse futility: far enough above beta that a quiet move will not drop below it
            if depth <= p.rfp_max_depth && beta.abs() < MATE_BOUND && static_eval - p.rfp_margin * depth >= beta {
                return static_eval;
            }

            // Razoring
            if depth <= p.razor_max_depth && static_eval + p.razor_margin * depth < alpha {
                let score = self.quiescence(board, alpha, beta, ply);
                if self.aborted {
                    return 0;
                }
                if score < alpha {
                    return score;
                }
            }

            // Null move: never twice in a row, never without pieces to avoid zugzwang
            if depth >= p.nmp_min_depth
                && static_eval >= beta
                && !board.last_move().is_null()
                && board.has_non_pawn_material(board.side_to_move())
            {
                let reduction = 3 + depth / 4;
                board.make_null_move();
                let score = -self.alpha_beta(board, depth - 1 - reduction, -beta, -beta + 1, ply + 1);
                board.undo_null_move();
                if self.aborted {
                    return 0;
                }
                if score >= beta {
                    return if score >= MATE_BOUND { beta } else { score };
                }
            }
        }

        let mut moves = Vec::with_capacity(64);
        legal_moves_into(board, &mut moves);
        if moves.is_empty() {
            return if in_check { -MATE + ply as i32 } else { 0 };
        }

        let picker = MovePicker::new(board, &moves, tt_move, ply, &self.heuristics);
        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = Move::NULL;
        let mut quiets_tried: Vec<Move> = Vec::with_capacity(32);

        for (index, mv) in picker.enumerate() {
            let gives_check = board.is_check_move(mv);
            let quiet = mv.is_quiet();

            // Futility: a quiet move cannot lift a hopeless eval to alpha
            if !root
                && !in_check
                && quiet
                && !gives_check
                && index > 0
                && depth <= self.params.futility_max_depth
                && best_score > -MATE_BOUND
                && static_eval + self.params.futility_base + self.params.futility_margin * depth <= alpha
            {
                continue;
            }

            board.make_move(mv);
            let new_depth = depth - 1 + i32::from(gives_check);

            let score = if index == 0 {
                -self.alpha_beta(board, new_depth, -beta, -alpha, ply + 1)
            } else {
                let reduction = if depth >= self.params.lmr_min_depth
                    && index >= self.params.lmr_min_index
                    && quiet
                    && !gives_check
                    && !in_check
                {
                    lmr_reduction(depth, index).min(new_depth - 1).max(0)
                } else {
                    0
                };

                let mut score = -self.alpha_beta(board, new_depth - reduction, -alpha - 1, -alpha, ply + 1);
                if reduction > 0 && score > alpha && !self.aborted {
                    score = -self.alpha_beta(board, new_depth, -alpha - 1, -alpha, ply + 1);
                }
                if score > alpha && score < beta && !self.aborted {
                    score = -self.alpha_beta(board, new_depth, -beta, -alpha, ply + 1);
                }
                score
            };
            board.undo_move();

            if self.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    alpha = score;
                    best_move = mv;
                    self.pv.update(ply, mv);
                    if score >= beta {
                        if quiet {
                            self.heuristics
                                .update_quiet_cutoff(board, ply, mv, &quiets_tried, depth);
                        }
                        break;
                    }
                }
            }
            if quiet {
                quiets_tried.push(mv);
            }
        }

        let bound = if best_score >= beta {
            Bound::Lower
        } else if best_score > original_alpha {
            Bound::Exact
        } else {
            Bound::Upper
        };
        self.tt.store(key, best_score, depth, bound, best_move, ply);
        best_score
    }

    /// Resolves captures until the position is quiet. When not in check the
    /// result never drops below the static evaluation.
    fn quiescence(&mut self, board: &mut Board, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        self.pv.clear(ply);
        self.nodes += 1;
        if self.should_stop() {
            return 0;
        }

        let in_check = board.in_check();
        if ply >= MAX_PLY - 1 || board.history_full() {
            return self.evaluator.evaluate(board);
        }

        let mut moves = Vec::with_capacity(32);
        let stand_pat = if in_check {
            legal_moves_into(board, &mut moves);
            if moves.is_empty() {
                return -MATE + ply as i32;
            }
            -INFINITY
        } else {
            let stand_pat = self.evaluator.evaluate(board);
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            generate_moves(board, GenType::Captures, &mut moves);
            stand_pat
        };

        let mut best_score = stand_pat;
        for mv in MovePicker::tactical(board, &moves) {
            // Delta pruning: even winning the victim outright stays below alpha
            if !in_check
                && !mv.is_promotion()
                && stand_pat + captured_value(board, mv) + self.params.delta_margin <= alpha
            {
                continue;
            }

            board.make_move(mv);
            let score = -self.quiescence(board, -beta, -alpha, ply + 1);
            board.undo_move();
            if self.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    alpha = score;
                    self.pv.update(ply, mv);
                    if score >= beta {
                        break;
                    }
                }
            }
        }
        best_score
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod search_tests;
