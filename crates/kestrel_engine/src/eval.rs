//! Static evaluation contract and score scale.

use kestrel_core::{Board, Color, PieceKind};

/// Score of delivering mate right now; mate in `n` plies scores `MATE - n`.
pub const MATE: i32 = 32_000;
/// Bound strictly above every reachable score.
pub const INFINITY: i32 = MATE + 1;
/// Deepest ply the search will ever reach.
pub const MAX_PLY: usize = 128;
/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_BOUND: i32 = MATE - MAX_PLY as i32;

/// Centipawn values indexed by `PieceKind::idx`.
pub const PIECE_VALUES: [i32; 6] = [100, 320, 330, 500, 900, 0];

const REACH_WEIGHT: i32 = 2;
const TEMPO: i32 = 5;

#[inline]
pub fn piece_value(kind: PieceKind) -> i32 {
    PIECE_VALUES[kind.idx()]
}

#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_BOUND
}

/// Static evaluation used at the leaves of the search.
pub trait Evaluator {
    /// Score in centipawns from the side to move's point of view.
    fn evaluate(&self, board: &Board) -> i32;
}

impl<F> Evaluator for F
where
    F: Fn(&Board) -> i32,
{
    fn evaluate(&self, board: &Board) -> i32 {
        self(board)
    }
}

/// Material, mobility reach and a small tempo bonus.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialEvaluator;

impl Evaluator for MaterialEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        let mut score = 0;
        for kind in PieceKind::ALL {
            let white = board.pieces_of(Color::White, kind).popcount() as i32;
            let black = board.pieces_of(Color::Black, kind).popcount() as i32;
            score += piece_value(kind) * (white - black);
        }

        let reach = board.attacked_by(Color::White).popcount() as i32
            - board.attacked_by(Color::Black).popcount() as i32;
        score += REACH_WEIGHT * reach;

        let score = match board.side_to_move() {
            Color::White => score,
            Color::Black => -score,
        };
        score + TEMPO
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
