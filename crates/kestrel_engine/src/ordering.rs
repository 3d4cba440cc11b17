//! Move ordering: scores every candidate and hands them out best first.

use kestrel_core::{Board, Color, Move, PieceKind, Square};

use crate::eval::{MAX_PLY, piece_value};

pub const TT_MOVE_SCORE: i32 = 10_000_000;
const CAPTURE_BASE: i32 = 1_000_000;
const PROMOTION_BASE: i32 = 900_000;
const KILLER_SCORES: [i32; 2] = [800_000, 790_000];
const COUNTER_MOVE_SCORE: i32 = 700_000;

/// Saturation bound of the history counters.
pub const MAX_HISTORY: i32 = 16_384;
const MAX_HISTORY_BONUS: i32 = 1_536;

/// Continuation history looks at the moves this many plies back.
const CONTINUATION_PLIES: usize = 2;
const PIECE_SQUARES: usize = 6 * 64;

type ContinuationRow = [[i16; 64]; 6];

#[inline]
fn piece_square(kind: PieceKind, sq: Square) -> usize {
    kind.idx() * 64 + sq as usize
}

/// `h += bonus - h * |bonus| / MAX_HISTORY`, which keeps `h` within ±`MAX_HISTORY`.
#[inline]
fn apply_gravity(entry: &mut i32, bonus: i32) {
    let bonus = bonus.clamp(-MAX_HISTORY, MAX_HISTORY);
    *entry += bonus - *entry * bonus.abs() / MAX_HISTORY;
}

pub fn history_bonus(depth: i32) -> i32 {
    (16 * depth * depth).min(MAX_HISTORY_BONUS)
}

/// Cutoff statistics gathered during search, owned by the searcher.
pub struct Heuristics {
    killers: [[Move; 2]; MAX_PLY],
    counter_moves: Box<[[Move; 64]; 64]>,
    history: Box<[[[i32; 64]; 64]; 2]>,
    continuation: [Vec<ContinuationRow>; CONTINUATION_PLIES],
}

impl Heuristics {
    pub fn new() -> Self {
        Self {
            killers: [[Move::NULL; 2]; MAX_PLY],
            counter_moves: Box::new([[Move::NULL; 64]; 64]),
            history: Box::new([[[0; 64]; 64]; 2]),
            continuation: std::array::from_fn(|_| vec![[[0; 64]; 6]; PIECE_SQUARES]),
        }
    }

    /// Forgets everything; used between games.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Start of a search: halve the counters and drop the killers.
    pub fn age(&mut self) {
        self.killers = [[Move::NULL; 2]; MAX_PLY];
        for entry in self.history.iter_mut().flatten().flatten() {
            *entry /= 2;
        }
        for table in &mut self.continuation {
            for entry in table.iter_mut().flatten().flatten() {
                *entry /= 2;
            }
        }
    }

    pub fn killers(&self, ply: usize) -> [Move; 2] {
        self.killers.get(ply).copied().unwrap_or([Move::NULL; 2])
    }

    pub fn counter_move(&self, previous: Move) -> Move {
        if previous.is_null() {
            return Move::NULL;
        }
        self.counter_moves[previous.from() as usize][previous.to() as usize]
    }

    pub fn history(&self, side: Color, mv: Move) -> i32 {
        self.history[side.idx()][mv.from() as usize][mv.to() as usize]
    }

    /// Sum of the continuation counters for playing `mv` after the recent moves.
    pub fn continuation(&self, board: &Board, mv: Move) -> i32 {
        let Some(piece) = board.piece_at(mv.from()) else {
            return 0;
        };
        let target = piece_square(piece.kind, mv.to());
        (0..CONTINUATION_PLIES)
            .filter_map(|back| {
                let (prev, to) = board.recent_move(back + 1)?;
                Some(self.continuation[back][piece_square(prev.kind, to)][target / 64][target % 64] as i32)
            })
            .sum()
    }

    fn quiet_score(&self, board: &Board, mv: Move) -> i32 {
        self.history(board.side_to_move(), mv) + self.continuation(board, mv)
    }

    fn store_killer(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.killers.get_mut(ply) else {
            return;
        };
        if slot[0] != mv {
            slot[1] = slot[0];
            slot[0] = mv;
        }
    }

    fn update_quiet(&mut self, board: &Board, mv: Move, bonus: i32) {
        let side = board.side_to_move().idx();
        apply_gravity(
            &mut self.history[side][mv.from() as usize][mv.to() as usize],
            bonus,
        );

        let Some(piece) = board.piece_at(mv.from()) else {
            return;
        };
        let target = piece_square(piece.kind, mv.to());
        for back in 0..CONTINUATION_PLIES {
            if let Some((prev, to)) = board.recent_move(back + 1) {
                let cell = &mut self.continuation[back][piece_square(prev.kind, to)][target / 64][target % 64];
                let mut value = *cell as i32;
                apply_gravity(&mut value, bonus);
                *cell = value as i16;
            }
        }
    }

    /// Rewards the quiet move `best` that failed high at `ply` and penalises
    /// the quiets searched before it. `board` is the position before `best`.
    pub fn update_quiet_cutoff(&mut self, board: &Board, ply: usize, best: Move, tried: &[Move], depth: i32) {
        let bonus = history_bonus(depth);
        self.store_killer(ply, best);

        let previous = board.last_move();
        if !previous.is_null() {
            self.counter_moves[previous.from() as usize][previous.to() as usize] = best;
        }

        self.update_quiet(board, best, bonus);
        for &mv in tried {
            self.update_quiet(board, mv, -bonus);
        }
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of the piece a capture removes; en passant takes a pawn.
pub fn captured_value(board: &Board, mv: Move) -> i32 {
    if mv.is_en_passant() {
        return piece_value(PieceKind::Pawn);
    }
    board.piece_at(mv.to()).map_or(0, |p| piece_value(p.kind))
}

/// Capture and promotion score, shared by the main and quiescence searches.
pub fn tactical_score(board: &Board, mv: Move) -> i32 {
    let mut score = 0;
    if mv.is_capture() {
        let attacker = board.piece_at(mv.from()).map_or(0, |p| piece_value(p.kind));
        score += CAPTURE_BASE + captured_value(board, mv) * 16 - attacker;
        if board.attacked_by(board.side_to_move().other()).contains(mv.to()) {
            score -= attacker;
        }
    }
    if let Some(kind) = mv.promotion_kind() {
        score += piece_value(kind);
        if !mv.is_capture() {
            score += PROMOTION_BASE;
        }
    }
    score
}

/// Full ordering score for the main search.
pub fn score_move(board: &Board, mv: Move, tt_move: Move, ply: usize, heuristics: &Heuristics) -> i32 {
    if mv == tt_move {
        return TT_MOVE_SCORE;
    }
    if !mv.is_quiet() {
        return tactical_score(board, mv);
    }

    let killers = heuristics.killers(ply);
    if mv == killers[0] {
        return KILLER_SCORES[0];
    }
    if mv == killers[1] {
        return KILLER_SCORES[1];
    }
    if mv == heuristics.counter_move(board.last_move()) {
        return COUNTER_MOVE_SCORE;
    }
    heuristics.quiet_score(board, mv)
}

#[derive(Clone, Copy, Debug)]
struct ScoredMove {
    mv: Move,
    score: i32,
}

/// Yields moves in descending score order by repeated selection, so a list
/// abandoned after a cutoff is never fully sorted.
pub struct MovePicker {
    moves: Vec<ScoredMove>,
    next: usize,
}

impl MovePicker {
    pub fn new(board: &Board, moves: &[Move], tt_move: Move, ply: usize, heuristics: &Heuristics) -> Self {
        let moves = moves
            .iter()
            .map(|&mv| ScoredMove {
                mv,
                score: score_move(board, mv, tt_move, ply, heuristics),
            })
            .collect();
        Self { moves, next: 0 }
    }

    /// Ordering for quiescence: captures and promotions only.
    pub fn tactical(board: &Board, moves: &[Move]) -> Self {
        let moves = moves
            .iter()
            .map(|&mv| ScoredMove {
                mv,
                score: tactical_score(board, mv),
            })
            .collect();
        Self { moves, next: 0 }
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        let rest = self.moves.get(self.next..)?;
        let best = rest
            .iter()
            .enumerate()
            .max_by_key(|(i, m)| (m.score, std::cmp::Reverse(*i)))
            .map(|(i, _)| i + self.next)?;
        self.moves.swap(self.next, best);
        self.next += 1;
        Some(self.moves[self.next - 1].mv)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.moves.len() - self.next;
        (left, Some(left))
    }
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod ordering_tests;
