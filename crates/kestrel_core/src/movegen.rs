//! Legal move generation.
//!
//! Moves are produced legal by construction: check evasions are restricted
//! to a block/capture mask, pinned pieces to their pin ray, king moves to
//! squares the opponent does not attack, and en passant is verified against
//! the position after the capture.

use crate::attacks::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::types::{CastlingRights, Color, Move, PieceKind, Square};

/// Which moves to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenType {
    All,
    /// Captures, capturing promotions and en passant.
    Captures,
}

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Appends the legal moves of `gen_type` for the side to move to `out`.
pub fn generate_moves(board: &Board, gen_type: GenType, out: &mut Vec<Move>) {
    let us = board.side_to_move();
    let them = us.other();
    let ours = board.colored(us);
    let theirs = board.colored(them);
    let occ = board.occupied();
    let king = board.king_square(us);
    let checkers = board.checkers();
    let quiets_allowed = gen_type == GenType::All;

    // King steps never depend on pins; the attacked set already sees through our king.
    let king_targets = king_attacks(king) & !ours & !board.attacked_by(them);
    push_moves(out, king, king_targets, theirs, quiets_allowed);

    if checkers.more_than_one() {
        return;
    }

    let check_mask = match checkers.lsb() {
        Some(checker) => between(king, checker) | Bitboard::from_square(checker),
        None => Bitboard::ALL,
    };
    let (straight_pins, diagonal_pins) = board.compute_pins();
    let pinned = straight_pins | diagonal_pins;
    let targets = !ours & check_mask;

    for from in board.pieces_of(us, PieceKind::Knight) & !pinned {
        push_moves(out, from, knight_attacks(from) & targets, theirs, quiets_allowed);
    }

    let queens = board.pieces_of(us, PieceKind::Queen);
    for from in (board.pieces_of(us, PieceKind::Bishop) | queens) & !straight_pins {
        let mut attacks = bishop_attacks(from, occ) & targets;
        if diagonal_pins.contains(from) {
            attacks &= diagonal_pins;
        }
        push_moves(out, from, attacks, theirs, quiets_allowed);
    }
    for from in (board.pieces_of(us, PieceKind::Rook) | queens) & !diagonal_pins {
        let mut attacks = rook_attacks(from, occ) & targets;
        if straight_pins.contains(from) {
            attacks &= straight_pins;
        }
        push_moves(out, from, attacks, theirs, quiets_allowed);
    }

    generate_pawn_moves(
        board,
        gen_type,
        check_mask,
        straight_pins,
        diagonal_pins,
        out,
    );

    if quiets_allowed && checkers.is_empty() {
        generate_castling(board, out);
    }
}

#[inline(always)]
fn push_moves(out: &mut Vec<Move>, from: Square, targets: Bitboard, theirs: Bitboard, quiets: bool) {
    for to in targets & theirs {
        out.push(Move::capture(from, to));
    }
    if quiets {
        for to in targets & !theirs {
            out.push(Move::quiet(from, to));
        }
    }
}

#[inline(always)]
fn push_promotions(out: &mut Vec<Move>, from: Square, to: Square, capture: bool) {
    for kind in PROMOTION_KINDS {
        out.push(Move::promotion(from, to, kind, capture));
    }
}

fn generate_pawn_moves(
    board: &Board,
    gen_type: GenType,
    check_mask: Bitboard,
    straight_pins: Bitboard,
    diagonal_pins: Bitboard,
    out: &mut Vec<Move>,
) {
    let us = board.side_to_move();
    let them = us.other();
    let theirs = board.colored(them);
    let empty = board.empty_squares();
    let pawns = board.pieces_of(us, PieceKind::Pawn);

    let (push, west_capture, east_capture): (i8, i8, i8) = match us {
        Color::White => (8, 7, 9),
        Color::Black => (-8, -9, -7),
    };
    let (promotion_rank, double_push_rank) = match us {
        Color::White => (Bitboard::RANK_8, Bitboard::RANK_3),
        Color::Black => (Bitboard::RANK_1, Bitboard::RANK_6),
    };
    let origin = |to: Square, delta: i8| (to as i8 - delta) as Square;

    // Pushes: a diagonal pin freezes the pawn, a straight pin only allows file moves.
    let pushers = pawns & !diagonal_pins;
    let free = pushers & !straight_pins;
    let file_pinned = pushers & straight_pins;
    let single = (free.forward(us) | (file_pinned.forward(us) & straight_pins)) & empty;
    let double = (single & double_push_rank).forward(us) & empty;

    let single = single & check_mask;
    if gen_type == GenType::All {
        for to in single & promotion_rank {
            push_promotions(out, origin(to, push), to, false);
        }
        for to in single & !promotion_rank {
            out.push(Move::quiet(origin(to, push), to));
        }
        for to in double & check_mask {
            out.push(Move::new(origin(to, 2 * push), to, Move::DOUBLE_PUSH));
        }
    }

    // Captures: a straight pin freezes the pawn, a diagonal pin allows captures along it.
    let capturers = pawns & !straight_pins;
    let free = capturers & !diagonal_pins;
    let diag_pinned = capturers & diagonal_pins;
    let targets = theirs & check_mask;
    let west = (free.forward_west(us) | (diag_pinned.forward_west(us) & diagonal_pins)) & targets;
    let east = (free.forward_east(us) | (diag_pinned.forward_east(us) & diagonal_pins)) & targets;
    for (hits, delta) in [(west, west_capture), (east, east_capture)] {
        for to in hits & promotion_rank {
            push_promotions(out, origin(to, delta), to, true);
        }
        for to in hits & !promotion_rank {
            out.push(Move::capture(origin(to, delta), to));
        }
    }

    if let Some(ep) = board.ep_square() {
        let candidates = pawn_attacks(them, ep) & pawns;
        for from in candidates {
            if board.ep_capture_is_legal(from, ep) {
                out.push(Move::new(from, ep, Move::EN_PASSANT));
            }
        }
    }
}

fn generate_castling(board: &Board, out: &mut Vec<Move>) {
    let us = board.side_to_move();
    let rights = board.castling();
    let occ = board.occupied();
    let attacked = board.attacked_by(us.other());
    let home = match us {
        Color::White => 0u8,
        Color::Black => 56u8,
    };
    let king = home + 4;

    if rights.has(CastlingRights::king_side(us)) {
        let rook = home + 7;
        let path = between(king, rook);
        if (path & occ).is_empty() && (path & attacked).is_empty() {
            out.push(Move::new(king, home + 6, Move::KING_CASTLE));
        }
    }
    if rights.has(CastlingRights::queen_side(us)) {
        let rook = home;
        // The king crosses d and lands on c; b only needs to be empty.
        let transit = Bitboard::from_square(home + 3) | Bitboard::from_square(home + 2);
        if (between(king, rook) & occ).is_empty() && (transit & attacked).is_empty() {
            out.push(Move::new(king, home + 2, Move::QUEEN_CASTLE));
        }
    }
}

/// Clears `out` and fills it with every legal move.
pub fn legal_moves_into(board: &Board, out: &mut Vec<Move>) {
    out.clear();
    generate_moves(board, GenType::All, out);
}

pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    generate_moves(board, GenType::All, &mut moves);
    moves
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
