//! Coordinate move text ("e2e4", "e7e8q") in both directions.

use crate::{
    board::Board,
    error::MoveTextError,
    movegen::legal_moves,
    types::{Move, PieceKind, coord_to_sq},
};

pub fn move_to_uci(mv: Move) -> String {
    mv.to_string()
}

/// Parses `text` and matches it against the legal moves of `board`.
///
/// Matching against the generated list supplies the castle, en passant and
/// double-push flags. A promotion must name its piece; a non-promotion must
/// not.
pub fn parse_uci_move(board: &Board, text: &str) -> Result<Move, MoveTextError> {
    let malformed = || MoveTextError::Malformed(text.to_string());
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(malformed());
    }

    let from = coord_to_sq(&text[0..2]).ok_or_else(malformed)?;
    let to = coord_to_sq(&text[2..4]).ok_or_else(malformed)?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(c) => match PieceKind::from_char(c) {
            Some(kind @ (PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)) => {
                Some(kind)
            }
            _ => return Err(malformed()),
        },
    };

    legal_moves(board)
        .into_iter()
        .find(|m| m.from() == from && m.to() == to && m.promotion_kind() == promotion)
        .ok_or_else(|| MoveTextError::Illegal(text.to_string()))
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
