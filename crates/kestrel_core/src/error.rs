//! Error types for position setup and move text.

use thiserror::Error;

use crate::types::Color;

/// Reasons a FEN string is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("empty FEN string")]
    Empty,

    #[error("expected 8 ranks in piece placement, found {0}")]
    RankCount(usize),

    #[error("invalid piece character '{0}'")]
    InvalidPiece(char),

    #[error("rank {0} does not describe exactly 8 files")]
    RankLength(u8),

    #[error("missing side to move")]
    MissingSide,

    #[error("invalid side to move '{0}'")]
    InvalidSide(String),

    #[error("invalid castling field '{0}'")]
    InvalidCastling(String),

    #[error("invalid en passant square '{0}'")]
    InvalidEnPassant(String),

    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),

    #[error("{0:?} must have exactly one king")]
    KingCount(Color),

    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// Reasons a move in coordinate notation cannot be played.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveTextError {
    #[error("malformed move text '{0}'")]
    Malformed(String),

    #[error("move '{0}' is not legal in this position")]
    Illegal(String),

    #[error("game history is full")]
    HistoryFull,
}
