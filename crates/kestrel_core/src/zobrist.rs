//! Zobrist hashing for chess positions.
//!
//! The hash is the XOR of random keys for:
//! - each piece on each square (12 pieces × 64 squares)
//! - black to move
//! - the castling-rights mask (16 codes)
//! - the en passant file (8 values, only while a capture is possible)
//!
//! `Board::make_move` updates it incrementally; `Board::compute_hash`
//! recomputes it from scratch.

use crate::types::{CastlingRights, Piece, Square};

pub struct ZobristKeys {
    /// Indexed by [color][piece_kind][square]
    pub pieces: [[[u64; 64]; 6]; 2],
    /// XOR-ed in when black is to move
    pub side_to_move: u64,
    /// One key per castling-rights mask
    pub castling: [u64; 16],
    /// Indexed by en passant file (0-7)
    pub en_passant: [u64; 8],
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl ZobristKeys {
    /// Generates the keys with xorshift64 from a fixed seed.
    pub const fn new() -> Self {
        const fn xorshift64(mut state: u64) -> u64 {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        }

        let mut state = 0x123456789ABCDEF0u64;

        let mut pieces = [[[0u64; 64]; 6]; 2];
        let mut color = 0;
        while color < 2 {
            let mut piece = 0;
            while piece < 6 {
                let mut sq = 0;
                while sq < 64 {
                    state = xorshift64(state);
                    pieces[color][piece][sq] = state;
                    sq += 1;
                }
                piece += 1;
            }
            color += 1;
        }

        state = xorshift64(state);
        let side_to_move = state;

        // Code 0 (no rights) hashes to nothing.
        let mut castling = [0u64; 16];
        let mut i = 1;
        while i < 16 {
            state = xorshift64(state);
            castling[i] = state;
            i += 1;
        }

        let mut en_passant = [0u64; 8];
        let mut i = 0;
        while i < 8 {
            state = xorshift64(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            side_to_move,
            castling,
            en_passant,
        }
    }

    #[inline(always)]
    pub fn piece_key(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.color.idx()][piece.kind.idx()][sq as usize]
    }

    #[inline(always)]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.code()]
    }

    /// Key for an en passant target square (only its file matters).
    #[inline(always)]
    pub fn ep_key(&self, sq: Square) -> u64 {
        self.en_passant[(sq % 8) as usize]
    }
}

/// Global static Zobrist keys, computed at compile time.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
