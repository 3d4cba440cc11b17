//! Pre-computed attack tables.
//!
//! This module contains:
//! - Knight, king and per-color pawn attack tables (evaluated at compile time)
//! - Direction rays and the ray-cast reference for sliding pieces
//! - Between/line tables for pins, checks and castling paths
//!
//! Sliding piece lookups themselves go through [`crate::magic`].

use std::sync::LazyLock;

use crate::bitboard::Bitboard;
use crate::magic;
use crate::types::{Color, Square};

/// Builds a square-indexed table from (file, rank) jump offsets.
const fn jump_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let (df, dr) = deltas[i];
            let f = file + df;
            let r = rank + dr;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

pub static KNIGHT_ATTACKS: [Bitboard; 64] = jump_table(&[
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
]);

pub static KING_ATTACKS: [Bitboard; 64] = jump_table(&[
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
]);

/// Pawn captures by color: `PAWN_ATTACKS[color][sq]`.
pub static PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    jump_table(&[(-1, 1), (1, 1)]),
    jump_table(&[(-1, -1), (1, -1)]),
];

#[inline(always)]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.idx()][sq as usize]
}

#[inline(always)]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq as usize]
}

#[inline(always)]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq as usize]
}

#[inline(always)]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    magic::bishop_attacks(sq, occupied)
}

#[inline(always)]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    magic::rook_attacks(sq, occupied)
}

#[inline(always)]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

// =============================================================================
// Directions and rays
// =============================================================================

/// Compass direction, white's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];
    pub const ROOK: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
    pub const BISHOP: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self as usize
    }

    /// (file, rank) step.
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    #[inline(always)]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::NorthEast | Direction::SouthEast | Direction::SouthWest | Direction::NorthWest
        )
    }

    /// Direction from `from` toward `to` when both share a line.
    pub fn towards(from: Square, to: Square) -> Option<Direction> {
        if from == to {
            return None;
        }
        let df = (to % 8) as i8 - (from % 8) as i8;
        let dr = (to / 8) as i8 - (from / 8) as i8;
        if df != 0 && dr != 0 && df.abs() != dr.abs() {
            return None;
        }
        Some(match (df.signum(), dr.signum()) {
            (0, 1) => Direction::North,
            (1, 1) => Direction::NorthEast,
            (1, 0) => Direction::East,
            (1, -1) => Direction::SouthEast,
            (0, -1) => Direction::South,
            (-1, -1) => Direction::SouthWest,
            (-1, 0) => Direction::West,
            _ => Direction::NorthWest,
        })
    }
}

/// `RAYS[direction][square]`: every square in that direction, excluding the origin.
pub static RAYS: [[Bitboard; 64]; 8] = {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = Direction::ALL[dir].delta();
        let mut sq = 0usize;
        while sq < 64 {
            let mut f = (sq % 8) as i8 + df;
            let mut r = (sq / 8) as i8 + dr;
            let mut bits = 0u64;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
                f += df;
                r += dr;
            }
            rays[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    rays
};

#[inline(always)]
pub fn ray(dir: Direction, sq: Square) -> Bitboard {
    RAYS[dir.idx()][sq as usize]
}

/// Ray-cast attacks along `dirs`, stopping at (and including) the first blocker.
///
/// This is the slow reference the magic tables are built and verified against.
pub fn sliding_attacks_slow(dirs: &[Direction], sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &dir in dirs {
        let r = ray(dir, sq);
        let blockers = r & occupied;
        // Rays with increasing square index meet their nearest blocker at the LSB.
        let nearest = match dir {
            Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest => {
                blockers.lsb()
            }
            _ => blockers.msb(),
        };
        attacks |= match nearest {
            Some(b) => r & !ray(dir, b),
            None => r,
        };
    }
    attacks
}

// =============================================================================
// Line tables
// =============================================================================

struct LineTables {
    between: [[Bitboard; 64]; 64],
    line: [[Bitboard; 64]; 64],
}

static LINES: LazyLock<Box<LineTables>> = LazyLock::new(|| {
    let mut tables = Box::new(LineTables {
        between: [[Bitboard::EMPTY; 64]; 64],
        line: [[Bitboard::EMPTY; 64]; 64],
    });
    for a in 0..64u8 {
        for b in 0..64u8 {
            let Some(dir) = Direction::towards(a, b) else {
                continue;
            };
            let opposite = Direction::ALL[(dir.idx() + 4) % 8];
            tables.between[a as usize][b as usize] = ray(dir, a) & !ray(dir, b) & !Bitboard::from_square(b);
            tables.line[a as usize][b as usize] =
                ray(dir, a) | ray(opposite, a) | Bitboard::from_square(a);
        }
    }
    tables
});

/// Squares strictly between two aligned squares; empty if not aligned.
#[inline(always)]
pub fn between(a: Square, b: Square) -> Bitboard {
    LINES.between[a as usize][b as usize]
}

/// The full edge-to-edge line through two aligned squares; empty if not aligned.
#[inline(always)]
pub fn line(a: Square, b: Square) -> Bitboard {
    LINES.line[a as usize][b as usize]
}

/// Squares from next to `a` through `b` up to the board edge.
pub fn ray_from(a: Square, b: Square) -> Bitboard {
    match Direction::towards(a, b) {
        Some(dir) => ray(dir, a),
        None => Bitboard::EMPTY,
    }
}

#[cfg(test)]
#[path = "attacks_tests.rs"]
mod attacks_tests;
