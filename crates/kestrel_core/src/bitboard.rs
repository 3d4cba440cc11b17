//! Bitboard set type.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the board.
//! Bit 0 = a1, bit 1 = b1, ..., bit 63 = h8.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, Shr};

use crate::types::{Color, Square};

/// A set of squares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const ALL: Bitboard = Bitboard(!0);

    pub const FILE_A: Bitboard = Bitboard(0x0101010101010101);
    pub const FILE_H: Bitboard = Bitboard(0x8080808080808080);

    pub const RANK_1: Bitboard = Bitboard(0x00000000000000FF);
    pub const RANK_2: Bitboard = Bitboard(0x000000000000FF00);
    pub const RANK_3: Bitboard = Bitboard(0x0000000000FF0000);
    pub const RANK_6: Bitboard = Bitboard(0x0000FF0000000000);
    pub const RANK_7: Bitboard = Bitboard(0x00FF000000000000);
    pub const RANK_8: Bitboard = Bitboard(0xFF00000000000000);

    pub const NOT_FILE_A: Bitboard = Bitboard(!0x0101010101010101);
    pub const NOT_FILE_H: Bitboard = Bitboard(!0x8080808080808080);

    /// Board edges, used when trimming slider occupancy masks.
    pub const EDGES: Bitboard =
        Bitboard(Self::FILE_A.0 | Self::FILE_H.0 | Self::RANK_1.0 | Self::RANK_8.0);

    #[inline(always)]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(1u64 << sq)
    }

    #[inline(always)]
    pub const fn file(file: u8) -> Self {
        Bitboard(Self::FILE_A.0 << file)
    }

    #[inline(always)]
    pub const fn rank(rank: u8) -> Self {
        Bitboard(Self::RANK_1.0 << (rank * 8))
    }

    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_nonempty(self) -> bool {
        self.0 != 0
    }

    #[inline(always)]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u64 << sq)) != 0
    }

    /// True when at least two squares are set.
    #[inline(always)]
    pub const fn more_than_one(self) -> bool {
        self.0 & self.0.wrapping_sub(1) != 0
    }

    #[inline(always)]
    pub fn set(&mut self, sq: Square) {
        self.0 |= 1u64 << sq;
    }

    #[inline(always)]
    pub fn clear(&mut self, sq: Square) {
        self.0 &= !(1u64 << sq);
    }

    #[inline(always)]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    /// Index of the least significant bit, or None if empty.
    #[inline(always)]
    pub const fn lsb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as Square)
        }
    }

    /// Index of the most significant bit, or None if empty.
    #[inline(always)]
    pub const fn msb(self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            Some(63 - self.0.leading_zeros() as Square)
        }
    }

    /// Get and remove the least significant bit.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        if self.0 == 0 {
            None
        } else {
            let sq = self.0.trailing_zeros() as Square;
            self.0 &= self.0 - 1;
            Some(sq)
        }
    }

    #[inline(always)]
    pub const fn north(self) -> Bitboard {
        Bitboard(self.0 << 8)
    }

    #[inline(always)]
    pub const fn south(self) -> Bitboard {
        Bitboard(self.0 >> 8)
    }

    #[inline(always)]
    pub const fn east(self) -> Bitboard {
        Bitboard((self.0 << 1) & Self::NOT_FILE_A.0)
    }

    #[inline(always)]
    pub const fn west(self) -> Bitboard {
        Bitboard((self.0 >> 1) & Self::NOT_FILE_H.0)
    }

    /// One rank toward the opponent of `color`.
    #[inline(always)]
    pub const fn forward(self, color: Color) -> Bitboard {
        match color {
            Color::White => self.north(),
            Color::Black => self.south(),
        }
    }

    /// Forward and one file toward the a-file (the pawn's "left" capture).
    #[inline(always)]
    pub const fn forward_west(self, color: Color) -> Bitboard {
        self.forward(color).west()
    }

    /// Forward and one file toward the h-file.
    #[inline(always)]
    pub const fn forward_east(self, color: Color) -> Bitboard {
        self.forward(color).east()
    }
}

impl BitAnd for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitOr for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self::Output {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Bitboard {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Bitboard(!self.0)
    }
}

impl Shl<u8> for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn shl(self, rhs: u8) -> Self::Output {
        Bitboard(self.0 << rhs)
    }
}

impl Shr<u8> for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn shr(self, rhs: u8) -> Self::Output {
        Bitboard(self.0 >> rhs)
    }
}

/// Iterates set squares from a1 upward, consuming the set.
impl Iterator for Bitboard {
    type Item = Square;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.popcount() as usize;
        (n, Some(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_square() {
        assert_eq!(Bitboard::from_square(0).0, 1); // a1
        assert_eq!(Bitboard::from_square(7).0, 128); // h1
        assert_eq!(Bitboard::from_square(63).0, 1 << 63); // h8
    }

    #[test]
    fn test_popcount_and_more_than_one() {
        assert_eq!(Bitboard::EMPTY.popcount(), 0);
        assert_eq!(Bitboard::file(0), Bitboard::FILE_A);
        assert_eq!(Bitboard::rank(7), Bitboard::RANK_8);
        assert_eq!(Bitboard::ALL.popcount(), 64);
        assert!(!Bitboard::EMPTY.more_than_one());
        assert!(!Bitboard::from_square(9).more_than_one());
        assert!(Bitboard(0b101).more_than_one());
    }

    #[test]
    fn test_lsb_msb() {
        let bb = Bitboard(0b1010_0100);
        assert_eq!(bb.lsb(), Some(2));
        assert_eq!(bb.msb(), Some(7));
        assert_eq!(Bitboard::EMPTY.msb(), None);
    }

    #[test]
    fn test_iterator() {
        let bb = Bitboard(0b1010);
        let squares: Vec<u8> = bb.collect();
        assert_eq!(squares, vec![1, 3]);
    }

    #[test]
    fn test_shifts() {
        let a1 = Bitboard::from_square(0);
        assert_eq!(a1.north(), Bitboard::from_square(8));
        assert_eq!(a1.east(), Bitboard::from_square(1));
        assert_eq!(a1.west(), Bitboard::EMPTY);

        let h1 = Bitboard::from_square(7);
        assert_eq!(h1.east(), Bitboard::EMPTY);
        assert_eq!(h1.west(), Bitboard::from_square(6));
    }

    #[test]
    fn test_forward_by_color() {
        let e4 = Bitboard::from_square(28);
        assert_eq!(e4.forward(Color::White), Bitboard::from_square(36));
        assert_eq!(e4.forward(Color::Black), Bitboard::from_square(20));
        assert_eq!(e4.forward_west(Color::White), Bitboard::from_square(35));
        assert_eq!(e4.forward_east(Color::Black), Bitboard::from_square(21));
        // a-pawn cannot capture toward the h-file
        assert_eq!(
            Bitboard::from_square(8).forward_west(Color::White),
            Bitboard::EMPTY
        );
    }
}
