//! Basic chess vocabulary: colors, pieces, squares, castling rights and the
//! packed move encoding.

use std::fmt;

/// Square index 0..64, a1 = 0, h1 = 7, a8 = 56, h8 = 63.
pub type Square = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline(always)]
    pub const fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline(always)]
    pub const fn idx(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline(always)]
    pub const fn idx(self) -> usize {
        self as usize
    }

    /// Lowercase letter used in FEN and move text.
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Index 0..12, white pieces first.
    #[inline(always)]
    pub const fn idx(self) -> usize {
        self.color.idx() * 6 + self.kind.idx()
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub fn to_char(self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(color, kind))
    }
}

// =============================================================================
// Castling rights
// =============================================================================

/// Castling rights as a 4-bit mask; the raw value doubles as the Zobrist code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CastlingRights(pub u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KING: u8 = 1;
    pub const WHITE_QUEEN: u8 = 2;
    pub const BLACK_KING: u8 = 4;
    pub const BLACK_QUEEN: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(15);

    #[inline(always)]
    pub const fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    #[inline(always)]
    pub fn remove(&mut self, flags: u8) {
        self.0 &= !flags;
    }

    #[inline(always)]
    pub fn add(&mut self, flags: u8) {
        self.0 |= flags;
    }

    #[inline(always)]
    pub const fn code(self) -> usize {
        self.0 as usize
    }

    pub const fn king_side(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KING,
            Color::Black => Self::BLACK_KING,
        }
    }

    pub const fn queen_side(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEEN,
            Color::Black => Self::BLACK_QUEEN,
        }
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("-");
        }
        for (flag, c) in [
            (Self::WHITE_KING, 'K'),
            (Self::WHITE_QUEEN, 'Q'),
            (Self::BLACK_KING, 'k'),
            (Self::BLACK_QUEEN, 'q'),
        ] {
            if self.has(flag) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// Moves
// =============================================================================

/// A move packed into 16 bits: origin (6), destination (6), kind (4).
///
/// Kind codes: 0 quiet, 1 double pawn push, 2 king-side castle, 3 queen-side
/// castle, 4 capture, 5 en passant, 8..=11 promotion to N/B/R/Q and
/// 12..=15 the same promotions with a capture. Bit 2 marks captures, bit 3
/// marks promotions.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// "No move". Also used for the null move in search.
    pub const NULL: Move = Move(0);

    pub const QUIET: u16 = 0;
    pub const DOUBLE_PUSH: u16 = 1;
    pub const KING_CASTLE: u16 = 2;
    pub const QUEEN_CASTLE: u16 = 3;
    pub const CAPTURE: u16 = 4;
    pub const EN_PASSANT: u16 = 5;
    pub const PROMOTION: u16 = 8;
    pub const PROMOTION_CAPTURE: u16 = 12;

    #[inline(always)]
    pub const fn new(from: Square, to: Square, flags: u16) -> Move {
        Move((from as u16) | ((to as u16) << 6) | (flags << 12))
    }

    #[inline(always)]
    pub const fn quiet(from: Square, to: Square) -> Move {
        Move::new(from, to, Self::QUIET)
    }

    #[inline(always)]
    pub const fn capture(from: Square, to: Square) -> Move {
        Move::new(from, to, Self::CAPTURE)
    }

    /// Promotion to `kind` (knight, bishop, rook or queen).
    #[inline(always)]
    pub const fn promotion(from: Square, to: Square, kind: PieceKind, capture: bool) -> Move {
        let base = if capture {
            Self::PROMOTION_CAPTURE
        } else {
            Self::PROMOTION
        };
        let offset = match kind {
            PieceKind::Bishop => 1,
            PieceKind::Rook => 2,
            PieceKind::Queen => 3,
            _ => 0,
        };
        Move::new(from, to, base | offset)
    }

    #[inline(always)]
    pub const fn from_raw(raw: u16) -> Move {
        Move(raw)
    }

    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub const fn from(self) -> Square {
        (self.0 & 0x3f) as Square
    }

    #[inline(always)]
    pub const fn to(self) -> Square {
        ((self.0 >> 6) & 0x3f) as Square
    }

    #[inline(always)]
    pub const fn flags(self) -> u16 {
        self.0 >> 12
    }

    #[inline(always)]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub const fn is_capture(self) -> bool {
        self.flags() & Self::CAPTURE != 0
    }

    #[inline(always)]
    pub const fn is_promotion(self) -> bool {
        self.flags() & Self::PROMOTION != 0
    }

    /// Neither a capture nor a promotion.
    #[inline(always)]
    pub const fn is_quiet(self) -> bool {
        self.flags() & (Self::CAPTURE | Self::PROMOTION) == 0
    }

    #[inline(always)]
    pub const fn is_en_passant(self) -> bool {
        self.flags() == Self::EN_PASSANT
    }

    #[inline(always)]
    pub const fn is_double_push(self) -> bool {
        self.flags() == Self::DOUBLE_PUSH
    }

    #[inline(always)]
    pub const fn is_castle(self) -> bool {
        let f = self.flags();
        f == Self::KING_CASTLE || f == Self::QUEEN_CASTLE
    }

    pub const fn promotion_kind(self) -> Option<PieceKind> {
        if !self.is_promotion() {
            return None;
        }
        Some(match self.flags() & 3 {
            0 => PieceKind::Knight,
            1 => PieceKind::Bishop,
            2 => PieceKind::Rook,
            _ => PieceKind::Queen,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", sq_to_coord(self.from()), sq_to_coord(self.to()))?;
        if let Some(kind) = self.promotion_kind() {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self}, flags={})", self.flags())
    }
}

// Helpers
#[inline(always)]
pub const fn file_of(sq: Square) -> u8 {
    sq % 8
}

#[inline(always)]
pub const fn rank_of(sq: Square) -> u8 {
    sq / 8
}

pub fn sq(file: i8, rank: i8) -> Option<Square> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank as u8) * 8 + (file as u8))
    } else {
        None
    }
}

pub fn sq_to_coord(sq: Square) -> String {
    let f = (b'a' + (sq % 8)) as char;
    let r = (b'1' + (sq / 8)) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<Square> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    Some((r - b'1') * 8 + (f - b'a'))
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
