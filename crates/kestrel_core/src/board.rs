//! Board state: piece bitboards, mailbox and the per-ply history arena.
//!
//! `make_move` pushes a [`StateInfo`] onto a fixed-capacity arena and
//! `undo_move` pops it; everything a move destroys (captured piece, castling
//! rights, en passant square, no-progress counter, hash) lives in that node.

use std::fmt;

use crate::attacks::{
    between, bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};
use crate::bitboard::Bitboard;
use crate::error::FenError;
use crate::movegen::legal_moves;
use crate::types::{
    CastlingRights, Color, Move, Piece, PieceKind, Square, coord_to_sq, rank_of, sq_to_coord,
};
use crate::zobrist::ZOBRIST;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Capacity of the history arena, in plies.
pub const MAX_GAME_PLY: usize = 1024;

const DARK_SQUARES: Bitboard = Bitboard(0xAA55_AA55_AA55_AA55);

/// Castling rights lost when a piece leaves or lands on each square.
static CASTLING_LOSS: [u8; 64] = {
    let mut table = [0u8; 64];
    table[0] = CastlingRights::WHITE_QUEEN;
    table[4] = CastlingRights::WHITE_KING | CastlingRights::WHITE_QUEEN;
    table[7] = CastlingRights::WHITE_KING;
    table[56] = CastlingRights::BLACK_QUEEN;
    table[60] = CastlingRights::BLACK_KING | CastlingRights::BLACK_QUEEN;
    table[63] = CastlingRights::BLACK_KING;
    table
};

/// Rook origin and destination for a castling king destination.
pub const fn castle_rook_squares(king_to: Square) -> (Square, Square) {
    match king_to {
        6 => (7, 5),
        2 => (0, 3),
        62 => (63, 61),
        _ => (56, 59),
    }
}

/// One node of the position history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateInfo {
    /// Move that produced this position (`Move::NULL` at the root or after a null move)
    pub mv: Move,
    pub moved: Option<Piece>,
    pub captured: Option<Piece>,
    pub castling: CastlingRights,
    /// Set only when an enemy pawn can legally capture en passant
    pub ep_square: Option<Square>,
    pub halfmove_clock: u16,
    pub plies_from_null: u16,
    pub hash: u64,
    /// Number of earlier occurrences of this position
    pub repetition: u8,
    /// Squares attacked by each color, computed without the opposing king as a blocker
    pub attacked: [Bitboard; 2],
    /// Enemy pieces giving check to the side to move
    pub checkers: Bitboard,
}

#[derive(Clone)]
pub struct Board {
    pieces: [Bitboard; 6],
    colors: [Bitboard; 2],
    mailbox: [Option<Piece>; 64],
    side_to_move: Color,
    fullmove_number: u32,
    history: Box<[StateInfo]>,
    ply: usize,
}

impl Board {
    pub fn startpos() -> Self {
        Self::from_fen(START_FEN).expect("start position FEN is valid")
    }

    fn empty() -> Self {
        Board {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            mailbox: [None; 64],
            side_to_move: Color::White,
            fullmove_number: 1,
            history: vec![StateInfo::default(); MAX_GAME_PLY].into_boxed_slice(),
            ply: 0,
        }
    }

    /// Parses a FEN string. The halfmove clock and fullmove number may be omitted.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or(FenError::Empty)?;
        let side = fields.next().ok_or(FenError::MissingSide)?;
        let castling = fields.next().unwrap_or("-");
        let ep = fields.next().unwrap_or("-");
        let halfmove = fields.next().unwrap_or("0");
        let fullmove = fields.next().unwrap_or("1");

        let mut board = Board::empty();

        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(FenError::RankCount(rows.len()));
        }
        for (i, row) in rows.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for ch in row.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_char(ch).ok_or(FenError::InvalidPiece(ch))?;
                    if file >= 8 {
                        return Err(FenError::RankLength(rank + 1));
                    }
                    board.put_piece(piece, rank * 8 + file);
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::RankLength(rank + 1));
                }
            }
            if file != 8 {
                return Err(FenError::RankLength(rank + 1));
            }
        }

        board.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSide(other.to_string())),
        };

        for color in Color::ALL {
            if board.pieces_of(color, PieceKind::King).popcount() != 1 {
                return Err(FenError::KingCount(color));
            }
        }

        let mut rights = CastlingRights::NONE;
        if castling != "-" {
            for c in castling.chars() {
                let flag = match c {
                    'K' => CastlingRights::WHITE_KING,
                    'Q' => CastlingRights::WHITE_QUEEN,
                    'k' => CastlingRights::BLACK_KING,
                    'q' => CastlingRights::BLACK_QUEEN,
                    _ => return Err(FenError::InvalidCastling(castling.to_string())),
                };
                rights.add(flag);
            }
        }
        // Rights without the king and rook on their home squares are meaningless.
        for (flag, color, king_sq, rook_sq) in [
            (CastlingRights::WHITE_KING, Color::White, 4, 7),
            (CastlingRights::WHITE_QUEEN, Color::White, 4, 0),
            (CastlingRights::BLACK_KING, Color::Black, 60, 63),
            (CastlingRights::BLACK_QUEEN, Color::Black, 60, 56),
        ] {
            if board.piece_at(king_sq) != Some(Piece::new(color, PieceKind::King))
                || board.piece_at(rook_sq) != Some(Piece::new(color, PieceKind::Rook))
            {
                rights.remove(flag);
            }
        }

        let ep_square = if ep == "-" {
            None
        } else {
            let sq = coord_to_sq(ep).ok_or_else(|| FenError::InvalidEnPassant(ep.to_string()))?;
            let expected_rank = match board.side_to_move {
                Color::White => 5,
                Color::Black => 2,
            };
            if rank_of(sq) != expected_rank {
                return Err(FenError::InvalidEnPassant(ep.to_string()));
            }
            Some(sq)
        };

        let halfmove_clock: u16 = halfmove
            .parse()
            .map_err(|_| FenError::InvalidCounter(halfmove.to_string()))?;
        let fullmove_number: u16 = fullmove
            .parse()
            .map_err(|_| FenError::InvalidCounter(fullmove.to_string()))?;
        board.fullmove_number = u32::from(fullmove_number);

        let them = board.side_to_move.other();
        let their_king = board.king_square(them);
        if (board.attackers_to(their_king, board.occupied()) & board.colored(board.side_to_move))
            .is_nonempty()
        {
            return Err(FenError::OpponentInCheck);
        }

        board.history[0] = StateInfo {
            castling: rights,
            halfmove_clock,
            ..StateInfo::default()
        };
        if let Some(ep) = ep_square
            && board.has_legal_ep_capture(ep)
        {
            board.history[0].ep_square = Some(ep);
        }
        board.history[0].hash = board.compute_hash();
        board.refresh_attack_state();
        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.mailbox[(rank * 8 + file) as usize] {
                    Some(piece) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }
        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = self
            .ep_square()
            .map(sq_to_coord)
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{placement} {side} {} {ep} {} {}",
            self.castling(),
            self.halfmove_clock(),
            self.fullmove_number
        )
    }

    // =========================================================================
    // Placement primitives (no hashing)
    // =========================================================================

    #[inline(always)]
    fn put_piece(&mut self, piece: Piece, sq: Square) {
        let bb = Bitboard::from_square(sq);
        self.pieces[piece.kind.idx()] |= bb;
        self.colors[piece.color.idx()] |= bb;
        self.mailbox[sq as usize] = Some(piece);
    }

    #[inline(always)]
    fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.mailbox[sq as usize].take()?;
        let bb = Bitboard::from_square(sq);
        self.pieces[piece.kind.idx()] ^= bb;
        self.colors[piece.color.idx()] ^= bb;
        Some(piece)
    }

    #[inline(always)]
    fn move_piece(&mut self, from: Square, to: Square) {
        if let Some(piece) = self.remove_piece(from) {
            self.put_piece(piece, to);
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.mailbox[sq as usize]
    }

    #[inline(always)]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.idx()]
    }

    #[inline(always)]
    pub fn colored(&self, color: Color) -> Bitboard {
        self.colors[color.idx()]
    }

    #[inline(always)]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[kind.idx()] & self.colors[color.idx()]
    }

    #[inline(always)]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline(always)]
    pub fn empty_squares(&self) -> Bitboard {
        !self.occupied()
    }

    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Square {
        let kings = self.pieces_of(color, PieceKind::King);
        debug_assert!(kings.is_nonempty(), "{color:?} king missing");
        kings.0.trailing_zeros() as Square
    }

    #[inline(always)]
    pub fn state(&self) -> &StateInfo {
        &self.history[self.ply]
    }

    /// Plies played since the position was set up.
    #[inline(always)]
    pub fn ply(&self) -> usize {
        self.ply
    }

    #[inline(always)]
    pub fn hash(&self) -> u64 {
        self.state().hash
    }

    #[inline(always)]
    pub fn checkers(&self) -> Bitboard {
        self.state().checkers
    }

    #[inline(always)]
    pub fn in_check(&self) -> bool {
        self.state().checkers.is_nonempty()
    }

    #[inline(always)]
    pub fn castling(&self) -> CastlingRights {
        self.state().castling
    }

    #[inline(always)]
    pub fn ep_square(&self) -> Option<Square> {
        self.state().ep_square
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u16 {
        self.state().halfmove_clock
    }

    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Squares attacked by `color` (its opponent's king treated as transparent).
    #[inline(always)]
    pub fn attacked_by(&self, color: Color) -> Bitboard {
        self.state().attacked[color.idx()]
    }

    /// The move that produced the current position.
    #[inline(always)]
    pub fn last_move(&self) -> Move {
        self.state().mv
    }

    /// Piece and destination of the move `back` plies ago (1 = the last move).
    pub fn recent_move(&self, back: usize) -> Option<(Piece, Square)> {
        if back == 0 || back > self.ply {
            return None;
        }
        let st = &self.history[self.ply + 1 - back];
        match st.moved {
            Some(piece) if !st.mv.is_null() => Some((piece, st.mv.to())),
            _ => None,
        }
    }

    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let pawns_and_king = self.pieces(PieceKind::Pawn) | self.pieces(PieceKind::King);
        (self.colored(color) & !pawns_and_king).is_nonempty()
    }

    pub fn history_full(&self) -> bool {
        self.ply + 1 >= MAX_GAME_PLY
    }

    // =========================================================================
    // Attacks, checks and pins
    // =========================================================================

    /// Pieces of both colors attacking `sq` given occupancy `occ`.
    pub fn attackers_to(&self, sq: Square, occ: Bitboard) -> Bitboard {
        let diagonal = self.pieces(PieceKind::Bishop) | self.pieces(PieceKind::Queen);
        let straight = self.pieces(PieceKind::Rook) | self.pieces(PieceKind::Queen);
        (pawn_attacks(Color::White, sq) & self.pieces_of(Color::Black, PieceKind::Pawn))
            | (pawn_attacks(Color::Black, sq) & self.pieces_of(Color::White, PieceKind::Pawn))
            | (knight_attacks(sq) & self.pieces(PieceKind::Knight))
            | (king_attacks(sq) & self.pieces(PieceKind::King))
            | (bishop_attacks(sq, occ) & diagonal)
            | (rook_attacks(sq, occ) & straight)
    }

    /// Enemy pieces (relative to the side to move) attacking `sq`.
    pub fn get_attackers(&self, sq: Square) -> Bitboard {
        self.attackers_to(sq, self.occupied()) & self.colored(self.side_to_move.other())
    }

    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        (self.attackers_to(sq, self.occupied()) & self.colored(by)).is_nonempty()
    }

    fn attacks_of(&self, color: Color, occ: Bitboard) -> Bitboard {
        let pawns = self.pieces_of(color, PieceKind::Pawn);
        let mut attacks = pawns.forward_west(color) | pawns.forward_east(color);
        for sq in self.pieces_of(color, PieceKind::Knight) {
            attacks |= knight_attacks(sq);
        }
        let queens = self.pieces_of(color, PieceKind::Queen);
        for sq in self.pieces_of(color, PieceKind::Bishop) | queens {
            attacks |= bishop_attacks(sq, occ);
        }
        for sq in self.pieces_of(color, PieceKind::Rook) | queens {
            attacks |= rook_attacks(sq, occ);
        }
        attacks | king_attacks(self.king_square(color))
    }

    fn refresh_attack_state(&mut self) {
        let occ = self.occupied();
        let white = self.attacks_of(
            Color::White,
            occ & !self.pieces_of(Color::Black, PieceKind::King),
        );
        let black = self.attacks_of(
            Color::Black,
            occ & !self.pieces_of(Color::White, PieceKind::King),
        );
        let us = self.side_to_move;
        let checkers = self.attackers_to(self.king_square(us), occ) & self.colored(us.other());
        let st = &mut self.history[self.ply];
        st.attacked = [white, black];
        st.checkers = checkers;
    }

    /// Pin rays for the side to move: `(straight, diagonal)`.
    ///
    /// Each mask is the union of the squares between the king and a pinning
    /// slider, plus the pinner itself.
    pub fn compute_pins(&self) -> (Bitboard, Bitboard) {
        let us = self.side_to_move;
        let them = us.other();
        let king = self.king_square(us);
        let occ = self.occupied();
        let ours = self.colored(us);
        let queens = self.pieces_of(them, PieceKind::Queen);

        let pin_mask = |candidates: Bitboard| {
            let mut mask = Bitboard::EMPTY;
            for pinner in candidates {
                let path = between(king, pinner);
                let blockers = path & occ;
                if blockers.popcount() == 1 && (blockers & ours).is_nonempty() {
                    mask |= path | Bitboard::from_square(pinner);
                }
            }
            mask
        };

        let straight = pin_mask(
            rook_attacks(king, Bitboard::EMPTY) & (self.pieces_of(them, PieceKind::Rook) | queens),
        );
        let diagonal = pin_mask(
            bishop_attacks(king, Bitboard::EMPTY)
                & (self.pieces_of(them, PieceKind::Bishop) | queens),
        );
        (straight, diagonal)
    }

    /// Whether the side to move's pawn on `from` may capture en passant onto `ep`.
    ///
    /// Checks the king directly against the post-capture occupancy, which
    /// covers the rank pin where both pawns leave the king's rank together.
    pub fn ep_capture_is_legal(&self, from: Square, ep: Square) -> bool {
        let us = self.side_to_move;
        let captured = ep ^ 8;
        let king = self.king_square(us);
        let occ = (self.occupied() ^ Bitboard::from_square(from) ^ Bitboard::from_square(captured))
            | Bitboard::from_square(ep);
        let attackers = self.attackers_to(king, occ)
            & self.colored(us.other())
            & !Bitboard::from_square(captured);
        attackers.is_empty()
    }

    fn has_legal_ep_capture(&self, ep: Square) -> bool {
        let us = self.side_to_move;
        let them = us.other();
        if self.piece_at(ep).is_some()
            || self.piece_at(ep ^ 8) != Some(Piece::new(them, PieceKind::Pawn))
        {
            return false;
        }
        let mut capturers = pawn_attacks(them, ep) & self.pieces_of(us, PieceKind::Pawn);
        capturers.any(|from| self.ep_capture_is_legal(from, ep))
    }

    /// Whether `mv` (legal for the side to move) gives check, without playing it.
    pub fn is_check_move(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let them = us.other();
        let target = self.king_square(them);
        let from = mv.from();
        let to = mv.to();
        let from_bb = Bitboard::from_square(from);
        let to_bb = Bitboard::from_square(to);

        let mut diagonal = (self.pieces_of(us, PieceKind::Bishop)
            | self.pieces_of(us, PieceKind::Queen))
            & !from_bb;
        let mut straight =
            (self.pieces_of(us, PieceKind::Rook) | self.pieces_of(us, PieceKind::Queen)) & !from_bb;

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(to);
            let occ = self.occupied()
                ^ from_bb
                ^ to_bb
                ^ Bitboard::from_square(rook_from)
                ^ Bitboard::from_square(rook_to);
            straight = (straight & !Bitboard::from_square(rook_from)) | Bitboard::from_square(rook_to);
            return (rook_attacks(target, occ) & straight).is_nonempty()
                || (bishop_attacks(target, occ) & diagonal).is_nonempty();
        }

        let mut occ = (self.occupied() ^ from_bb) | to_bb;
        if mv.is_en_passant() {
            occ ^= Bitboard::from_square(to ^ 8);
        }

        let Some(moved) = self.piece_at(from) else {
            return false;
        };
        let kind = mv.promotion_kind().unwrap_or(moved.kind);
        match kind {
            PieceKind::Pawn => {
                if pawn_attacks(us, to).contains(target) {
                    return true;
                }
            }
            PieceKind::Knight => {
                if knight_attacks(to).contains(target) {
                    return true;
                }
            }
            PieceKind::Bishop => diagonal |= to_bb,
            PieceKind::Rook => straight |= to_bb,
            PieceKind::Queen => {
                diagonal |= to_bb;
                straight |= to_bb;
            }
            PieceKind::King => {}
        }

        // Direct slider checks and anything uncovered by vacating `from`.
        (bishop_attacks(target, occ) & diagonal).is_nonempty()
            || (rook_attacks(target, occ) & straight).is_nonempty()
    }

    // =========================================================================
    // Make / undo
    // =========================================================================

    /// Plays a legal move, pushing a new history node.
    pub fn make_move(&mut self, mv: Move) {
        debug_assert!(!self.history_full(), "game history overflow");
        let us = self.side_to_move;
        let them = us.other();
        let from = mv.from();
        let to = mv.to();
        let prev = self.history[self.ply];
        let moved = self
            .piece_at(from)
            .expect("make_move: no piece on origin square");

        let mut hash = prev.hash ^ ZOBRIST.side_to_move ^ ZOBRIST.castling_key(prev.castling);
        if let Some(ep) = prev.ep_square {
            hash ^= ZOBRIST.ep_key(ep);
        }

        let mut captured = None;
        let mut halfmove_clock = prev.halfmove_clock.saturating_add(1);

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(to);
            let rook = Piece::new(us, PieceKind::Rook);
            self.move_piece(from, to);
            self.move_piece(rook_from, rook_to);
            hash ^= ZOBRIST.piece_key(moved, from)
                ^ ZOBRIST.piece_key(moved, to)
                ^ ZOBRIST.piece_key(rook, rook_from)
                ^ ZOBRIST.piece_key(rook, rook_to);
        } else {
            if mv.is_capture() {
                let capture_sq = if mv.is_en_passant() { to ^ 8 } else { to };
                captured = self.remove_piece(capture_sq);
                if let Some(victim) = captured {
                    hash ^= ZOBRIST.piece_key(victim, capture_sq);
                }
            }
            self.move_piece(from, to);
            hash ^= ZOBRIST.piece_key(moved, from);
            match mv.promotion_kind() {
                Some(kind) => {
                    let promoted = Piece::new(us, kind);
                    self.remove_piece(to);
                    self.put_piece(promoted, to);
                    hash ^= ZOBRIST.piece_key(promoted, to);
                }
                None => hash ^= ZOBRIST.piece_key(moved, to),
            }
            if moved.kind == PieceKind::Pawn || captured.is_some() {
                halfmove_clock = 0;
            }
        }

        let mut castling = prev.castling;
        castling.remove(CASTLING_LOSS[from as usize] | CASTLING_LOSS[to as usize]);
        hash ^= ZOBRIST.castling_key(castling);

        self.side_to_move = them;
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.ply += 1;
        self.history[self.ply] = StateInfo {
            mv,
            moved: Some(moved),
            captured,
            castling,
            ep_square: None,
            halfmove_clock,
            plies_from_null: prev.plies_from_null + 1,
            hash,
            repetition: 0,
            attacked: prev.attacked,
            checkers: Bitboard::EMPTY,
        };

        if mv.is_double_push() {
            let ep = (from + to) / 2;
            if self.has_legal_ep_capture(ep) {
                let st = &mut self.history[self.ply];
                st.ep_square = Some(ep);
                st.hash ^= ZOBRIST.ep_key(ep);
            }
        }

        self.refresh_attack_state();
        self.update_repetition();
        debug_assert!(self.is_consistent());
    }

    /// Takes back the last move played with [`Board::make_move`].
    pub fn undo_move(&mut self) {
        debug_assert!(self.ply > 0, "undo_move without a matching make_move");
        let st = self.history[self.ply];
        self.ply -= 1;
        self.side_to_move = self.side_to_move.other();
        if self.side_to_move == Color::Black {
            self.fullmove_number -= 1;
        }

        let from = st.mv.from();
        let to = st.mv.to();
        if st.mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(to);
            self.move_piece(to, from);
            self.move_piece(rook_to, rook_from);
            return;
        }

        if st.mv.is_promotion() {
            self.remove_piece(to);
            if let Some(pawn) = st.moved {
                self.put_piece(pawn, from);
            }
        } else {
            self.move_piece(to, from);
        }
        if let Some(victim) = st.captured {
            let sq = if st.mv.is_en_passant() { to ^ 8 } else { to };
            self.put_piece(victim, sq);
        }
        debug_assert!(self.is_consistent());
    }

    /// Passes the turn. Must not be called while in check.
    pub fn make_null_move(&mut self) {
        debug_assert!(!self.in_check(), "null move while in check");
        debug_assert!(!self.history_full(), "game history overflow");
        let prev = self.history[self.ply];
        let mut hash = prev.hash ^ ZOBRIST.side_to_move;
        if let Some(ep) = prev.ep_square {
            hash ^= ZOBRIST.ep_key(ep);
        }
        self.side_to_move = self.side_to_move.other();
        self.ply += 1;
        self.history[self.ply] = StateInfo {
            mv: Move::NULL,
            moved: None,
            captured: None,
            castling: prev.castling,
            ep_square: None,
            halfmove_clock: prev.halfmove_clock.saturating_add(1),
            plies_from_null: 0,
            hash,
            repetition: 0,
            attacked: prev.attacked,
            checkers: Bitboard::EMPTY,
        };
    }

    pub fn undo_null_move(&mut self) {
        debug_assert!(self.state().mv.is_null() && self.ply > 0);
        self.ply -= 1;
        self.side_to_move = self.side_to_move.other();
    }

    // =========================================================================
    // Hashing and draws
    // =========================================================================

    /// Full Zobrist recomputation of the current position.
    pub fn compute_hash(&self) -> u64 {
        let mut hash = 0u64;
        for sq in self.occupied() {
            if let Some(piece) = self.piece_at(sq) {
                hash ^= ZOBRIST.piece_key(piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.side_to_move;
        }
        hash ^= ZOBRIST.castling_key(self.castling());
        if let Some(ep) = self.ep_square() {
            hash ^= ZOBRIST.ep_key(ep);
        }
        hash
    }

    fn update_repetition(&mut self) {
        let st = self.history[self.ply];
        let window = st.halfmove_clock.min(st.plies_from_null) as usize;
        let mut back = 4;
        while back <= window && back <= self.ply {
            let prior = &self.history[self.ply - back];
            if prior.hash == st.hash {
                self.history[self.ply].repetition = prior.repetition.saturating_add(1);
                return;
            }
            back += 2;
        }
    }

    /// Earlier occurrences of the current position.
    pub fn repetitions(&self) -> u8 {
        self.state().repetition
    }

    /// Threefold: the current position occurred twice before.
    pub fn is_repetition_draw(&self) -> bool {
        self.state().repetition >= 2
    }

    /// A hundred plies without a capture or pawn move, unless the last of
    /// them delivered checkmate.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.state().halfmove_clock >= 100 && (!self.in_check() || !legal_moves(self).is_empty())
    }

    /// Bare kings, a single minor piece, or only bishops all on one square color.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = self.pieces(PieceKind::Pawn)
            | self.pieces(PieceKind::Rook)
            | self.pieces(PieceKind::Queen);
        if heavy.is_nonempty() {
            return false;
        }
        let knights = self.pieces(PieceKind::Knight);
        let bishops = self.pieces(PieceKind::Bishop);
        if !(knights | bishops).more_than_one() {
            return true;
        }
        knights.is_empty()
            && ((bishops & DARK_SQUARES).is_empty() || (bishops & !DARK_SQUARES).is_empty())
    }

    pub fn is_draw(&self) -> bool {
        self.is_repetition_draw() || self.is_fifty_move_draw() || self.is_insufficient_material()
    }

    /// Mailbox and bitboards agree and colors are disjoint.
    pub fn is_consistent(&self) -> bool {
        if (self.colors[0] & self.colors[1]).is_nonempty() {
            return false;
        }
        let union = self.pieces.iter().fold(Bitboard::EMPTY, |acc, bb| acc | *bb);
        if union != self.occupied() {
            return false;
        }
        (0..64u8).all(|sq| match self.mailbox[sq as usize] {
            Some(piece) => self.pieces_of(piece.color, piece.kind).contains(sq),
            None => !self.occupied().contains(sq),
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::startpos()
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.colors == other.colors
            && self.mailbox == other.mailbox
            && self.side_to_move == other.side_to_move
            && self.fullmove_number == other.fullmove_number
            && self.ply == other.ply
            && self.state() == other.state()
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = self
                    .piece_at(rank * 8 + file)
                    .map(Piece::to_char)
                    .unwrap_or('.');
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        writeln!(f)?;
        writeln!(f, "Fen: {}", self.to_fen())?;
        write!(f, "Key: {:016X}", self.hash())
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
