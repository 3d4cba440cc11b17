use super::*;

#[test]
fn test_knight_attacks() {
    // Knight on e4 (square 28) should attack 8 squares
    assert_eq!(knight_attacks(28).popcount(), 8);

    // Knight on a1 attacks b3 and c2 only
    let attacks = knight_attacks(0);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(10)); // c2
    assert!(attacks.contains(17)); // b3

    assert_eq!(knight_attacks(7).popcount(), 2);
}

#[test]
fn test_king_attacks() {
    assert_eq!(king_attacks(28).popcount(), 8);
    assert_eq!(king_attacks(0).popcount(), 3);
    assert_eq!(king_attacks(60).popcount(), 5); // e8
}

#[test]
fn test_pawn_attacks() {
    // White pawn on e4 attacks d5 and f5
    let attacks = pawn_attacks(Color::White, 28);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(35));
    assert!(attacks.contains(37));

    // White pawn on a2 attacks only b3
    let attacks = pawn_attacks(Color::White, 8);
    assert_eq!(attacks, Bitboard::from_square(17));

    // Black pawn on h7 attacks only g6
    assert_eq!(pawn_attacks(Color::Black, 55), Bitboard::from_square(46));
}

#[test]
fn test_rays() {
    // North from a1 is the a-file minus a1
    assert_eq!(
        ray(Direction::North, 0),
        Bitboard::FILE_A & !Bitboard::from_square(0)
    );
    assert_eq!(ray(Direction::SouthWest, 0), Bitboard::EMPTY);
    assert_eq!(ray(Direction::NorthEast, 0).popcount(), 7);
}

#[test]
fn test_slider_attacks_empty_board() {
    assert_eq!(rook_attacks(28, Bitboard::EMPTY).popcount(), 14);
    assert_eq!(bishop_attacks(28, Bitboard::EMPTY).popcount(), 13);
    assert_eq!(queen_attacks(28, Bitboard::EMPTY).popcount(), 27);
}

#[test]
fn test_rook_attacks_with_blockers() {
    // Rook on a1 with blockers on a3 and c1
    let occ = Bitboard::from_square(16) | Bitboard::from_square(2);
    let attacks = rook_attacks(0, occ);
    assert_eq!(attacks.popcount(), 4); // a2, a3, b1, c1
    assert!(attacks.contains(16));
    assert!(attacks.contains(2));
    assert!(!attacks.contains(24));
}

#[test]
fn test_slider_lookup_matches_ray_cast() {
    // Pseudo-random occupancies, every square
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for _ in 0..200 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let occ = Bitboard(state & (state >> 3));
        for sq in 0..64u8 {
            assert_eq!(
                bishop_attacks(sq, occ),
                sliding_attacks_slow(&Direction::BISHOP, sq, occ),
                "bishop mismatch on {sq}"
            );
            assert_eq!(
                rook_attacks(sq, occ),
                sliding_attacks_slow(&Direction::ROOK, sq, occ),
                "rook mismatch on {sq}"
            );
        }
    }
}

#[test]
fn test_between_and_line() {
    // a1 .. d4 diagonal
    let b = between(0, 27);
    assert_eq!(b, Bitboard::from_square(9) | Bitboard::from_square(18));
    assert_eq!(between(27, 0), b);
    // adjacent squares have nothing between them
    assert!(between(0, 1).is_empty());
    // not aligned
    assert!(between(0, 10).is_empty());
    assert!(line(0, 10).is_empty());
    // line through e1 and e4 is the whole e-file
    assert_eq!(line(4, 28), Bitboard::file(4));
    assert_eq!(line(0, 9).popcount(), 8);
}

#[test]
fn test_direction_and_ray_from() {
    assert_eq!(Direction::towards(4, 60), Some(Direction::North));
    assert_eq!(Direction::towards(63, 0), Some(Direction::SouthWest));
    assert_eq!(Direction::towards(0, 17), None);
    assert_eq!(Direction::towards(5, 5), None);
    assert!(Direction::NorthWest.is_diagonal());
    assert!(!Direction::West.is_diagonal());

    // From e1 through e3: e2..e8
    let r = ray_from(4, 20);
    assert_eq!(r, Bitboard::file(4) & !Bitboard::from_square(4));
    assert!(ray_from(0, 17).is_empty());
}
