use super::*;

#[test]
fn test_parse_sets_flags_from_legal_list() {
    let board = Board::startpos();
    let mv = parse_uci_move(&board, "e2e4").unwrap();
    assert!(mv.is_double_push());
    assert_eq!(move_to_uci(mv), "e2e4");

    let board =
        Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    assert!(parse_uci_move(&board, "e1g1").unwrap().is_castle());
    assert!(parse_uci_move(&board, "e1c1").unwrap().is_castle());

    let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    assert!(parse_uci_move(&board, "e5d6").unwrap().is_en_passant());
}

#[test]
fn test_promotion_letter_must_match() {
    let board = Board::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let mv = parse_uci_move(&board, "b7b8n").unwrap();
    assert_eq!(mv.promotion_kind(), Some(PieceKind::Knight));
    assert_eq!(move_to_uci(mv), "b7b8n");

    // Uppercase letters are accepted too
    let mv = parse_uci_move(&board, "b7b8Q").unwrap();
    assert_eq!(mv.promotion_kind(), Some(PieceKind::Queen));

    assert_eq!(
        parse_uci_move(&board, "b7b8"),
        Err(MoveTextError::Illegal("b7b8".to_string()))
    );
}

#[test]
fn test_promotion_letter_on_plain_move_is_illegal() {
    let board = Board::startpos();
    assert_eq!(
        parse_uci_move(&board, "e2e4q"),
        Err(MoveTextError::Illegal("e2e4q".to_string()))
    );
}

#[test]
fn test_malformed_text() {
    let board = Board::startpos();
    for text in ["", "e2", "e2e", "e9e4", "i2e4", "e2e4qq", "e7e8k", "e2e4p", "é2e4"] {
        assert_eq!(
            parse_uci_move(&board, text),
            Err(MoveTextError::Malformed(text.to_string())),
            "{text}"
        );
    }
}

#[test]
fn test_illegal_move() {
    let board = Board::startpos();
    assert_eq!(
        parse_uci_move(&board, "e2e5"),
        Err(MoveTextError::Illegal("e2e5".to_string()))
    );
    // Black piece while white is to move
    assert_eq!(
        parse_uci_move(&board, "e7e5"),
        Err(MoveTextError::Illegal("e7e5".to_string()))
    );
}

#[test]
fn test_null_move_text() {
    assert_eq!(move_to_uci(Move::NULL), "0000");
}
