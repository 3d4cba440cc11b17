use super::*;
use kestrel_core::{legal_moves, parse_uci_move};

fn board(fen: &str) -> Board {
    Board::from_fen(fen).unwrap()
}

fn find(board: &Board, text: &str) -> Move {
    parse_uci_move(board, text).unwrap()
}

#[test]
fn test_gravity_saturates() {
    let mut h = 0;
    for _ in 0..1000 {
        apply_gravity(&mut h, history_bonus(20));
    }
    assert!(h <= MAX_HISTORY);
    assert!(h > MAX_HISTORY / 2);

    for _ in 0..1000 {
        apply_gravity(&mut h, -history_bonus(20));
    }
    assert!(h >= -MAX_HISTORY);
    assert!(h < 0);
}

#[test]
fn test_history_bonus_grows_then_caps() {
    assert!(history_bonus(2) > history_bonus(1));
    assert_eq!(history_bonus(40), MAX_HISTORY_BONUS);
}

#[test]
fn test_capture_ordering_prefers_valuable_victims() {
    // The d5 pawn can take a knight on c6 or a pawn on e6
    let b = board("4k3/8/2n1p3/3P4/8/8/8/4K3 w - - 0 1");
    let heur = Heuristics::new();
    let knight = score_move(&b, find(&b, "d5c6"), Move::NULL, 0, &heur);
    let pawn = score_move(&b, find(&b, "d5e6"), Move::NULL, 0, &heur);
    let quiet = score_move(&b, find(&b, "e1d2"), Move::NULL, 0, &heur);
    assert!(knight > pawn);
    assert!(pawn > quiet);
}

#[test]
fn test_defended_square_penalises_attacker() {
    // Queen takes the d5 pawn, once defended by the e6 pawn and once not
    let b = board("4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1");
    let takes_defended = tactical_score(&b, find(&b, "d1d5"));
    let b2 = board("4k3/8/8/3p4/8/8/8/3QK3 w - - 0 1");
    let takes_free = tactical_score(&b2, find(&b2, "d1d5"));
    assert_eq!(takes_free - takes_defended, piece_value(PieceKind::Queen));
}

#[test]
fn test_tt_move_first() {
    let b = Board::startpos();
    let heur = Heuristics::new();
    let moves = legal_moves(&b);
    let tt_move = find(&b, "b1a3");
    let mut picker = MovePicker::new(&b, &moves, tt_move, 0, &heur);
    assert_eq!(picker.len(), 20);
    assert_eq!(picker.next(), Some(tt_move));
}

#[test]
fn test_picker_yields_each_move_once_in_score_order() {
    let b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let heur = Heuristics::new();
    let moves = legal_moves(&b);
    let picked: Vec<Move> = MovePicker::new(&b, &moves, Move::NULL, 0, &heur).collect();
    assert_eq!(picked.len(), moves.len());
    for mv in &moves {
        assert!(picked.contains(mv));
    }

    let scores: Vec<i32> = picked
        .iter()
        .map(|&mv| score_move(&b, mv, Move::NULL, 0, &heur))
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    // Kiwipete has captures; they come before the quiets
    assert!(picked[0].is_capture());
}

#[test]
fn test_killers_and_counter_move() {
    let mut b = Board::startpos();
    let e4 = find(&b, "e2e4");
    b.make_move(e4);

    let mut heur = Heuristics::new();
    let nf6 = find(&b, "g8f6");
    let tried = [find(&b, "a7a6"), find(&b, "h7h6")];
    heur.update_quiet_cutoff(&b, 1, nf6, &tried, 4);

    assert_eq!(heur.killers(1)[0], nf6);
    assert_eq!(heur.counter_move(e4), nf6);
    assert!(heur.history(kestrel_core::Color::Black, nf6) > 0);
    assert!(heur.history(kestrel_core::Color::Black, tried[0]) < 0);
    assert!(heur.continuation(&b, nf6) > 0);

    assert_eq!(score_move(&b, nf6, Move::NULL, 1, &heur), KILLER_SCORES[0]);

    // A second killer pushes the first into the second slot
    let nc6 = find(&b, "b8c6");
    heur.update_quiet_cutoff(&b, 1, nc6, &[], 4);
    assert_eq!(heur.killers(1), [nc6, nf6]);
    assert_eq!(heur.counter_move(e4), nc6);
    // Killers are per ply
    assert_eq!(heur.killers(2), [Move::NULL; 2]);
}

#[test]
fn test_age_halves_and_clear_resets() {
    let mut b = Board::startpos();
    b.make_move(find(&b, "d2d4"));
    let mut heur = Heuristics::new();
    let mv = find(&b, "d7d5");
    heur.update_quiet_cutoff(&b, 3, mv, &[], 8);
    let before = heur.history(kestrel_core::Color::Black, mv);

    heur.age();
    assert_eq!(heur.history(kestrel_core::Color::Black, mv), before / 2);
    assert_eq!(heur.killers(3), [Move::NULL; 2]);

    heur.clear();
    assert_eq!(heur.history(kestrel_core::Color::Black, mv), 0);
    assert_eq!(heur.continuation(&b, mv), 0);
}

#[test]
fn test_quiescence_ordering_ignores_quiets() {
    let b = board("4k3/1P6/8/3p4/4P3/8/8/4K3 w - - 0 1");
    let promo = find(&b, "b7b8q");
    let capture = find(&b, "e4d5");
    assert!(tactical_score(&b, promo) > 0);
    assert!(tactical_score(&b, capture) > 0);
    assert_eq!(tactical_score(&b, find(&b, "e1d1")), 0);

    let moves = [capture, promo];
    let picked: Vec<Move> = MovePicker::tactical(&b, &moves).collect();
    assert_eq!(picked, vec![capture, promo]);
}
