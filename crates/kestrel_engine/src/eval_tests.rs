use super::*;

#[test]
fn test_start_position_is_tempo_only() {
    let board = Board::startpos();
    assert_eq!(MaterialEvaluator.evaluate(&board), TEMPO);
}

#[test]
fn test_evaluation_is_side_relative() {
    // White is a rook up; the score flips with the side to move
    let white = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
    let black = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1").unwrap();
    let w = MaterialEvaluator.evaluate(&white);
    let b = MaterialEvaluator.evaluate(&black);
    assert!(w > 400);
    assert!(b < -400);
    assert_eq!(w - TEMPO, -(b - TEMPO));
}

#[test]
fn test_reach_counts_attacked_squares() {
    // Same material; the centralised knight reaches more squares
    let central = Board::from_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").unwrap();
    let corner = Board::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();
    assert!(MaterialEvaluator.evaluate(&central) > MaterialEvaluator.evaluate(&corner));
}

#[test]
fn test_closure_evaluator() {
    let flat = |_: &Board| 42;
    assert_eq!(flat.evaluate(&Board::startpos()), 42);
}

#[test]
fn test_mate_scores() {
    assert!(is_mate_score(MATE - 3));
    assert!(is_mate_score(-MATE + 10));
    assert!(!is_mate_score(900));
    assert!(MATE_BOUND > PIECE_VALUES.iter().sum::<i32>() * 10);
}
