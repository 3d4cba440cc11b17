use super::*;
use crate::board::START_FEN;

#[test]
fn test_perft_startpos_shallow() {
    let mut board = Board::startpos();
    assert_eq!(perft(&mut board, 0), 1);
    assert_eq!(perft(&mut board, 1), 20);
    assert_eq!(perft(&mut board, 2), 400);
    assert_eq!(perft(&mut board, 3), 8_902);
    assert_eq!(board.to_fen(), START_FEN);
}

#[test]
fn test_perft_kiwipete_shallow() {
    let mut board =
        Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    assert_eq!(perft(&mut board, 1), 48);
    assert_eq!(perft(&mut board, 2), 2_039);
}

#[test]
fn test_divide_sums_to_perft() {
    let mut board = Board::startpos();
    let divided = perft_divide(&mut board, 3);
    assert_eq!(divided.len(), 20);
    assert_eq!(divided.iter().map(|(_, n)| n).sum::<u64>(), 8_902);

    let e2e4 = divided
        .iter()
        .find(|(mv, _)| mv.to_string() == "e2e4")
        .map(|(_, n)| *n);
    assert_eq!(e2e4, Some(600));
    assert_eq!(board.to_fen(), START_FEN);
}

#[test]
fn test_divide_depth_one_counts_each_move_once() {
    let mut board = Board::startpos();
    let divided = perft_divide(&mut board, 1);
    assert!(divided.iter().all(|(_, n)| *n == 1));
}

#[test]
fn test_divide_depth_zero_is_empty() {
    let mut board = Board::startpos();
    assert!(perft_divide(&mut board, 0).is_empty());
}
