use super::*;
use kestrel_core::{Color, START_FEN};

fn engine() -> Engine {
    Engine::new(EngineConfig {
        hash_mb: 2,
        ..EngineConfig::default()
    })
}

#[test]
fn test_set_position_startpos_with_moves() {
    let mut engine = engine();
    engine.set_position(None, &["e2e4", "e7e5", "g1f3"]).unwrap();
    assert_eq!(
        engine.board().to_fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
}

#[test]
fn test_set_position_skips_bad_moves() {
    let mut engine = engine();
    engine
        .set_position(None, &["e2e4", "e2e4", "zz99", "e7e5"])
        .unwrap();
    assert_eq!(engine.board().ply(), 2);
    assert_eq!(engine.board().side_to_move(), Color::White);
}

#[test]
fn test_bad_fen_keeps_position() {
    let mut engine = engine();
    engine.set_position(None, &["d2d4"]).unwrap();
    let before = engine.board().to_fen();

    assert!(engine.set_position(Some("not a fen"), &[]).is_err());
    assert!(engine.set_position(Some("8/8/8/8/8/8/8/8 w - - 0 1"), &[]).is_err());
    assert_eq!(engine.board().to_fen(), before);
}

#[test]
fn test_set_position_from_fen() {
    let mut engine = engine();
    let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
    engine.set_position(Some(fen), &["e2e4"]).unwrap();
    assert_eq!(engine.board().to_fen(), "4k3/8/8/8/4P3/8/8/4K3 b - - 0 1");
}

#[test]
fn test_make_move() {
    let mut engine = engine();
    let mv = engine.make_move("e2e4").unwrap();
    assert_eq!(mv.to_string(), "e2e4");
    assert!(mv.is_double_push());

    let before = engine.board().to_fen();
    assert_eq!(
        engine.make_move("e2e4"),
        Err(MoveTextError::Illegal("e2e4".to_string()))
    );
    assert_eq!(
        engine.make_move("e7"),
        Err(MoveTextError::Malformed("e7".to_string()))
    );
    assert_eq!(engine.board().to_fen(), before);
}

#[test]
fn test_start_search_returns_legal_move() {
    let mut engine = engine();
    engine.set_position(None, &["e2e4"]).unwrap();
    let mut lines = Vec::new();
    let outcome = engine.start_search(&SearchRequest::depth(3), |info| lines.push(info.to_string()));

    let best = outcome.best_move.unwrap();
    assert!(kestrel_core::legal_moves(engine.board()).contains(&best));
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("info depth 3 score "));
    assert!(outcome.to_string().starts_with("bestmove "));
    assert_eq!(engine.board().ply(), 1);
}

#[test]
fn test_search_request_limits() {
    let request = SearchRequest {
        max_depth: 0,
        max_nodes: 20_000,
        max_time_ms: 0,
        white_ms: 1_000,
        black_ms: 0,
    };
    let limits = request.limits();
    assert_eq!(limits.depth, None);
    assert_eq!(limits.nodes, Some(20_000));
    assert!(limits.black_time.is_none());

    let mut engine = engine();
    let outcome = engine.start_search(&request, |_| {});
    assert!(outcome.best_move.is_some());
}

#[test]
fn test_perft() {
    let mut engine = engine();
    assert_eq!(engine.perft(3), 8_902);
    let divide = engine.perft_divide(2);
    assert_eq!(divide.len(), 20);
    assert_eq!(divide.iter().map(|(_, n)| n).sum::<u64>(), 400);
    assert_eq!(engine.board().to_fen(), START_FEN);
}

#[test]
fn test_new_game_and_hash_size() {
    let mut engine = engine();
    engine.set_position(None, &["e2e4"]).unwrap();
    let key = engine.board().hash();
    engine.start_search(&SearchRequest::depth(2), |_| {});
    assert!(engine.searcher().tt().probe(key, 0).is_some());

    engine.new_game();
    assert_eq!(engine.board().to_fen(), START_FEN);
    assert!(engine.searcher().tt().probe(key, 0).is_none());

    engine.set_hash_size(1);
    assert_eq!(engine.config().hash_mb, 1);
    assert_eq!(engine.searcher().tt().bucket_count(), 1 << 14);
}

#[test]
fn test_custom_evaluator_engine() {
    let mut engine = Engine::with_evaluator(|_: &Board| 0, EngineConfig::default());
    let outcome = engine.start_search(&SearchRequest::depth(2), |_| {});
    assert!(outcome.best_move.is_some());
    assert_eq!(outcome.score, 0);
}
