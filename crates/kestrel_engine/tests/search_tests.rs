use kestrel_core::legal_moves;
use kestrel_engine::{Engine, EngineConfig, MATE, SearchRequest};

fn engine() -> Engine {
    Engine::new(EngineConfig {
        hash_mb: 4,
        ..EngineConfig::default()
    })
}

#[test]
fn test_self_play_stays_legal() {
    let mut engine = engine();
    for _ in 0..16 {
        let outcome = engine.start_search(&SearchRequest::depth(3), |_| {});
        let Some(best) = outcome.best_move else {
            break;
        };
        assert!(legal_moves(engine.board()).contains(&best));
        assert!(engine.board().is_consistent());
        engine.make_move(&best.to_string()).unwrap();
    }
    assert!(engine.board().ply() > 0);
}

#[test]
fn test_node_limited_search_is_deterministic() {
    let request = SearchRequest {
        max_nodes: 20_000,
        ..SearchRequest::default()
    };
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    let mut first = engine();
    first.set_position(Some(fen), &[]).unwrap();
    let a = first.start_search(&request, |_| {});

    let mut second = engine();
    second.set_position(Some(fen), &[]).unwrap();
    let b = second.start_search(&request, |_| {});

    assert_eq!(a, b);
}

#[test]
fn test_mate_reported_after_moves() {
    let mut engine = engine();
    engine
        .set_position(None, &["f2f3", "e7e5", "g2g4"])
        .unwrap();
    let mut lines = Vec::new();
    let outcome = engine.start_search(&SearchRequest::depth(3), |info| lines.push(info.to_string()));

    assert_eq!(outcome.best_move.unwrap().to_string(), "d8h4");
    assert_eq!(outcome.score, MATE - 1);
    assert!(lines.last().unwrap().contains("score mate 1"));
    assert!(lines.last().unwrap().ends_with("pv d8h4"));
    assert_eq!(outcome.to_string(), "bestmove d8h4");
}

#[test]
fn test_info_lines_count_up() {
    let mut engine = engine();
    let mut depths = Vec::new();
    let mut nodes = Vec::new();
    engine.start_search(&SearchRequest::depth(4), |info| {
        depths.push(info.depth);
        nodes.push(info.nodes);
        assert!(!info.pv.is_empty());
    });
    assert_eq!(depths, vec![1, 2, 3, 4]);
    assert!(nodes.windows(2).all(|w| w[0] < w[1]));
}
