use super::*;
use crossbeam_channel::unbounded;
use kestrel_engine::EngineConfig;

#[test]
fn test_stop_ignored_without_search() {
    let stop = Arc::new(AtomicBool::new(false));
    let gate = SearchGate::new(Arc::clone(&stop));
    gate.request_stop();
    assert!(!stop.load(Ordering::SeqCst));
}

#[test]
fn test_stop_while_searching_then_close() {
    let stop = Arc::new(AtomicBool::new(false));
    let gate = SearchGate::new(Arc::clone(&stop));
    gate.open();
    gate.request_stop();
    assert!(stop.load(Ordering::SeqCst));

    gate.close();
    assert!(!stop.load(Ordering::SeqCst));
    gate.request_stop();
    assert!(!stop.load(Ordering::SeqCst));
}

#[test]
fn test_stops_matched_to_searches_in_order() {
    let stop = Arc::new(AtomicBool::new(false));
    let gate = SearchGate::new(Arc::clone(&stop));

    // go, stop, go, stop all queued before the first search finishes
    gate.open();
    gate.request_stop();
    gate.open();
    gate.request_stop();
    gate.close();
    assert!(stop.load(Ordering::SeqCst));
    gate.close();
    assert!(!stop.load(Ordering::SeqCst));

    // A surplus stop has no search to go to
    gate.open();
    gate.request_stop();
    gate.request_stop();
    gate.close();
    assert!(!stop.load(Ordering::SeqCst));

    // go, stop, go: the second search runs unbounded
    gate.open();
    gate.request_stop();
    gate.open();
    gate.close();
    assert!(!stop.load(Ordering::SeqCst));
    gate.close();
    gate.request_stop();
    assert!(!stop.load(Ordering::SeqCst));
}

#[test]
fn test_worker_stops_queued_infinite_searches() {
    let engine = Engine::new(EngineConfig {
        hash_mb: 1,
        ..EngineConfig::default()
    });
    let gate = SearchGate::new(engine.stop_flag());
    let (tx, rx) = unbounded();
    let handle = spawn_worker(engine, rx, gate.clone());

    for _ in 0..2 {
        gate.open();
        tx.send(Command::Go(GoParams::default())).unwrap();
        gate.request_stop();
    }
    drop(tx);
    handle.join().unwrap();
    assert!(!gate.stop.load(Ordering::SeqCst));
}

#[test]
fn test_worker_stops_infinite_search() {
    let engine = Engine::new(EngineConfig {
        hash_mb: 1,
        ..EngineConfig::default()
    });
    let gate = SearchGate::new(engine.stop_flag());
    let (tx, rx) = unbounded();
    let handle = spawn_worker(engine, rx, gate.clone());

    gate.open();
    tx.send(Command::Go(GoParams::default())).unwrap();
    thread::sleep(std::time::Duration::from_millis(50));
    gate.request_stop();
    drop(tx);
    handle.join().unwrap();
    assert!(!gate.stop.load(Ordering::SeqCst));
}
