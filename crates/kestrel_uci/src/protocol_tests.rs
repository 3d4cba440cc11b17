use super::*;

#[test]
fn test_simple_commands() {
    assert_eq!(parse_command("uci").unwrap(), Command::Uci);
    assert_eq!(parse_command("  isready  ").unwrap(), Command::IsReady);
    assert_eq!(parse_command("ucinewgame").unwrap(), Command::UciNewGame);
    assert_eq!(parse_command("d").unwrap(), Command::Display);
    assert_eq!(parse_command("stop").unwrap(), Command::Stop);
    assert_eq!(parse_command("quit").unwrap(), Command::Quit);
}

#[test]
fn test_empty_and_unknown() {
    assert!(parse_command("").is_err());
    assert!(parse_command("   ").is_err());
    assert!(parse_command("xyzzy").is_err());
}

#[test]
fn test_position_startpos() {
    assert_eq!(
        parse_command("position startpos").unwrap(),
        Command::Position {
            fen: None,
            moves: vec![]
        }
    );
    assert_eq!(
        parse_command("position startpos moves e2e4 e7e5").unwrap(),
        Command::Position {
            fen: None,
            moves: vec!["e2e4".to_string(), "e7e5".to_string()]
        }
    );
}

#[test]
fn test_position_fen() {
    let cmd = parse_command("position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1 moves e2e4").unwrap();
    assert_eq!(
        cmd,
        Command::Position {
            fen: Some("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".to_string()),
            moves: vec!["e2e4".to_string()]
        }
    );
    assert!(parse_command("position fen").is_err());
    assert!(parse_command("position").is_err());
    assert!(parse_command("position somewhere").is_err());
}

#[test]
fn test_go_params() {
    let cmd = parse_command("go depth 6 nodes 10000 movetime 500 wtime 60000 btime 55000").unwrap();
    assert_eq!(
        cmd,
        Command::Go(GoParams {
            depth: Some(6),
            nodes: Some(10_000),
            movetime: Some(500),
            wtime: Some(60_000),
            btime: Some(55_000),
            perft: None,
        })
    );

    assert_eq!(parse_command("go").unwrap(), Command::Go(GoParams::default()));
    assert_eq!(
        parse_command("go infinite").unwrap(),
        Command::Go(GoParams::default())
    );
    assert_eq!(
        parse_command("go wtime 1000 winc 10 btime 1000 binc 10").unwrap(),
        Command::Go(GoParams {
            wtime: Some(1000),
            btime: Some(1000),
            ..GoParams::default()
        })
    );
}

#[test]
fn test_go_perft() {
    assert_eq!(
        parse_command("go perft 4").unwrap(),
        Command::Go(GoParams {
            perft: Some(4),
            ..GoParams::default()
        })
    );
}

#[test]
fn test_go_rejects_bad_numbers() {
    assert!(parse_command("go depth").is_err());
    assert!(parse_command("go depth x").is_err());
    assert!(parse_command("go nodes -5").is_err());
    assert!(parse_command("go sideways 3").is_err());
}

#[test]
fn test_setoption() {
    assert_eq!(
        parse_command("setoption name Hash value 64").unwrap(),
        Command::SetOption {
            name: "Hash".to_string(),
            value: Some("64".to_string())
        }
    );
    assert_eq!(
        parse_command("setoption name Clear Hash").unwrap(),
        Command::SetOption {
            name: "Clear Hash".to_string(),
            value: None
        }
    );
    assert!(parse_command("setoption Hash 64").is_err());
}
