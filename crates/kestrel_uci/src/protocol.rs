//! UCI command parsing.

use anyhow::{Context, Result, anyhow, bail};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Uci,
    IsReady,
    UciNewGame,
    /// `fen` is `None` for `startpos`
    Position { fen: Option<String>, moves: Vec<String> },
    Go(GoParams),
    SetOption { name: String, value: Option<String> },
    /// Print the current board
    Display,
    Stop,
    Quit,
}

/// Numbers of a `go` command. Absent fields are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub movetime: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    /// Run a perft divide instead of a search
    pub perft: Option<u8>,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        bail!("empty command");
    };

    match head {
        "uci" => Ok(Command::Uci),
        "isready" => Ok(Command::IsReady),
        "ucinewgame" => Ok(Command::UciNewGame),
        "position" => parse_position(&parts[1..]),
        "go" => parse_go(&parts[1..]).map(Command::Go),
        "setoption" => parse_setoption(&parts[1..]),
        "d" => Ok(Command::Display),
        "stop" => Ok(Command::Stop),
        "quit" => Ok(Command::Quit),
        other => Err(anyhow!("unknown command: {other}")),
    }
}

fn parse_position(parts: &[&str]) -> Result<Command> {
    let moves_at = parts.iter().position(|&p| p == "moves");
    let setup_end = moves_at.unwrap_or(parts.len());

    let fen = match parts.first() {
        Some(&"startpos") => None,
        Some(&"fen") => {
            if setup_end <= 1 {
                bail!("position fen requires a FEN string");
            }
            Some(parts[1..setup_end].join(" "))
        }
        _ => bail!("position must start with 'startpos' or 'fen'"),
    };

    let moves = match moves_at {
        Some(at) => parts[at + 1..].iter().map(|s| s.to_string()).collect(),
        None => Vec::new(),
    };
    Ok(Command::Position { fen, moves })
}

fn parse_go(parts: &[&str]) -> Result<GoParams> {
    let mut params = GoParams::default();
    let mut iter = parts.iter();

    while let Some(&key) = iter.next() {
        // Flags without a value
        if key == "infinite" || key == "ponder" {
            continue;
        }
        let Some(&value) = iter.next() else {
            bail!("go {key} requires a value");
        };
        let number = || -> Result<u64> {
            value
                .parse()
                .with_context(|| format!("invalid value for go {key}: {value}"))
        };
        match key {
            "depth" => params.depth = Some(u32::try_from(number()?).unwrap_or(u32::MAX)),
            "nodes" => params.nodes = Some(number()?),
            "movetime" => params.movetime = Some(number()?),
            "wtime" => params.wtime = Some(number()?),
            "btime" => params.btime = Some(number()?),
            "perft" => params.perft = Some(u8::try_from(number()?).unwrap_or(u8::MAX)),
            // winc/binc/movestogo are accepted but not used by the allocation
            "winc" | "binc" | "movestogo" => {
                number()?;
            }
            other => bail!("unknown go parameter: {other}"),
        }
    }
    Ok(params)
}

fn parse_setoption(parts: &[&str]) -> Result<Command> {
    if parts.first() != Some(&"name") || parts.len() < 2 {
        bail!("setoption requires a name");
    }
    let value_at = parts.iter().position(|&p| p == "value");
    let name = parts[1..value_at.unwrap_or(parts.len())].join(" ");
    let value = value_at
        .map(|at| parts[at + 1..].join(" "))
        .filter(|v| !v.is_empty());
    Ok(Command::SetOption { name, value })
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
