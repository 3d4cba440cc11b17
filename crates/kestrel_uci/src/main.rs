//! UCI front end: reads commands from stdin, writes protocol lines to
//! stdout and logs to stderr.
//!
//! The engine runs on its own thread so `stop` can interrupt a search.

mod protocol;
mod worker;

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use crossbeam_channel::unbounded;
use kestrel_engine::{Engine, EngineConfig};
use protocol::{Command, parse_command};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use worker::{SearchGate, spawn_worker};

const CONFIG_ENV: &str = "KESTREL_CONFIG";
const DEFAULT_CONFIG: &str = "kestrel.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = load_config()?;
    info!(?config, "configuration loaded");
    let engine = Engine::new(config);
    let gate = SearchGate::new(engine.stop_flag());

    let (tx, rx) = unbounded();
    let worker = spawn_worker(engine, rx, gate.clone());

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                debug!(%err, line = %line, "ignoring input");
                continue;
            }
        };

        match command {
            Command::Stop => gate.request_stop(),
            Command::Quit => {
                gate.request_stop();
                break;
            }
            Command::Go(params) => {
                gate.open();
                tx.send(Command::Go(params))?;
            }
            other => tx.send(other)?,
        }
    }

    // Closing the channel lets the worker drain its queue and exit
    drop(tx);
    worker
        .join()
        .map_err(|_| anyhow!("engine thread panicked"))?;
    Ok(())
}

/// `$KESTREL_CONFIG` when set, else `./kestrel.toml` when present, else defaults.
fn load_config() -> Result<EngineConfig> {
    let path = match std::env::var_os(CONFIG_ENV) {
        Some(path) => PathBuf::from(path),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG);
            if !local.exists() {
                return Ok(EngineConfig::default());
            }
            local
        }
    };
    EngineConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}
