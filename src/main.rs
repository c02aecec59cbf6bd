use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use grid_2048::engine::{self as GameEngine, Move};
use grid_2048::event::TileEvent;
use grid_2048::grid::Grid;
use grid_2048::session::{GameSession, SessionObserver, SessionStatus};
use grid_2048::{SessionConfig, SettlePolicy};

#[derive(Debug, Parser)]
#[command(name = "grid-2048", about = "Play 2048 on stdin: one key per line (w/a/s/d, h/j/k/l, up/down/left/right), q to quit")]
struct Args {
    /// TOML session configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Grid rows (overrides config)
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns (overrides config)
    #[arg(long)]
    cols: Option<usize>,

    /// RNG seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Settle each move after this many milliseconds instead of immediately
    #[arg(long, value_name = "MS")]
    deferred_ms: Option<u64>,

    /// Log every tile event
    #[arg(short, long)]
    verbose: bool,
}

/// Logs tile events the way a renderer would consume them.
struct EventLog;

impl SessionObserver for EventLog {
    fn on_move(&mut self, direction: Move, events: &[TileEvent], _grid: &Grid) {
        for ev in events {
            debug!("{:?}: {:?} {} -> {} = {}", direction, ev.kind, ev.from, ev.to, ev.value);
        }
    }

    fn on_spawn(&mut self, event: &TileEvent, _grid: &Grid) {
        debug!("spawn {} at {}", event.value, event.to);
    }

    fn on_status(&mut self, status: SessionStatus, highest: u32) {
        debug!("status {:?}, score {}", status, highest);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let mut cfg = match &args.config {
        Some(path) => SessionConfig::from_toml(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };
    if let Some(rows) = args.rows { cfg.rows = rows; }
    if let Some(cols) = args.cols { cfg.cols = cols; }
    if args.seed.is_some() { cfg.seed = args.seed; }
    if let Some(ms) = args.deferred_ms {
        cfg.settle.policy = SettlePolicy::Deferred;
        cfg.settle.delay_ms = ms;
    }
    info!("session config: {:?}", cfg);

    let mut session = GameSession::from_config(&cfg).context("invalid session config")?;
    session.add_observer(EventLog);
    session.start();
    render(&session)?;

    let delay = Duration::from_millis(cfg.settle.delay_ms);
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        let key = line.trim();
        if key.eq_ignore_ascii_case("q") || key.eq_ignore_ascii_case("quit") {
            break;
        }
        let outcome = session.process_key(key);
        if outcome.direction.is_none() {
            eprintln!("unknown key {key:?}");
            continue;
        }
        if session.settle_pending() {
            // stand-in for the renderer's animation time
            thread::sleep(delay);
            session.settle();
        }
        render(&session)?;
        if session.status() == SessionStatus::GameOver {
            break;
        }
    }

    println!("Moves made: {}, highest tile: {}", session.moves_made(), session.highest_value());
    Ok(())
}

fn render(session: &GameSession) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", session.grid())?;
    let status = match session.status() {
        SessionStatus::Playing => "Playing",
        SessionStatus::GameOver => "Game Over",
    };
    writeln!(out, "Score: {} | {}", session.highest_value(), status)?;
    let legal = GameEngine::legal_moves(session.grid());
    if !legal.is_empty() {
        let names: Vec<String> = legal.iter().map(|m| format!("{m:?}").to_lowercase()).collect();
        writeln!(out, "Moves: {}", names.join(" "))?;
    }
    out.flush()
}
