//! Headless runner (default binary).
//!
//! Plays one session, or two paired sessions with `--players 2`, without
//! sleeping between ticks, then prints the final boards and scores.
//!
//! Args: `[--ticks N] [--players 1|2]`. Everything else comes from the
//! environment (see `SessionConfig::from_env`, `LedgerConfig::from_env` and
//! `AdvisorConfig::from_env`); set `TETRIS_LEDGER_PATH` to record scores.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use tetris_ai::adapter::TcpAdvisor;
use tetris_ai::ledger::{Ledger, LedgerConfig};
use tetris_ai::session::{Session, SessionConfig, SessionPair};
use tetris_ai::types::{PlayerType, UiState};

const DEFAULT_TICKS: u64 = 10_000;

struct Args {
    ticks: u64,
    players: usize,
}

fn parse_args() -> Args {
    let mut args = Args {
        ticks: DEFAULT_TICKS,
        players: 1,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--ticks" => {
                if let Some(v) = it.next() {
                    args.ticks = v.parse().unwrap_or(args.ticks);
                }
            }
            "--players" => {
                if let Some(v) = it.next() {
                    args.players = v.parse().unwrap_or(args.players).clamp(1, 2);
                }
            }
            other => warn!("ignoring unknown argument {other}"),
        }
    }
    args
}

fn open_ledger() -> Option<Arc<Ledger>> {
    std::env::var_os("TETRIS_LEDGER_PATH")?;
    match Ledger::open(LedgerConfig::from_env()) {
        Ok(ledger) => Some(Arc::new(ledger)),
        Err(e) => {
            warn!("score ledger disabled: {e:#}");
            None
        }
    }
}

fn attach_advisor(session: &mut Session) -> Result<()> {
    if session.config().player != PlayerType::External {
        return Ok(());
    }
    match TcpAdvisor::from_env().context("start advisor client")? {
        Some(advisor) => {
            info!("advisor at {}", advisor.config().address());
            session.set_advisor(Box::new(advisor));
        }
        None => warn!("advisor disabled; the external player will stay frozen"),
    }
    Ok(())
}

fn report(label: &str, session: &mut Session) {
    let snap = session.snapshot();
    println!("== {label} ({}, {}) ==", snap.player.as_str(), snap.ui_state.as_str());
    print!("{}", snap.board.render_ascii());
    let score = snap.final_score.unwrap_or(snap.score);
    println!("score {score}  lines {}  pieces {}", snap.lines, snap.board.piece_id);

    if let Some(handle) = session.take_submission() {
        let recorded = handle.wait(Duration::from_secs(5));
        println!("score recorded: {recorded}");
    } else if session.ui_state() != UiState::GameOver && session.score() > 0 {
        println!("score recorded: {}", session.submit_score());
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args();
    let config = SessionConfig::from_env().context("session configuration")?;
    let ledger = open_ledger();

    if args.players == 2 {
        let right = SessionConfig {
            player_name: format!("{} (2)", config.player_name),
            ..config.clone()
        };
        let mut pair = SessionPair::new(config, right, ledger.clone())?;
        attach_advisor(&mut pair.left)?;
        pair.start();
        for _ in 0..args.ticks {
            if pair.is_over() {
                break;
            }
            pair.tick();
        }
        report("player 1", &mut pair.left);
        report("player 2", &mut pair.right);
    } else {
        let mut session = Session::new(config)?;
        if let Some(ledger) = &ledger {
            session = session.with_ledger(Arc::clone(ledger));
        }
        attach_advisor(&mut session)?;
        session.start();
        for _ in 0..args.ticks {
            if session.ui_state() == UiState::GameOver {
                break;
            }
            session.tick();
        }
        report("player 1", &mut session);
    }

    if let Some(ledger) = ledger {
        for (rank, entry) in ledger.top_scores().iter().enumerate() {
            println!("{:>2}. {:<16} {}", rank + 1, entry.player_name, entry.score);
        }
    }
    Ok(())
}
