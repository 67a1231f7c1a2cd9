mod script;
mod sim;
mod storage;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;

use geocoin_game::{Command, GameSession, Outcome, StateStorage};
use script::{ScriptOp, parse_script};
use sim::{SimConfig, SimReport, run_walk};
use storage::FileStorage;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Print the current save's status
    Status,
    /// Execute a script of command tokens against the save
    Play,
    /// Wipe the save and regenerate the world
    Reset,
    /// Run seeded random-walk invariant sweeps (in-memory, save untouched)
    Simulate,
}

#[derive(Debug, Parser)]
#[command(name = "geocoin", version)]
#[command(about = "Headless driver and QA harness for the Geocoin world")]
struct Args {
    /// What to do with the world
    #[arg(long, value_enum, default_value_t = Mode::Status)]
    mode: Mode,

    /// Directory holding the persistent save
    #[arg(long, default_value = ".geocoin")]
    save_dir: PathBuf,

    /// Whitespace-separated command tokens for play mode,
    /// e.g. "n e collect deposit:0,1#0@2,2 status"
    #[arg(long, default_value = "")]
    commands: String,

    /// Seeds for simulate mode (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Steps per simulated walk
    #[arg(long, default_value_t = 200)]
    steps: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
    if args.output.is_some() {
        colored::control::set_override(false);
    }

    let lines = match args.mode {
        Mode::Status => status_lines(&open_session(&args)),
        Mode::Play => run_script(&mut open_session(&args), &args.commands)?,
        Mode::Reset => {
            let mut session = open_session(&args);
            session.execute(Command::Reset).context("reset world")?;
            vec!["world reset".to_string(), session.status_line()]
        }
        Mode::Simulate => run_simulations(&args)?,
    };

    write_lines(args.output.as_ref(), &lines)
}

fn open_session(args: &Args) -> GameSession<FileStorage> {
    GameSession::new(FileStorage::new(args.save_dir.clone()))
}

fn status_lines<S: StateStorage>(session: &GameSession<S>) -> Vec<String> {
    let grid = session.grid();
    let cell = session.player().current_cell(grid);
    let pos = session.player_marker();
    let mut lines = vec![
        session.status_line(),
        format!("position: cell {cell} ({:.6}, {:.6})", pos.lat, pos.lng),
        format!(
            "world: {} caches materialized, {} total value minted",
            session.registry().active_caches().count(),
            session.registry().minted_value()
        ),
    ];
    for coin in &session.player().held {
        lines.push(format!("  held: {} worth {}", coin.id, coin.value));
    }
    if session.is_degraded() {
        lines.push("storage unavailable; progress is in-memory only".yellow().to_string());
    }
    lines
}

fn run_script<S: StateStorage>(
    session: &mut GameSession<S>,
    commands: &str,
) -> Result<Vec<String>> {
    let ops = parse_script(commands).context("parse --commands")?;
    if ops.is_empty() {
        bail!("play mode needs --commands (e.g. --commands \"n e collect\")");
    }
    let mut lines = Vec::new();
    for op in ops {
        let here = session.player().current_cell(session.grid());
        let command = match op {
            ScriptOp::Move { di, dj } => Command::Move { di, dj },
            ScriptOp::Collect { cell, pick } => Command::Collect {
                cell: cell.unwrap_or(here),
                pick,
            },
            ScriptOp::Deposit { coin, cell } => Command::Deposit {
                cell: cell.unwrap_or(here),
                coin,
            },
            ScriptOp::Reset => Command::Reset,
            ScriptOp::Status => {
                lines.extend(status_lines(session));
                continue;
            }
        };
        match session.execute(command) {
            Ok(outcome) => lines.push(describe(&outcome)),
            // Ledger rejections are recoverable; report and keep going.
            Err(err) => lines.push(format!("{} {err}", "rejected:".red())),
        }
    }
    lines.push(session.status_line());
    Ok(lines)
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Moved { position, cell } => {
            format!(
                "moved to cell {cell} ({:.6}, {:.6})",
                position.lat, position.lng
            )
        }
        Outcome::Collected { coins, held_total } => {
            let worth: u64 = coins.iter().map(|c| u64::from(c.value)).sum();
            format!(
                "{} {} coin(s) worth {worth}, holding {held_total}",
                "collected".green(),
                coins.len()
            )
        }
        Outcome::Deposited { cell, coin } => format!("deposited {coin} at {cell}"),
        Outcome::WorldReset => "world reset".to_string(),
    }
}

fn run_simulations(args: &Args) -> Result<Vec<String>> {
    let seeds = split_seeds(&args.seeds)?;
    let config = SimConfig { steps: args.steps };
    let reports: Vec<SimReport> = seeds.iter().map(|&seed| run_walk(seed, config)).collect();

    let lines = if args.report == "json" {
        vec![serde_json::to_string_pretty(&reports)?]
    } else {
        render_console(&reports, args.steps)
    };
    if reports.iter().any(|r| !r.passed()) {
        // Print what we have before failing the run.
        write_lines(args.output.as_ref(), &lines)?;
        bail!("conservation broken in at least one walk");
    }
    Ok(lines)
}

fn render_console(reports: &[SimReport], steps: usize) -> Vec<String> {
    let mut lines = vec![format!(
        "Geocoin invariant sweep: {} walk(s), {steps} steps each",
        reports.len()
    )];
    for r in reports {
        let verdict = if r.passed() {
            "ok".green().to_string()
        } else {
            "CONSERVATION BROKEN".red().to_string()
        };
        lines.push(format!(
            "seed {:>10}: {verdict} | {} moves, {} collects, {} deposits, {} rejected | \
             {} caches, holding {} coin(s) worth {} of {} minted",
            r.seed,
            r.moves,
            r.collects,
            r.deposits,
            r.rejected,
            r.caches_materialized,
            r.held_coins,
            r.held_value,
            r.minted_value,
        ));
    }
    lines
}

fn split_seeds(raw: &str) -> Result<Vec<u64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u64>().with_context(|| format!("bad seed {s:?}")))
        .collect()
}

fn write_lines(output: Option<&PathBuf>, lines: &[String]) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            for line in lines {
                writeln!(writer, "{line}")?;
            }
            writer.flush()?;
        }
        None => {
            let mut out = stdout().lock();
            for line in lines {
                writeln!(out, "{line}")?;
            }
        }
    }
    Ok(())
}
