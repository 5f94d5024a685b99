//! Headless Scheduler Simulation
//!
//! Plays a TOML scenario for a number of turns and prints what every daemon
//! and fuse did. With `--save-at` the run is saved to JSON mid-way and
//! resumed in a freshly built session.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use turn_scheduler::core::error::Result;
use turn_scheduler::core::types::Turn;
use turn_scheduler::scenario::{Scenario, Session, Snapshot, TurnReport};

/// Headless Scheduler Simulation - replay daemon and fuse scenarios
#[derive(Parser, Debug)]
#[command(name = "scheduler_sim")]
#[command(about = "Run a scheduler scenario and print the turn transcript")]
struct Args {
    /// Scenario file (TOML)
    #[arg(long, default_value = "data/scenarios/cellar.toml")]
    scenario: PathBuf,

    /// Number of turns to play
    #[arg(long, default_value_t = 12)]
    turns: Turn,

    /// Random seed, overrides the scenario's seed
    #[arg(long)]
    seed: Option<u64>,

    /// Save after this turn and resume from the saved JSON
    #[arg(long)]
    save_at: Option<Turn>,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimResult {
    scenario: String,
    seed: Option<u64>,
    turns: Vec<TurnReport>,
    final_state: Option<serde_json::Value>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut scenario = Scenario::load(&args.scenario)?;
    if args.seed.is_some() {
        scenario.seed = args.seed;
    }
    tracing::info!(scenario = %args.scenario.display(), turns = args.turns, "Starting scenario");

    let mut session = Session::new(&scenario)?;
    let mut reports = Vec::new();
    for _ in 0..args.turns {
        reports.push(session.step());

        if args.save_at == Some(session.turn()) {
            let json = serde_json::to_string(&session.snapshot())?;
            tracing::info!(turn = session.turn(), bytes = json.len(), "Saved session");

            let snapshot: Snapshot = serde_json::from_str(&json)?;
            session = Session::new(&scenario)?;
            session.restore(&snapshot)?;
            tracing::info!(turn = session.turn(), "Resumed into fresh session");
        }
    }

    let final_state = session.snapshot().plugins.into_values().next();

    match args.format.as_str() {
        "json" => {
            let result = SimResult {
                scenario: args.scenario.display().to_string(),
                seed: scenario.seed,
                turns: reports,
                final_state,
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => print_text(&reports, &session),
    }

    Ok(())
}

fn print_text(reports: &[TurnReport], session: &Session<'_>) {
    for report in reports {
        let location = report.location.as_deref().unwrap_or("-");
        println!("=== Turn {} ({}) ===", report.turn, location);
        for event in &report.events {
            match event.message_id() {
                Some(message) => println!("  {}", message),
                None => println!("  [{}]", event.event_type),
            }
        }
        if !report.daemons_run.is_empty() {
            println!("  daemons: {}", report.daemons_run.join(", "));
        }
        if !report.fuses_triggered.is_empty() {
            println!("  fuses: {}", report.fuses_triggered.join(", "));
        }
    }

    if let Some(scheduler) = session.scheduler() {
        println!();
        println!("=== Remaining timers ===");
        for daemon in scheduler.active_daemons() {
            println!(
                "  daemon {} (priority {}, runs {}{})",
                daemon.id,
                daemon.priority,
                daemon.run_count,
                if daemon.is_paused { ", paused" } else { "" }
            );
        }
        for fuse in scheduler.active_fuses() {
            println!(
                "  fuse {} ({} turns left{})",
                fuse.id,
                fuse.turns_remaining,
                if fuse.repeat { ", repeating" } else { "" }
            );
        }
    }
}
