//! Arena Impulse entry point
//!
//! Runs the fixed-rate loop headless: command lines come from stdin, replies
//! go to stdout, events go to the log (or to stderr as JSON lines).

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;

use arena_impulse::Settings;
use arena_impulse::sim::{EventSink, JsonLinesSink, LogSink, Simulation};

#[derive(Parser, Debug)]
#[command(name = "arena-impulse", version, about = "Bouncing body steered by typed commands")]
struct Args {
    /// JSON settings file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stop after this many ticks instead of when stdin closes
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Tick as fast as possible instead of at the configured rate
    #[arg(long)]
    no_sleep: bool,

    /// Write events to stderr and query replies to stdout as JSON lines
    #[arg(long)]
    events_json: bool,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    print_settings: bool,
}

/// Input collaborator: forwards stdin lines to the simulation thread
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("Failed to read stdin: {e}");
                    break;
                }
            }
        }
    });
    rx
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };

    if args.print_settings {
        println!("{}", settings.to_json()?);
        return Ok(());
    }

    let sink: Box<dyn EventSink> = if args.events_json {
        Box::new(JsonLinesSink::new(std::io::stderr()))
    } else {
        Box::new(LogSink)
    };
    let mut sim = Simulation::new(&settings, sink)?;
    log::info!(
        "Arena Impulse starting: {}x{} arena, gravity {}, {} Hz",
        settings.arena_width,
        settings.arena_height,
        settings.gravity,
        settings.tick_hz
    );

    let input = spawn_stdin_reader();
    let tick_len = Duration::try_from_secs_f64(1.0 / settings.tick_hz)
        .context("tick_hz does not give a usable tick length")?;
    let mut input_open = true;
    let mut next_tick = Instant::now();

    loop {
        match args.ticks {
            Some(limit) if sim.tick_count() >= limit => break,
            None if !input_open && sim.pending() == 0 => break,
            _ => {}
        }

        // Lines that arrived since the last tick run right after the next one
        while input_open {
            match input.try_recv() {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        sim.submit(line);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => input_open = false,
            }
        }

        for report in sim.step() {
            match report.result {
                Ok(values) => {
                    for value in values {
                        if args.events_json {
                            println!("{}", serde_json::to_string(&value)?);
                        } else {
                            println!("{value}");
                        }
                    }
                }
                Err(e) => println!("{e}"),
            }
        }
        log::debug!("tick {} position {}", sim.tick_count(), sim.position());

        if !args.no_sleep {
            next_tick += tick_len;
            let now = Instant::now();
            if next_tick > now {
                thread::sleep(next_tick - now);
            } else {
                // Fell behind; don't try to catch up
                next_tick = now;
            }
        }
    }

    println!(
        "final position after {} ticks: {}",
        sim.tick_count(),
        sim.position()
    );
    Ok(())
}
