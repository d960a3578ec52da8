//! Interactive session driver.
//!
//! Polls the controller on the configured tick interval while a background
//! thread feeds keyboard commands through a channel. The controller decides
//! every transition; this loop only renders and forwards.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;
use std::time::Duration;

use clap::Args;
use setflow_core::{
    Clock, Config, Event, Phase, RoutineStore, RunMode, SessionController, SystemClock,
};
use tracing::debug;

use crate::alerts::BellAlerts;

#[derive(Args)]
pub struct RunArgs {
    /// Routine to run (id or name prefix); defaults to the first stored one
    pub routine: Option<String>,
    /// Print every event as a JSON line instead of the live countdown
    #[arg(long)]
    pub json: bool,
}

enum Command {
    ConfirmReps,
    Pause,
    Resume,
    Skip,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "" | "d" | "done" => Some(Command::ConfirmReps),
        "p" | "pause" => Some(Command::Pause),
        "r" | "resume" => Some(Command::Resume),
        "s" | "skip" => Some(Command::Skip),
        "q" | "quit" => Some(Command::Quit),
        _ => None,
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = RoutineStore::open()?;
    let stored = match &args.routine {
        Some(query) => store.find(query)?,
        None => store
            .list()?
            .into_iter()
            .next()
            .ok_or("no stored routines; create one with `routine create`")?,
    };

    let clock = SystemClock;
    let alerts = Box::new(BellAlerts::new(config.notifications.clone()));
    let mut session = SessionController::start(stored.exercises.clone(), alerts, clock.now())?;

    emit(
        &args,
        &Event::SessionStarted {
            exercise_count: stored.exercises.len(),
            at: clock.now(),
        },
    );
    if !args.json {
        println!("{} -- {} exercises", stored.name, stored.exercises.len());
        announce(&session);
    }

    // Keyboard commands arrive on their own thread; the driver polls.
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let tick_interval = Duration::from_millis(config.session.tick_interval_ms.max(50));
    loop {
        match rx.try_recv() {
            Ok(line) => {
                let event = match parse_command(&line) {
                    Some(Command::ConfirmReps) => session.confirm_reps_done(clock.now()),
                    Some(Command::Pause) => session.pause(clock.now()),
                    Some(Command::Resume) => session.resume(clock.now()),
                    Some(Command::Skip) => session.skip(clock.now()),
                    Some(Command::Quit) => session.cancel(clock.now()),
                    None => {
                        eprintln!("commands: done, pause, resume, skip, quit");
                        None
                    }
                };
                if let Some(event) = event {
                    handle_event(&args, &session, &event);
                }
            }
            Err(TryRecvError::Empty) => {}
            // stdin closed: keep ticking until the countdowns run out.
            Err(TryRecvError::Disconnected) => {}
        }

        if let Some(event) = session.tick(clock.now()) {
            handle_event(&args, &session, &event);
        }

        match session.run_mode() {
            RunMode::Completed => {
                if !args.json {
                    println!("\nWorkout complete.");
                }
                break;
            }
            RunMode::Exiting => {
                if !args.json {
                    println!("\nSession cancelled.");
                }
                break;
            }
            _ => {}
        }

        if !args.json {
            render_countdown(&session);
        }
        thread::sleep(tick_interval);
    }

    emit(&args, &session.snapshot(clock.now()));
    Ok(())
}

fn handle_event(args: &RunArgs, session: &SessionController, event: &Event) {
    debug!(?event, "session event");
    if args.json {
        emit(args, event);
        return;
    }
    match event {
        Event::PhaseStarted { .. } => {
            println!();
            announce(session);
        }
        Event::SessionPaused { .. } => println!("\npaused"),
        Event::SessionResumed { .. } => println!("resumed"),
        Event::ExerciseSkipped { .. } => {
            println!("\nskipped");
            announce(session);
        }
        _ => {}
    }
}

fn emit(args: &RunArgs, event: &Event) {
    if !args.json {
        return;
    }
    if let Ok(line) = serde_json::to_string(event) {
        println!("{line}");
    }
}

fn announce(session: &SessionController) {
    let spec = session.current_exercise();
    match session.phase() {
        Phase::Resting => println!("Rest -- {}s", spec.rest_secs),
        Phase::Exercising if spec.time_based => println!(
            "{} -- set {}/{} ({}s)",
            spec.name,
            session.current_set(),
            spec.sets,
            spec.duration_secs
        ),
        Phase::Exercising => println!(
            "{} -- set {}/{}: type 'done' when finished",
            spec.name,
            session.current_set(),
            spec.sets
        ),
    }
}

fn render_countdown(session: &SessionController) {
    if session.run_mode() != RunMode::Running || !session.has_countdown() {
        return;
    }
    print!("\r  {}  ", format_mmss(session.remaining_ms()));
    let _ = io::stdout().flush();
}

fn format_mmss(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    format!("{}:{:02}", secs / 60, secs % 60)
}
