use std::path::PathBuf;

use clap::Subcommand;
use setflow_core::{Config, ExerciseSpec, Routine, RoutineStore, StoredRoutine};

#[derive(Subcommand)]
pub enum RoutineAction {
    /// List stored routines
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one routine's exercises
    Show {
        /// Routine id or name prefix
        routine: String,
        #[arg(long)]
        json: bool,
    },
    /// Create an empty routine
    Create {
        /// Routine name
        name: String,
    },
    /// Delete a routine
    Delete {
        /// Routine id or name prefix
        routine: String,
    },
    /// Append an exercise to a routine
    Add {
        /// Routine id or name prefix
        routine: String,
        /// Exercise name
        name: String,
        /// Number of sets
        #[arg(long, default_value = "3")]
        sets: u32,
        /// Countdown per set in seconds; omit for a rep-based exercise
        #[arg(long)]
        duration: Option<u64>,
        /// Rest after each set in seconds (default from config)
        #[arg(long)]
        rest: Option<u64>,
    },
    /// Remove an exercise by position (0-based)
    Remove {
        routine: String,
        index: usize,
    },
    /// Move an exercise to a new position
    Move {
        routine: String,
        from: usize,
        to: usize,
    },
    /// Import a routine from a JSON file (stored format or bare array)
    Import {
        path: PathBuf,
        /// Name for the imported routine (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
    },
    /// Export a routine's exercises as a JSON array
    Export {
        routine: String,
        path: PathBuf,
    },
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = RoutineStore::open()?;
    match action {
        RoutineAction::List { json } => {
            let routines = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&routines)?);
            } else {
                for r in routines {
                    println!(
                        "{}  {}  ({} exercises, ~{} min)",
                        r.id,
                        r.name,
                        r.exercises.len(),
                        r.exercises.estimated_duration_secs().div_ceil(60),
                    );
                }
            }
        }
        RoutineAction::Show { routine, json } => {
            let r = store.find(&routine)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&r)?);
            } else {
                println!("{} ({})", r.name, r.id);
                for (i, ex) in r.exercises.exercises.iter().enumerate() {
                    let work = if ex.time_based {
                        format!("{}s", ex.duration_secs)
                    } else {
                        "reps".to_string()
                    };
                    println!(
                        "  {i}. {} -- {} x {}, rest {}s",
                        ex.name, ex.sets, work, ex.rest_secs
                    );
                }
            }
        }
        RoutineAction::Create { name } => {
            let r = StoredRoutine::new(name, Routine::default());
            store.save(&r)?;
            println!("created {} ({})", r.name, r.id);
        }
        RoutineAction::Delete { routine } => {
            let r = store.delete(&routine)?;
            println!("deleted {}", r.name);
        }
        RoutineAction::Add {
            routine,
            name,
            sets,
            duration,
            rest,
        } => {
            let config = Config::load()?;
            let mut r = store.find(&routine)?;
            let rest = rest.unwrap_or(config.session.default_rest_secs);
            let spec = match duration {
                Some(secs) => ExerciseSpec::timed(&name, sets, secs, rest),
                None => ExerciseSpec::reps(&name, sets, rest),
            };
            r.exercises.exercises.push(spec);
            store.save(&r)?;
            println!("added {} to {}", name, r.name);
        }
        RoutineAction::Remove { routine, index } => {
            let mut r = store.find(&routine)?;
            if index >= r.exercises.len() {
                return Err(format!("no exercise at position {index}").into());
            }
            let removed = r.exercises.exercises.remove(index);
            store.save(&r)?;
            println!("removed {}", removed.name);
        }
        RoutineAction::Move { routine, from, to } => {
            let mut r = store.find(&routine)?;
            let len = r.exercises.len();
            if from >= len || to >= len {
                return Err(format!("positions must be below {len}").into());
            }
            let spec = r.exercises.exercises.remove(from);
            let name = spec.name.clone();
            r.exercises.exercises.insert(to, spec);
            store.save(&r)?;
            println!("moved {name} to position {to}");
        }
        RoutineAction::Import { path, name } => {
            let r = store.import(&path, name)?;
            println!("imported {} ({} exercises)", r.name, r.exercises.len());
        }
        RoutineAction::Export { routine, path } => {
            store.export(&routine, &path)?;
            println!("exported to {}", path.display());
        }
    }
    Ok(())
}
