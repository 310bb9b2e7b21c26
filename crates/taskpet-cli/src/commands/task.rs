//! Task management commands for the CLI.

use clap::Subcommand;
use taskpet_core::{LifecycleController, TaskOutcome};
use uuid::Uuid;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task description
        text: String,
        /// Deadline (RFC 3339 or YYYY-MM-DDTHH:MM)
        #[arg(long)]
        deadline: Option<String>,
    },
    /// List pending tasks
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Complete a task by position or id
    Complete {
        /// Position from `task list`, or a task id
        target: String,
    },
    /// Fail a task by position or id
    Fail {
        /// Position from `task list`, or a task id
        target: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = LifecycleController::open()?;

    match action {
        TaskAction::Add { text, deadline } => {
            let outcome = controller.create_task(&text, deadline.as_deref())?;
            if outcome.deadline_ignored {
                eprintln!("Invalid date/time. Task will have no deadline.");
            }
            println!("Task added: {}", outcome.task.text);
        }
        TaskAction::List { json } => {
            let state = controller.render_state("Tasks");
            if json {
                println!("{}", serde_json::to_string_pretty(&state.tasks)?);
            } else if state.tasks.is_empty() {
                println!("No pending tasks.");
            } else {
                for view in &state.tasks {
                    match &view.time_remaining {
                        Some(remaining) => {
                            println!("[{}] {}  ({remaining})  {}", view.index, view.text, view.id)
                        }
                        None => println!("[{}] {}  {}", view.index, view.text, view.id),
                    }
                }
            }
        }
        TaskAction::Complete { target } => {
            let outcome = match parse_target(&target)? {
                Target::Id(id) => controller.complete_by_id(id)?,
                Target::Index(index) => controller.complete_at(index)?,
            };
            print_outcome(&outcome);
        }
        TaskAction::Fail { target } => {
            let outcome = match parse_target(&target)? {
                Target::Id(id) => controller.fail_by_id(id)?,
                Target::Index(index) => controller.fail_at(index)?,
            };
            print_outcome(&outcome);
        }
    }
    Ok(())
}

enum Target {
    Index(usize),
    Id(Uuid),
}

fn parse_target(raw: &str) -> Result<Target, Box<dyn std::error::Error>> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(Target::Id(id));
    }
    let index = raw
        .parse::<usize>()
        .map_err(|_| format!("'{raw}' is neither a position nor a task id"))?;
    Ok(Target::Index(index))
}

fn print_outcome(outcome: &TaskOutcome) {
    println!("{}", outcome.health_flash);
    println!(
        "{} | Points: {} | Health: {}",
        outcome.status, outcome.score.points, outcome.score.health
    );
    println!("Pet is {}.", outcome.mood);
}
