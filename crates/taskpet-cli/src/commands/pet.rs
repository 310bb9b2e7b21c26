//! Companion status command.

use clap::Subcommand;
use taskpet_core::LifecycleController;

#[derive(Subcommand)]
pub enum PetAction {
    /// Show the companion's mood and score
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PetAction) -> Result<(), Box<dyn std::error::Error>> {
    let controller = LifecycleController::open()?;

    match action {
        PetAction::Status { json } => {
            let state = controller.render_state("Welcome back!");
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!("{}", state.status);
                println!("Mood: {}", state.mood);
                println!("Streak: {} day(s)", state.streak);
                println!("Pending tasks: {}", state.tasks.len());
            }
        }
    }
    Ok(())
}
