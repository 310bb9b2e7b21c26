//! Experiment group assignment.
//!
//! The lifecycle core only reads the group label; this command is the
//! setup flow that owns it.

use clap::Subcommand;
use taskpet_core::Store;

#[derive(Subcommand)]
pub enum GroupAction {
    /// Print the current experiment group
    Show,
    /// Assign the experiment group
    Set {
        /// Group label (e.g. control, treatment)
        label: String,
    },
}

pub fn run(action: GroupAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open()?;

    match action {
        GroupAction::Show => {
            println!("{}", store.experiment_group()?);
        }
        GroupAction::Set { label } => {
            store.set_experiment_group(&label)?;
            println!("Experiment group set to {label}");
        }
    }
    Ok(())
}
