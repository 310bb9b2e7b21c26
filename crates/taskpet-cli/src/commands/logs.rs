//! Experiment log commands: show, export, reset.

use clap::Subcommand;
use std::path::PathBuf;
use taskpet_core::LifecycleController;

#[derive(Subcommand)]
pub enum LogsAction {
    /// Print the event log
    Show,
    /// Write the event log to a JSON file
    Export {
        /// Output file
        #[arg(long, default_value = "user_data.json")]
        out: PathBuf,
    },
    /// Clear the event log
    Reset,
}

pub fn run(action: LogsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = LifecycleController::open()?;

    match action {
        LogsAction::Show => {
            println!("{}", controller.export_logs()?);
        }
        LogsAction::Export { out } => {
            let json = controller.export_logs()?;
            std::fs::write(&out, json)?;
            println!(
                "Exported {} log entries to {}",
                controller.log().len(),
                out.display()
            );
        }
        LogsAction::Reset => {
            controller.reset_logs()?;
            println!("Experiment logs cleared!");
        }
    }
    Ok(())
}
