use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "taskpet-cli", version, about = "Taskpet CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Companion status
    Pet {
        #[command(subcommand)]
        action: commands::pet::PetAction,
    },
    /// Experiment log management
    Logs {
        #[command(subcommand)]
        action: commands::logs::LogsAction,
    },
    /// Experiment group assignment
    Group {
        #[command(subcommand)]
        action: commands::group::GroupAction,
    },
    /// Watch deadlines at a fixed cadence, failing expired tasks
    Watch {
        /// Sweep interval in seconds
        #[arg(long, default_value = "1")]
        interval: u64,
        /// Run a single sweep and exit
        #[arg(long)]
        once: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Pet { action } => commands::pet::run(action),
        Commands::Logs { action } => commands::logs::run(action),
        Commands::Group { action } => commands::group::run(action),
        Commands::Watch { interval, once } => commands::watch::run(interval, once),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
