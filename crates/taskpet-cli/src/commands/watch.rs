//! Deadline watcher loop.
//!
//! Drives the core's tick-based deadline monitor at a fixed cadence on a
//! single-threaded runtime. User intents and sweeps never overlap: each
//! tick runs to completion before the next is processed.

use std::time::Duration;

use taskpet_core::LifecycleController;

pub fn run(interval_secs: u64, once: bool) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(watch_loop(interval_secs, once))
}

async fn watch_loop(interval_secs: u64, once: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = LifecycleController::open()?;
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        ticker.tick().await;

        let outcomes = controller.poll_deadlines()?;
        for outcome in &outcomes {
            println!("{}", outcome.health_flash);
            println!("{}", outcome.status);
        }

        let state = controller.render_state("Watching");
        for view in &state.tasks {
            if let Some(remaining) = &view.time_remaining {
                println!("[{}] {}  {remaining}", view.index, view.text);
            }
        }

        if once {
            return Ok(());
        }
    }
}
