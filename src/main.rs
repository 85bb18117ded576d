/*!
 * Process Scheduler Simulator - Main Entry Point
 *
 * Runs two sequential actors connected by a one-directional byte pipe:
 * - a commander reading Q/U/P/T from stdin
 * - a process manager owning the process table
 */

use miette::IntoDiagnostic;
use process_sim::{init_tracing, pipe, run_commander, run_manager, FileLoader, ProcessManager, SimConfig};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    let config = SimConfig::from_env()?.with_args(std::env::args().skip(1));
    init_tracing(config.trace_json);

    info!(
        init_program = %config.init_program,
        program_dir = %config.program_dir.display(),
        init_priority = config.init_priority.get(),
        "Process scheduler simulator starting"
    );

    let loader = Arc::new(FileLoader::new(config.program_dir.clone()));
    let manager = ProcessManager::boot(loader, &config)?;

    let (sender, receiver) = pipe();
    let format = config.report_format;

    // The manager blocks on the pipe, so keep it off the async workers
    let manager_task = tokio::task::spawn_blocking(move || {
        run_manager(&manager, receiver, format, std::io::stdout())
    });

    run_commander(sender, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    let report = manager_task.await.into_diagnostic()??;
    info!(terminated = report.terminated, "Simulation complete");
    Ok(())
}
