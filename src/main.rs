/*!
 * spawnkit - Demo Driver
 *
 * Runs the requested demos and prints a JSON run report:
 * - child-process: spawn an OS child and wait on it
 * - worker-threads: spawn a worker thread, interleave, join
 * - parallel-sums: compute partial sums on async tasks and collect them
 */

use anyhow::{bail, Context};
use spawnkit::demos::{self, DemoKind};
use spawnkit::{init_tracing, DemoConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("spawnkit demo driver starting");

    let config = DemoConfig::from_env().context("Failed to load demo config")?;
    info!(
        command = %config.command,
        worker_iterations = config.worker_iterations,
        workloads = config.sum_workloads.len(),
        "Demo config loaded"
    );

    // No args means run everything, in the canonical order
    let args: Vec<String> = std::env::args().skip(1).collect();
    let kinds: Vec<DemoKind> = if args.is_empty() {
        DemoKind::ALL.to_vec()
    } else {
        args.iter()
            .map(|arg| arg.parse::<DemoKind>())
            .collect::<Result<_, _>>()
            .map_err(|e| anyhow::anyhow!(e))?
    };

    info!(demos = kinds.len(), "Running demos");
    let report = demos::run(&kinds, &config).await;

    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize run report")?
    );

    if !report.all_ok() {
        bail!("One or more demos failed");
    }
    Ok(())
}
