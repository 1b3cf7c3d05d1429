use anyhow::{Context, Result};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    info!("menace starting");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut stdout = std::io::stdout().lock();
    let report = menace_cli::run(&args, &mut stdout).context("evaluation walk failed")?;
    info!(plies = report.plies.len(), "done");
    Ok(())
}
