use clap::Parser;

use efs_notify::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_and_merge_config(&cli)?;
    init_logger_from_settings(&settings)?;

    tracing::debug!(
        version = efs_notify::pkg_version(),
        command = ?cli.command,
        "Starting efs-notify"
    );

    if let Err(e) = execute_command(&cli, settings).await {
        tracing::error!(error = %e, "Command failed");
        eprintln!("Error: {:#}", anyhow::Error::from(e));
        std::process::exit(1);
    }

    Ok(())
}
