//! Command executor for dispatching CLI commands
//!
//! This module provides the main entry point for executing CLI commands
//! after parsing and configuration loading.

use std::sync::Arc;

use super::handlers::{CheckCommandHandler, CustomerCommandHandler, MetricsCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::logger::TracingSink;
use crate::notify::Notifier;

/// Execute a CLI command with the given settings
///
/// # Errors
/// Returns errors from command handlers, including a notifier call that
/// produced no result.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    match &cli.command {
        Commands::Check => CheckCommandHandler::new(settings).execute().map(|_| ()),
        Commands::Customer {
            message,
            message_file,
            ..
        } => {
            let notifier = build_notifier(&settings)?;
            CustomerCommandHandler::new(settings, notifier)
                .execute(message.as_ref(), message_file.as_deref())
                .await
                .map(|_| ())
        }
        Commands::Metrics { data, .. } => {
            let notifier = build_notifier(&settings)?;
            MetricsCommandHandler::new(settings, notifier)
                .execute(data)
                .await
                .map(|_| ())
        }
    }
}

fn build_notifier(settings: &Settings) -> AppResult<Notifier> {
    let sink = TracingSink::new(settings.application.name.clone());
    Notifier::from_settings(Arc::new(sink), settings)
}
