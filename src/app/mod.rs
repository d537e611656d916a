pub mod tracing;

use crate::config::Cli;
use crate::dispatch::{self, TerminationRequested};
use crate::error::MultilogError;
use ::tracing::{debug, info};

/// Build the registry described by `cli` and emit its event.
///
/// Returns the termination request of a fatal event instead of exiting, so
/// the caller owns the process exit.
pub async fn run(cli: Cli) -> Result<Option<TerminationRequested>, MultilogError> {
    tracing::init_tracing(cli.diagnostics);

    let config = cli.resolve_config()?;
    debug!(
        "Resolved configuration: console={}, search_index={}",
        config.console.is_some(),
        config.search_index.is_some()
    );

    let payload = cli.payload()?;
    let registry = config.build_registry().await?;
    info!(
        "Starting multilog v{} with {} backend(s)",
        crate::VERSION,
        registry.len()
    );

    Ok(dispatch::emit(&registry, cli.level, &cli.group, &cli.message, payload).await)
}
