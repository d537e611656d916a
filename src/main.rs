use clap::Parser;
use multilog::app;
use multilog::config::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(termination) = app::run(cli).await? {
        termination.exit();
    }
    Ok(())
}
