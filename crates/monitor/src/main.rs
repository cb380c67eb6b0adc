use clap::Parser;
use shared::utils::signal::trigger_cancellation_on_signal;
use tokio_util::sync::CancellationToken;

use node_monitor::logging;
use node_monitor::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(logging::parse_level(&cli.log_level)?);

    let cancellation_token = CancellationToken::new();

    let _signal_handle = trigger_cancellation_on_signal(cancellation_token.clone())?;

    cli.run(cancellation_token).await
}
