use log::info;
use tokio::{
    io,
    signal::unix::{signal, Signal, SignalKind},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

struct ShutdownSignals {
    terminate: Signal,
    interrupt: Signal,
    hangup: Signal,
    quit: Signal,
}

impl ShutdownSignals {
    fn register() -> io::Result<Self> {
        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
            hangup: signal(SignalKind::hangup())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Name of the first shutdown signal received.
    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.terminate.recv() => "termination",
            _ = self.interrupt.recv() => "interrupt",
            _ = self.hangup.recv() => "hangup",
            _ = self.quit.recv() => "quit",
        }
    }
}

/// Cancels `cancellation_token` on the first shutdown signal. The returned task
/// also ends, without cancelling, once the token is cancelled elsewhere.
pub fn trigger_cancellation_on_signal(
    cancellation_token: CancellationToken,
) -> io::Result<JoinHandle<()>> {
    let mut signals = ShutdownSignals::register()?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            name = signals.recv() => {
                info!("Received {name} signal, shutting down");
                cancellation_token.cancel();
            }
            _ = cancellation_token.cancelled() => {}
        }
    }))
}
