use std::fmt;

use tokio::sync::broadcast;

/// Why the generator is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Interrupt,
    Terminate,
    Requested,
}

impl ShutdownSignal {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
            ShutdownSignal::Requested => "shutdown request",
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type ShutdownSender = broadcast::Sender<ShutdownSignal>;
pub type ShutdownReceiver = broadcast::Receiver<ShutdownSignal>;

/// Broadcast channel size for shutdown notifications (single signal fan-out).
const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

#[must_use]
pub fn shutdown_channel() -> (ShutdownSender, ShutdownReceiver) {
    broadcast::channel::<ShutdownSignal>(SHUTDOWN_CHANNEL_CAPACITY)
}
