//! Shutdown handling types for sink plugins.
//!
//! The host passes a [`ShutdownReason`] to every plugin when it stops, so a
//! sink can decide whether to flush buffered data or simply release resources.

/// Reason why the host is shutting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownReason {
    /// The embedding application called `shutdown()` or `stop()`.
    /// This is a graceful shutdown and the default value.
    #[default]
    HostRequested,

    /// A signal (SIGTERM or SIGINT) was received.
    /// Only reported after `install_signal_handlers()`.
    SignalReceived,

    /// The feeding process ran out of input.
    InputClosed,

    /// Startup failed after some plugins were already configured.
    StartupFailed,
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownReason::HostRequested => write!(f, "host requested shutdown"),
            ShutdownReason::SignalReceived => write!(f, "signal received"),
            ShutdownReason::InputClosed => write!(f, "input closed"),
            ShutdownReason::StartupFailed => write!(f, "startup failed"),
        }
    }
}
