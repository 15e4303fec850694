/// Host stop handle for cooperative shutdown
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle that allows stopping the host from another thread.
///
/// The process feeding entries into the host checks `is_running()` between
/// inputs; any holder of a handle (a signal handler, a supervisor thread) can
/// flip it with `stop()`.
///
/// `HostStopHandle` is `Clone + Send + Sync`. Multiple calls to `stop()` are
/// safe and idempotent.
///
/// # Example
///
/// ```
/// use logship_plugin::host::Host;
///
/// let host = Host::new(Some("shipper"));
/// let handle = host.stop_handle();
///
/// std::thread::spawn(move || handle.stop()).join().unwrap();
/// assert!(!host.is_running());
/// ```
#[derive(Clone)]
pub struct HostStopHandle {
    shutdown_flag: Arc<AtomicBool>,
}

impl HostStopHandle {
    pub fn new(shutdown_flag: Arc<AtomicBool>) -> Self {
        Self { shutdown_flag }
    }

    /// Request the host to stop.
    pub fn stop(&self) {
        self.shutdown_flag.store(true, Ordering::Release);
    }

    /// `false` once `stop()` has been called.
    pub fn is_running(&self) -> bool {
        !self.shutdown_flag.load(Ordering::Acquire)
    }
}
