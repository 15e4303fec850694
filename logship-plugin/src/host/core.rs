/// Core host implementation for sink plugins
use crate::binding::{bind, ModuleLookup};
use crate::entry::LogEntry;
use crate::host::config::HostConfig;
use crate::host::error::HostError;
use crate::host::routing::RoutingTable;
use crate::host::stop_handle::HostStopHandle;
use crate::plugin::{ConnectionType, EntryConsumer, Plugin, SinkPlugin};
use crate::shutdown::ShutdownReason;
use clap::crate_name;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostState {
    Registering,
    Running,
    Failed,
}

/// Owns the sink plugins of a process and mediates every call into them.
///
/// Plugins are registered first, then `start` configures each of them exactly
/// once. Only a started host accepts entries and connection data, and since
/// `start` takes `&mut self` while data calls take `&self`, configuration
/// always completes before the first data call, even when the host is
/// afterwards shared across threads behind an `Arc`.
pub struct Host {
    name: String,
    plugins: Vec<Plugin>,
    routes: RoutingTable,
    consumer: EntryConsumer,
    state: HostState,
    plugins_notified: AtomicBool,
    shutdown_flag: Arc<AtomicBool>,
    signal_flag: Arc<AtomicBool>,
}

impl Host {
    /// Create a host whose entry consumer only traces forwarded entries.
    ///
    /// # Arguments
    /// * `name` - Optional host name (defaults to crate name)
    pub fn new(name: Option<&str>) -> Self {
        Self::with_consumer(
            name,
            Arc::new(|entry: LogEntry| {
                log::trace!(
                    "Entry forwarded by plugin: [{}] {}",
                    entry.level_name(),
                    entry.message()
                );
            }),
        )
    }

    /// Create a host that hands every entry forwarded by a plugin to `consumer`.
    pub fn with_consumer(name: Option<&str>, consumer: EntryConsumer) -> Self {
        let name = name.unwrap_or(crate_name!());
        Host {
            name: name.to_string(),
            plugins: Vec::new(),
            routes: RoutingTable::new(),
            consumer,
            state: HostState::Registering,
            plugins_notified: AtomicBool::new(false),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            signal_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a plugin and record the transports it declares.
    ///
    /// `supported_types()` is called exactly once here.
    pub fn register_plugin(&mut self, plugin: Plugin) -> Result<&mut Self, HostError> {
        if self.state != HostState::Registering {
            return Err(HostError::AlreadyStarted);
        }

        let name = plugin.name();
        if self.plugins.iter().any(|p| p.name() == name) {
            return Err(HostError::DuplicatePlugin(name));
        }

        let types = plugin.supported_types();
        self.routes.declare(self.plugins.len(), &types);
        log::info!(
            "Registered plugin '{name}' serving {} connection type(s)",
            types.len()
        );

        self.plugins.push(plugin);
        Ok(self)
    }

    /// Bind `module` through `lookup` and register the result.
    ///
    /// A module that fails to bind is never registered.
    pub fn bind_plugin<L: ModuleLookup + ?Sized>(
        &mut self,
        module: &str,
        lookup: &L,
    ) -> Result<&mut Self, HostError> {
        let plugin = bind(module, lookup)?;
        self.register_plugin(Plugin::bound(plugin))
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Register the entry consumer with every plugin and configure each one
    /// with its own section of `config`.
    ///
    /// The first configuration failure aborts startup; plugins configured
    /// before it are told to shut down and the host cannot be started again.
    pub fn start(&mut self, config: &HostConfig) -> Result<(), HostError> {
        if self.state != HostState::Registering {
            return Err(HostError::AlreadyStarted);
        }

        for (index, plugin) in self.plugins.iter().enumerate() {
            let section = plugin.config_section_name();
            if !config.has_section(&section) {
                log::debug!("No configuration section '{section}', using empty payload");
            }

            plugin.set_entry_consumer(Arc::clone(&self.consumer));

            if let Err(reason) = plugin.configure(&config.section(&section)) {
                let err = HostError::Configure {
                    plugin: plugin.name(),
                    reason,
                };
                log::error!("{err}");

                for configured in self.plugins.iter().take(index) {
                    configured.shutdown(ShutdownReason::StartupFailed);
                }
                self.plugins_notified.store(true, Ordering::Release);
                self.state = HostState::Failed;
                return Err(err);
            }
        }

        self.state = HostState::Running;
        log::info!(
            "Host '{}' started with {} plugin(s)",
            self.name,
            self.plugins.len()
        );
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.state == HostState::Running
    }

    fn ensure_running(&self) -> Result<(), HostError> {
        if self.state == HostState::Running && !self.plugins_notified.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(HostError::NotStarted)
        }
    }

    /// Hand `entry` to every plugin.
    ///
    /// A plugin rejecting the entry is logged and does not keep it from the
    /// others.
    pub fn dispatch(&self, entry: &LogEntry) -> Result<(), HostError> {
        self.ensure_running()?;

        for plugin in &self.plugins {
            if let Err(e) = plugin.consume(entry) {
                log::warn!("Plugin '{}' rejected entry: {e}", plugin.name());
            }
        }
        Ok(())
    }

    /// Plugin serving `conn_type`, if any declared it.
    pub fn route(&self, conn_type: &ConnectionType) -> Option<&Plugin> {
        self.routes
            .lookup(conn_type)
            .and_then(|index| self.plugins.get(index))
    }

    /// Pass bytes received on a `conn_type` connection from `source` to the
    /// plugin serving it and return its transport-ready output.
    pub fn chunk(
        &self,
        conn_type: &ConnectionType,
        data: &[u8],
        source: &str,
    ) -> Result<Vec<u8>, HostError> {
        self.ensure_running()?;

        let plugin = self
            .route(conn_type)
            .ok_or_else(|| HostError::NoRoute(conn_type.clone()))?;
        Ok(plugin.chunk(data, source, conn_type.kind()))
    }

    /// Every connection type some plugin declared, in registration order.
    pub fn connection_types(&self) -> impl Iterator<Item = &ConnectionType> {
        self.routes.connection_types()
    }

    /// Notify every plugin that the host is going away.
    ///
    /// Only the first call reaches the plugins, and only if they were
    /// configured.
    pub fn shutdown(&self, reason: ShutdownReason) {
        self.request_shutdown();
        if self.state == HostState::Registering {
            log::debug!("Host '{}' was never started, no plugin to notify", self.name);
            return;
        }
        if self.plugins_notified.swap(true, Ordering::AcqRel) {
            return;
        }

        log::info!("Shutting down host '{}': {reason}", self.name);
        for plugin in &self.plugins {
            plugin.shutdown(reason);
        }
    }

    /// Register SIGINT and SIGTERM handlers that stop the host.
    ///
    /// A signal trips the same flag as `stop()`, so stop handles observe it.
    #[cfg(unix)]
    pub fn install_signal_handlers(&self) {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::flag;

        // Failure only means signals won't stop the host; stop() still works.
        for signal in [SIGINT, SIGTERM] {
            // reason first, so a stopped host never reports HostRequested for a signal
            let registered = flag::register(signal, self.signal_flag.clone())
                .and_then(|_| flag::register(signal, self.shutdown_flag.clone()));
            if let Err(e) = registered {
                log::warn!("Failed to register handler for signal {signal}: {e}");
            }
        }
    }

    /// Why the host stopped (or will stop).
    pub fn shutdown_reason(&self) -> ShutdownReason {
        if self.signal_flag.load(Ordering::Acquire) {
            ShutdownReason::SignalReceived
        } else {
            ShutdownReason::HostRequested
        }
    }

    fn request_shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::Release);
    }

    /// Get a handle to stop the host
    pub fn stop_handle(&self) -> HostStopHandle {
        HostStopHandle::new(self.shutdown_flag.clone())
    }

    pub fn stop(&self) {
        self.request_shutdown();
    }

    /// `false` once stopped by a handle, `stop()`, `shutdown()` or a signal.
    pub fn is_running(&self) -> bool {
        !self.shutdown_flag.load(Ordering::Acquire) && !self.signal_flag.load(Ordering::Acquire)
    }
}
