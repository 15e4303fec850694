/// Sink plugin trait definition
// Plugin and BoundPlugin are named by the impl enum_dispatch generates here.
use crate::binding::BoundPlugin;
use crate::entry::LogEntry;
use crate::plugin::{ConnectionType, Plugin, PluginConfig, TransportKind};
use crate::shutdown::ShutdownReason;
use enum_dispatch::enum_dispatch;
use std::sync::Arc;

/// Callback through which a plugin hands entries back to the host.
///
/// May be invoked zero or more times per input, from any thread.
pub type EntryConsumer = Arc<dyn Fn(LogEntry) + Send + Sync>;

/// Capability set every sink must provide.
///
/// The host calls `set_entry_consumer` and then `configure` exactly once,
/// before any data-carrying call. After that, `consume` and `chunk` may be
/// called concurrently from several threads (one per accepted connection, for
/// instance), so implementations hold their mutable state behind locks.
///
/// # Example
///
/// ```
/// use logship_plugin::entry::LogEntry;
/// use logship_plugin::plugin::{ConnectionType, PluginConfig, SinkPlugin, TransportKind};
///
/// struct Echo;
///
/// impl SinkPlugin for Echo {
///     fn name(&self) -> String {
///         "echo".to_string()
///     }
///
///     fn configure(&self, _config: &PluginConfig) -> Result<(), String> {
///         Ok(())
///     }
///
///     fn supported_types(&self) -> Vec<ConnectionType> {
///         vec![ConnectionType::stream("echo-tcp")]
///     }
///
///     fn chunk(&self, data: &[u8], _source: &str, _kind: TransportKind) -> Vec<u8> {
///         data.to_vec()
///     }
/// }
/// ```
#[enum_dispatch]
pub trait SinkPlugin: Send + Sync + 'static {
    /// Returns the name of the sink
    fn name(&self) -> String;

    /// Key of the configuration block the host hands to `configure`.
    fn config_section_name(&self) -> String {
        self.name()
    }

    /// Interpret the sink's own configuration and prepare for entries.
    fn configure(&self, config: &PluginConfig) -> Result<(), String>;

    /// Register the function used to forward entries to the host.
    fn set_entry_consumer(&self, _consumer: EntryConsumer) {}

    /// Receive an entry pushed by the host.
    ///
    /// The entry is shared with every other sink and must be treated as read-only.
    fn consume(&self, _entry: &LogEntry) -> Result<(), String> {
        Ok(())
    }

    /// Transports this sink can serve. Must be pure and stable for the
    /// lifetime of the sink; an empty list means output-only use.
    fn supported_types(&self) -> Vec<ConnectionType>;

    /// Turn bytes received on behalf of `source` into transport-ready bytes.
    ///
    /// Called incrementally. Returning an empty buffer means nothing is ready
    /// to flush yet. Must not block indefinitely.
    fn chunk(&self, data: &[u8], source: &str, kind: TransportKind) -> Vec<u8>;

    /// Called once when the host shuts down.
    fn shutdown(&self, _reason: ShutdownReason) {}
}

impl<T: SinkPlugin + ?Sized> SinkPlugin for Arc<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn config_section_name(&self) -> String {
        (**self).config_section_name()
    }

    fn configure(&self, config: &PluginConfig) -> Result<(), String> {
        (**self).configure(config)
    }

    fn set_entry_consumer(&self, consumer: EntryConsumer) {
        (**self).set_entry_consumer(consumer)
    }

    fn consume(&self, entry: &LogEntry) -> Result<(), String> {
        (**self).consume(entry)
    }

    fn supported_types(&self) -> Vec<ConnectionType> {
        (**self).supported_types()
    }

    fn chunk(&self, data: &[u8], source: &str, kind: TransportKind) -> Vec<u8> {
        (**self).chunk(data, source, kind)
    }

    fn shutdown(&self, reason: ShutdownReason) {
        (**self).shutdown(reason)
    }
}
