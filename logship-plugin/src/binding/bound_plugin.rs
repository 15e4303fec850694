/// Sink plugin assembled from a module's resolved exports
use crate::binding::exports::{
    ChunkFn, ConfigSectionNameFn, ConfigureFn, ConsumeFn, Exports, SetEntryConsumerFn, ShutdownFn,
    SupportedTypesFn,
};
use crate::entry::LogEntry;
use crate::plugin::{ConnectionType, EntryConsumer, PluginConfig, SinkPlugin, TransportKind};
use crate::shutdown::ShutdownReason;
use std::sync::{Arc, OnceLock};

/// A fully bound module.
///
/// Only [`bind`](crate::binding::bind) creates one, and only after every
/// required export resolved with the right signature.
#[derive(Clone)]
pub struct BoundPlugin {
    pub(crate) module: String,
    pub(crate) exports: Exports,
    pub(crate) configure: ConfigureFn,
    pub(crate) supported_types: SupportedTypesFn,
    pub(crate) chunk: ChunkFn,
    pub(crate) set_entry_consumer: Option<SetEntryConsumerFn>,
    pub(crate) config_section_name: Option<ConfigSectionNameFn>,
    pub(crate) consume: Option<ConsumeFn>,
    pub(crate) shutdown: Option<ShutdownFn>,
    pub(crate) types: Arc<OnceLock<Vec<ConnectionType>>>,
}

impl BoundPlugin {
    /// Name the module was bound under.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Which exports were resolved.
    pub fn exports(&self) -> Exports {
        self.exports
    }
}

impl std::fmt::Debug for BoundPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundPlugin")
            .field("module", &self.module)
            .field("exports", &self.exports)
            .finish_non_exhaustive()
    }
}

impl SinkPlugin for BoundPlugin {
    fn name(&self) -> String {
        self.module.clone()
    }

    fn config_section_name(&self) -> String {
        match &self.config_section_name {
            Some(f) => f(),
            None => self.module.clone(),
        }
    }

    fn configure(&self, config: &PluginConfig) -> Result<(), String> {
        (self.configure)(config)
    }

    fn set_entry_consumer(&self, consumer: EntryConsumer) {
        match &self.set_entry_consumer {
            Some(f) => f(consumer),
            None => log::debug!(
                "Module '{}' does not export SetEntryConsumer, consumer not registered",
                self.module
            ),
        }
    }

    fn consume(&self, entry: &LogEntry) -> Result<(), String> {
        match &self.consume {
            Some(f) => f(entry),
            None => Ok(()),
        }
    }

    // Resolved once so repeated calls stay stable even if the export is not pure.
    fn supported_types(&self) -> Vec<ConnectionType> {
        self.types.get_or_init(|| (self.supported_types)()).clone()
    }

    fn chunk(&self, data: &[u8], source: &str, kind: TransportKind) -> Vec<u8> {
        (self.chunk)(data, source, kind)
    }

    fn shutdown(&self, reason: ShutdownReason) {
        if let Some(f) = &self.shutdown {
            f(reason);
        }
    }
}
