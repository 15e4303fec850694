/// Export names, their signatures and the in-process export table
use crate::binding::error::LookupError;
use crate::binding::ModuleLookup;
use crate::entry::LogEntry;
use crate::plugin::{ConnectionType, EntryConsumer, PluginConfig, SinkPlugin, TransportKind};
use crate::shutdown::ShutdownReason;
use bitflags::bitflags;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

pub const CONFIGURE: &str = "Configure";
pub const SUPPORTED_TYPES: &str = "SupportedTypes";
pub const CHUNK: &str = "Chunk";
pub const SET_ENTRY_CONSUMER: &str = "SetEntryConsumer";
pub const CONFIG_SECTION_NAME: &str = "ConfigSectionName";
pub const CONSUME: &str = "Consume";
pub const SHUTDOWN: &str = "Shutdown";

/// Untyped handle to an exported callable.
///
/// The concrete type behind it must be one of the `*Fn` aliases below for
/// the export to bind.
pub type Export = Arc<dyn Any + Send + Sync>;

pub type ConfigureFn = Arc<dyn Fn(&PluginConfig) -> Result<(), String> + Send + Sync>;
pub type SupportedTypesFn = Arc<dyn Fn() -> Vec<ConnectionType> + Send + Sync>;
pub type ChunkFn = Arc<dyn Fn(&[u8], &str, TransportKind) -> Vec<u8> + Send + Sync>;
pub type SetEntryConsumerFn = Arc<dyn Fn(EntryConsumer) + Send + Sync>;
pub type ConfigSectionNameFn = Arc<dyn Fn() -> String + Send + Sync>;
pub type ConsumeFn = Arc<dyn Fn(&LogEntry) -> Result<(), String> + Send + Sync>;
pub type ShutdownFn = Arc<dyn Fn(ShutdownReason) + Send + Sync>;

/// Human readable signature expected for `symbol`.
pub fn signature_of(symbol: &str) -> &'static str {
    match symbol {
        CONFIGURE => "fn(&PluginConfig) -> Result<(), String>",
        SUPPORTED_TYPES => "fn() -> Vec<ConnectionType>",
        CHUNK => "fn(&[u8], &str, TransportKind) -> Vec<u8>",
        SET_ENTRY_CONSUMER => "fn(EntryConsumer)",
        CONFIG_SECTION_NAME => "fn() -> String",
        CONSUME => "fn(&LogEntry) -> Result<(), String>",
        SHUTDOWN => "fn(ShutdownReason)",
        _ => "an unknown export",
    }
}

bitflags! {
    /// Exports a bound module provides.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Exports: u32 {
        const CONFIGURE = 1;
        const SUPPORTED_TYPES = 2;
        const CHUNK = 4;
        const SET_ENTRY_CONSUMER = 8;
        const CONFIG_SECTION_NAME = 16;
        const CONSUME = 32;
        const SHUTDOWN = 64;

        const REQUIRED = Self::CONFIGURE.bits() | Self::SUPPORTED_TYPES.bits() | Self::CHUNK.bits();
    }
}

fn erase<T: Any + Send + Sync>(value: T) -> Export {
    Arc::new(value)
}

/// Symbols exported by an in-process module.
///
/// Typed `export_*` methods store each callable under its well-known name with
/// the expected signature; `insert` accepts any handle and leaves validation to
/// the binder.
///
/// # Example
///
/// ```
/// use logship_plugin::binding::{bind, ExportTable};
/// use logship_plugin::plugin::ConnectionType;
///
/// let exports = ExportTable::new()
///     .export_configure(|_config| Ok(()))
///     .export_supported_types(|| vec![ConnectionType::datagram("gelf")])
///     .export_chunk(|data, _source, _kind| data.to_vec());
///
/// let plugin = bind("gelf", &exports).unwrap();
/// assert_eq!(plugin.module(), "gelf");
/// ```
#[derive(Clone, Default)]
pub struct ExportTable {
    symbols: HashMap<String, Export>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an untyped export under `name`, replacing any previous one.
    pub fn insert(&mut self, name: &str, export: Export) {
        self.symbols.insert(name.to_string(), export);
    }

    pub fn with(mut self, name: &str, export: Export) -> Self {
        self.insert(name, export);
        self
    }

    pub fn export_configure<F>(self, f: F) -> Self
    where
        F: Fn(&PluginConfig) -> Result<(), String> + Send + Sync + 'static,
    {
        let typed: ConfigureFn = Arc::new(f);
        self.with(CONFIGURE, erase(typed))
    }

    pub fn export_supported_types<F>(self, f: F) -> Self
    where
        F: Fn() -> Vec<ConnectionType> + Send + Sync + 'static,
    {
        let typed: SupportedTypesFn = Arc::new(f);
        self.with(SUPPORTED_TYPES, erase(typed))
    }

    pub fn export_chunk<F>(self, f: F) -> Self
    where
        F: Fn(&[u8], &str, TransportKind) -> Vec<u8> + Send + Sync + 'static,
    {
        let typed: ChunkFn = Arc::new(f);
        self.with(CHUNK, erase(typed))
    }

    pub fn export_set_entry_consumer<F>(self, f: F) -> Self
    where
        F: Fn(EntryConsumer) + Send + Sync + 'static,
    {
        let typed: SetEntryConsumerFn = Arc::new(f);
        self.with(SET_ENTRY_CONSUMER, erase(typed))
    }

    pub fn export_config_section_name<F>(self, f: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        let typed: ConfigSectionNameFn = Arc::new(f);
        self.with(CONFIG_SECTION_NAME, erase(typed))
    }

    pub fn export_consume<F>(self, f: F) -> Self
    where
        F: Fn(&LogEntry) -> Result<(), String> + Send + Sync + 'static,
    {
        let typed: ConsumeFn = Arc::new(f);
        self.with(CONSUME, erase(typed))
    }

    pub fn export_shutdown<F>(self, f: F) -> Self
    where
        F: Fn(ShutdownReason) + Send + Sync + 'static,
    {
        let typed: ShutdownFn = Arc::new(f);
        self.with(SHUTDOWN, erase(typed))
    }

    /// Export every capability of a native plugin.
    pub fn from_plugin(plugin: Arc<dyn SinkPlugin>) -> Self {
        let configure = Arc::clone(&plugin);
        let types = Arc::clone(&plugin);
        let chunk = Arc::clone(&plugin);
        let consumer = Arc::clone(&plugin);
        let section = Arc::clone(&plugin);
        let consume = Arc::clone(&plugin);
        let shutdown = plugin;

        ExportTable::new()
            .export_configure(move |config| configure.configure(config))
            .export_supported_types(move || types.supported_types())
            .export_chunk(move |data, source, kind| chunk.chunk(data, source, kind))
            .export_set_entry_consumer(move |c| consumer.set_entry_consumer(c))
            .export_config_section_name(move || section.config_section_name())
            .export_consume(move |entry| consume.consume(entry))
            .export_shutdown(move |reason| shutdown.shutdown(reason))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Names of all exported symbols, in no particular order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }
}

impl ModuleLookup for ExportTable {
    fn lookup(&self, symbol: &str) -> Result<Export, LookupError> {
        self.symbols
            .get(symbol)
            .cloned()
            .ok_or(LookupError::NotFound)
    }
}
