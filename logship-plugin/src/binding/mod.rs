//! Binding sink plugins from module exports.
//!
//! A module is anything that can resolve an export name to an untyped
//! callable: an [`ExportTable`] built in-process, or any closure implementing
//! [`ModuleLookup`] in front of some other loading mechanism. [`bind`] checks
//! that the module satisfies the whole sink contract and returns a typed
//! [`BoundPlugin`], or a [`BindError`] naming the first problem.
//!
//! # Exports
//!
//! | Name                | Required | Signature                                      |
//! |---------------------|----------|------------------------------------------------|
//! | `Configure`         | yes      | `fn(&PluginConfig) -> Result<(), String>`      |
//! | `SupportedTypes`    | yes      | `fn() -> Vec<ConnectionType>`                  |
//! | `Chunk`             | yes      | `fn(&[u8], &str, TransportKind) -> Vec<u8>`    |
//! | `SetEntryConsumer`  | no       | `fn(EntryConsumer)`                            |
//! | `ConfigSectionName` | no       | `fn() -> String`                               |
//! | `Consume`           | no       | `fn(&LogEntry) -> Result<(), String>`          |
//! | `Shutdown`          | no       | `fn(ShutdownReason)`                           |
//!
//! Required exports are looked up in the order listed and binding stops at the
//! first lookup failure. Only then are the handles checked against their
//! signatures. A mismatch means the module was built against an incompatible
//! contract and is just as fatal as a missing export.

mod bound_plugin;
mod error;
pub mod exports;

pub use bound_plugin::BoundPlugin;
pub use error::{BindError, LookupError};
pub use exports::{Export, ExportTable, Exports};

use exports::{
    signature_of, ChunkFn, ConfigSectionNameFn, ConfigureFn, ConsumeFn, SetEntryConsumerFn,
    ShutdownFn, SupportedTypesFn, CHUNK, CONFIGURE, CONFIG_SECTION_NAME, CONSUME,
    SET_ENTRY_CONSUMER, SHUTDOWN, SUPPORTED_TYPES,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Resolves an exported name to an untyped callable.
pub trait ModuleLookup {
    fn lookup(&self, symbol: &str) -> Result<Export, LookupError>;
}

impl<F> ModuleLookup for F
where
    F: Fn(&str) -> Result<Export, LookupError>,
{
    fn lookup(&self, symbol: &str) -> Result<Export, LookupError> {
        self(symbol)
    }
}

fn lookup_required<L: ModuleLookup + ?Sized>(
    module: &str,
    lookup: &L,
    symbol: &str,
) -> Result<Export, BindError> {
    lookup.lookup(symbol).map_err(|e| match e {
        LookupError::NotFound => BindError::MissingExport {
            module: module.to_string(),
            symbol: symbol.to_string(),
        },
        LookupError::Failed(reason) => BindError::Lookup {
            module: module.to_string(),
            symbol: symbol.to_string(),
            reason,
        },
    })
}

fn lookup_optional<L: ModuleLookup + ?Sized>(
    module: &str,
    lookup: &L,
    symbol: &str,
) -> Result<Option<Export>, BindError> {
    match lookup_required(module, lookup, symbol) {
        Ok(export) => Ok(Some(export)),
        Err(BindError::MissingExport { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn cast<T: Any + Clone>(module: &str, symbol: &str, export: &Export) -> Result<T, BindError> {
    export
        .downcast_ref::<T>()
        .cloned()
        .ok_or_else(|| BindError::SignatureMismatch {
            module: module.to_string(),
            symbol: symbol.to_string(),
            expected: signature_of(symbol).to_string(),
        })
}

fn cast_optional<T: Any + Clone>(
    module: &str,
    symbol: &str,
    export: Option<Export>,
) -> Result<Option<T>, BindError> {
    export
        .map(|export| cast::<T>(module, symbol, &export))
        .transpose()
}

/// Bind `module` as a sink plugin.
///
/// Nothing is returned unless every required export resolved with the
/// expected signature, so a partially bound module never reaches the host.
pub fn bind<L: ModuleLookup + ?Sized>(module: &str, lookup: &L) -> Result<BoundPlugin, BindError> {
    bind_exports(module, lookup).inspect_err(|e| log::error!("Failed to bind module: {e}"))
}

fn bind_exports<L: ModuleLookup + ?Sized>(
    module: &str,
    lookup: &L,
) -> Result<BoundPlugin, BindError> {
    let configure = lookup_required(module, lookup, CONFIGURE)?;
    let supported_types = lookup_required(module, lookup, SUPPORTED_TYPES)?;
    let chunk = lookup_required(module, lookup, CHUNK)?;

    let configure = cast::<ConfigureFn>(module, CONFIGURE, &configure)?;
    let supported_types = cast::<SupportedTypesFn>(module, SUPPORTED_TYPES, &supported_types)?;
    let chunk = cast::<ChunkFn>(module, CHUNK, &chunk)?;

    let set_entry_consumer = cast_optional::<SetEntryConsumerFn>(
        module,
        SET_ENTRY_CONSUMER,
        lookup_optional(module, lookup, SET_ENTRY_CONSUMER)?,
    )?;
    let config_section_name = cast_optional::<ConfigSectionNameFn>(
        module,
        CONFIG_SECTION_NAME,
        lookup_optional(module, lookup, CONFIG_SECTION_NAME)?,
    )?;
    let consume = cast_optional::<ConsumeFn>(
        module,
        CONSUME,
        lookup_optional(module, lookup, CONSUME)?,
    )?;
    let shutdown = cast_optional::<ShutdownFn>(
        module,
        SHUTDOWN,
        lookup_optional(module, lookup, SHUTDOWN)?,
    )?;

    let mut exports = Exports::REQUIRED;
    exports.set(Exports::SET_ENTRY_CONSUMER, set_entry_consumer.is_some());
    exports.set(Exports::CONFIG_SECTION_NAME, config_section_name.is_some());
    exports.set(Exports::CONSUME, consume.is_some());
    exports.set(Exports::SHUTDOWN, shutdown.is_some());

    log::debug!("Bound module '{module}' with exports {exports:?}");

    Ok(BoundPlugin {
        module: module.to_string(),
        exports,
        configure,
        supported_types,
        chunk,
        set_entry_consumer,
        config_section_name,
        consume,
        shutdown,
        types: Arc::new(OnceLock::new()),
    })
}

/// Named collection of in-process modules.
///
/// Lets a host bind sinks by the names found in its configuration.
#[derive(Clone, Default)]
pub struct ModuleCatalog {
    modules: HashMap<String, ExportTable>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, exports: ExportTable) -> &mut Self {
        self.modules.insert(name.to_string(), exports);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Bind the module registered under `name`.
    pub fn bind(&self, name: &str) -> Result<BoundPlugin, BindError> {
        let exports = self
            .modules
            .get(name)
            .ok_or_else(|| BindError::ModuleNotFound {
                module: name.to_string(),
            })?;
        bind(name, exports)
    }
}
