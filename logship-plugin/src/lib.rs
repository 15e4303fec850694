#![forbid(unsafe_code)]

//! Host-side contract for log sink plugins.
//!
//! A sink turns raw bytes received on a connection into transport-ready
//! output and may produce [`LogEntry`](entry::LogEntry) values along the way.
//! Sinks are either native Rust types implementing
//! [`SinkPlugin`](plugin::SinkPlugin) or modules bound by name through
//! [`binding::bind`]; the [`Host`] configures, routes to and shuts down both
//! kinds the same way.

pub mod binding;
pub mod entry;
pub mod host;
pub mod plugin;
pub mod shutdown;

pub use crate::host::{Host, HostStopHandle};

///
/// Expose all structures required in virtually any sink plugin or host
///
/// ```
/// use logship_plugin::prelude::*;
/// ```
pub mod prelude {
    pub use crate::binding::{bind, BindError, BoundPlugin, ExportTable, ModuleCatalog};
    pub use crate::entry::{CanonicalField, Level, LogEntry};
    pub use crate::host::{Host, HostConfig, HostError, HostStopHandle};
    pub use crate::plugin::{
        ConnectionType, EntryConsumer, LineFramer, Plugin, PluginConfig, SinkPlugin,
        TransportKind,
    };
    pub use crate::shutdown::ShutdownReason;
}
