mod _enums;
mod _traits;
mod config;
mod connection_type;
mod framing;

// Re-exporting all public structures
pub use _enums::plugin::Plugin;
pub use _enums::transport::TransportKind;

pub use _traits::sink_plugin::{EntryConsumer, SinkPlugin};

pub use config::PluginConfig;
pub use connection_type::ConnectionType;
pub use framing::{LineFramer, DEFAULT_MAX_PENDING, DEFAULT_MAX_SOURCES};
