mod config;
mod core;
mod error;
mod routing;
mod stop_handle;

pub use config::HostConfig;
pub use self::core::Host;
pub use error::HostError;
pub use routing::RoutingTable;
pub use stop_handle::HostStopHandle;
