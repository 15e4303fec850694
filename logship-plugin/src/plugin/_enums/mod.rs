pub mod plugin;
pub mod transport;
