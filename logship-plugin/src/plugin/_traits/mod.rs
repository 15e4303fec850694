pub mod sink_plugin;
