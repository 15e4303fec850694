use crate::binding::BoundPlugin;
use crate::entry::LogEntry;
use crate::plugin::{ConnectionType, EntryConsumer, PluginConfig, SinkPlugin, TransportKind};
use crate::shutdown::ShutdownReason;
use enum_dispatch::enum_dispatch;
use std::sync::Arc;

/// A sink as the host holds it: either compiled into the process or bound
/// from a module's exports.
#[derive(Clone)]
#[enum_dispatch(SinkPlugin)]
pub enum Plugin {
    Native(Arc<dyn SinkPlugin>),
    Bound(BoundPlugin),
}

impl Plugin {
    pub fn native<S: SinkPlugin>(sink: S) -> Self {
        Plugin::Native(Arc::new(sink))
    }

    pub fn bound(plugin: BoundPlugin) -> Self {
        Plugin::Bound(plugin)
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Plugin::Bound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{bind, ExportTable};

    struct NullSink;

    impl SinkPlugin for NullSink {
        fn name(&self) -> String {
            "null".to_string()
        }

        fn configure(&self, _config: &PluginConfig) -> Result<(), String> {
            Ok(())
        }

        fn supported_types(&self) -> Vec<ConnectionType> {
            Vec::new()
        }

        fn chunk(&self, _data: &[u8], _source: &str, _kind: TransportKind) -> Vec<u8> {
            Vec::new()
        }
    }

    #[test]
    fn test_native_plugin_dispatch() {
        let plugin = Plugin::native(NullSink);
        assert!(!plugin.is_bound());
        assert_eq!(plugin.name(), "null");
        assert_eq!(plugin.config_section_name(), "null");
        assert!(plugin.supported_types().is_empty());
        assert!(plugin.configure(&PluginConfig::empty()).is_ok());
    }

    #[test]
    fn test_bound_plugin_dispatch() {
        let exports = ExportTable::new()
            .export_configure(|_config| Ok(()))
            .export_supported_types(|| vec![ConnectionType::stream("tcp-in")])
            .export_chunk(|data, _source, _kind| data.to_ascii_uppercase());

        let plugin = Plugin::bound(bind("upper", &exports).unwrap());
        assert!(plugin.is_bound());
        assert_eq!(plugin.name(), "upper");
        assert_eq!(
            plugin.chunk(b"abc", "peer", TransportKind::Stream),
            b"ABC".to_vec()
        );
        assert_eq!(
            plugin.supported_types(),
            vec![ConnectionType::stream("tcp-in")]
        );
    }

    #[test]
    fn test_plugin_from_variant_types() {
        let sink: Arc<dyn SinkPlugin> = Arc::new(NullSink);
        let plugin: Plugin = sink.into();
        assert!(!plugin.is_bound());
        // entries and consumers pass straight through
        let consumer: EntryConsumer = Arc::new(|_entry| {});
        plugin.set_entry_consumer(consumer);
        assert!(plugin.consume(&LogEntry::new()).is_ok());
        plugin.shutdown(ShutdownReason::InputClosed);
    }
}
