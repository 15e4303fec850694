//! NDJSON sink exposed as an export table.
//!
//! Raw input records are `key=value` pairs separated by whitespace
//! ([`LogEntry::from_kv_line`]). Every record is turned into a [`LogEntry`], handed to
//! the host's consumer and emitted as one line of JSON.

use chrono::Utc;
use logship_plugin::binding::ExportTable;
use logship_plugin::plugin::{DEFAULT_MAX_PENDING, DEFAULT_MAX_SOURCES};
use logship_plugin::prelude::*;
use serde::Deserialize;
use std::sync::{Arc, Mutex, OnceLock};

pub const MODULE_NAME: &str = "ndjson";

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Settings {
    /// Application name for records that carry no `app` field.
    app: String,
    /// Longest unterminated line kept per source.
    max_line_bytes: usize,
    /// Peers with a partial line buffered at the same time.
    max_sources: usize,
    /// Stamp `trcv` on records that carry none.
    stamp_receive_time: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: String::new(),
            max_line_bytes: DEFAULT_MAX_PENDING,
            max_sources: DEFAULT_MAX_SOURCES,
            stamp_receive_time: true,
        }
    }
}

struct Configured {
    settings: Settings,
    framer: LineFramer,
}

#[derive(Default)]
struct NdjsonSink {
    configured: OnceLock<Configured>,
    consumer: Mutex<Option<EntryConsumer>>,
}

impl NdjsonSink {
    fn configure(&self, config: &PluginConfig) -> Result<(), String> {
        let settings: Settings = if config.is_empty() {
            Settings::default()
        } else {
            config.deserialize()?
        };
        if settings.max_line_bytes == 0 {
            return Err("max_line_bytes must be greater than zero".to_string());
        }

        log::info!(
            "NDJSON sink configured (app: '{}', max line: {} bytes)",
            settings.app,
            settings.max_line_bytes
        );
        let framer = LineFramer::with_limits(settings.max_line_bytes, settings.max_sources);
        self.configured
            .set(Configured { settings, framer })
            .map_err(|_| "NDJSON sink is already configured".to_string())
    }

    fn set_entry_consumer(&self, consumer: EntryConsumer) {
        if let Ok(mut slot) = self.consumer.lock() {
            *slot = Some(consumer);
        }
    }

    fn chunk(&self, data: &[u8], source: &str, kind: TransportKind) -> Vec<u8> {
        let Some(configured) = self.configured.get() else {
            log::warn!("NDJSON sink received {} bytes before configuration", data.len());
            return Vec::new();
        };
        let consumer = self.consumer.lock().ok().and_then(|c| c.clone());

        let mut out = Vec::new();
        for record in configured.framer.push(source, data, kind) {
            let entry = build_entry(&record, source, &configured.settings);
            match entry.to_json() {
                Ok(line) => {
                    out.extend_from_slice(line.as_bytes());
                    out.push(b'\n');
                }
                Err(e) => log::warn!("Dropping record from {source}: {e}"),
            }
            if let Some(consumer) = &consumer {
                consumer(entry);
            }
        }
        out
    }

    fn shutdown(&self, reason: ShutdownReason) {
        log::info!("NDJSON sink shutting down: {reason}");
    }
}

fn build_entry(record: &[u8], source: &str, settings: &Settings) -> LogEntry {
    let mut entry = LogEntry::from_kv_line(&String::from_utf8_lossy(record));
    if entry.source().is_empty() {
        entry.set_field(CanonicalField::LogSource.key(), source);
    }
    if entry.app_name().is_empty() && !settings.app.is_empty() {
        entry.set_field(CanonicalField::AppName.key(), &settings.app);
    }
    if entry.rcv_time().is_empty() && settings.stamp_receive_time {
        entry.set_field(CanonicalField::ReceiveTime.key(), &Utc::now().to_rfc3339());
    }
    entry
}

/// Build the module's export table around a fresh sink instance.
pub fn module() -> ExportTable {
    let sink = Arc::new(NdjsonSink::default());
    let configure = Arc::clone(&sink);
    let consumer = Arc::clone(&sink);
    let chunk = Arc::clone(&sink);
    let shutdown = sink;

    ExportTable::new()
        .export_configure(move |config| configure.configure(config))
        .export_supported_types(|| {
            vec![
                ConnectionType::stream("ndjson"),
                ConnectionType::datagram("ndjson"),
            ]
        })
        .export_chunk(move |data, source, kind| chunk.chunk(data, source, kind))
        .export_set_entry_consumer(move |c| consumer.set_entry_consumer(c))
        .export_config_section_name(|| MODULE_NAME.to_string())
        .export_shutdown(move |reason| shutdown.shutdown(reason))
}
