mod cli;

use chrono::Local;
use clap::Parser;
use log::info;
use logship_plugin::prelude::*;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

struct FileSinkPlugin {
    default_path: PathBuf,
    log_file: Mutex<Option<(PathBuf, File)>>,
}

impl FileSinkPlugin {
    fn new(default_path: PathBuf) -> Self {
        Self {
            default_path,
            log_file: Mutex::new(None),
        }
    }

    fn write_line(&self, line: &str) -> Result<(), String> {
        let mut guard = self
            .log_file
            .lock()
            .map_err(|e| format!("Failed to lock file: {e}"))?;
        let (_, file) = guard
            .as_mut()
            .ok_or_else(|| "File sink is not configured".to_string())?;

        file.write_all(line.as_bytes())
            .map_err(|e| format!("Failed to write to log file: {e}"))?;

        file.flush()
            .map_err(|e| format!("Failed to flush log file: {e}"))?;

        Ok(())
    }
}

impl SinkPlugin for FileSinkPlugin {
    fn name(&self) -> String {
        "file_sink".to_string()
    }

    fn configure(&self, config: &PluginConfig) -> Result<(), String> {
        let path = config
            .get_str("path")
            .map(PathBuf::from)
            .unwrap_or_else(|| self.default_path.clone());
        info!("Configuring file sink: {}", path.display());

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| format!("Failed to open {}: {e}", path.display()))?;

        let mut guard = self
            .log_file
            .lock()
            .map_err(|e| format!("Failed to lock file: {e}"))?;
        *guard = Some((path, file));
        Ok(())
    }

    fn consume(&self, entry: &LogEntry) -> Result<(), String> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let formatted = format!(
            "[{timestamp}] [{}] {}: {}\n",
            entry.level_name(),
            entry.app_name(),
            entry.message()
        );
        self.write_line(&formatted)
    }

    // Output only, no live connections.
    fn supported_types(&self) -> Vec<ConnectionType> {
        Vec::new()
    }

    fn chunk(&self, _data: &[u8], _source: &str, _kind: TransportKind) -> Vec<u8> {
        Vec::new()
    }

    fn shutdown(&self, reason: ShutdownReason) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let formatted = format!("[{timestamp}] === File sink shutting down: {reason} ===\n");

        if let Err(e) = self.write_line(&formatted) {
            log::debug!("Shutdown marker not written: {e}");
        }
    }
}

/// Build an entry from a `key=value` line, stamping `app` when it names none.
fn parse_line(line: &str, app: &str) -> LogEntry {
    let mut entry = LogEntry::from_kv_line(line);
    if entry.app_name().is_empty() {
        entry.set_field("app", app);
    }
    entry
}

fn main() {
    env_logger::init();
    let args = cli::Args::parse();

    let config = match args.config() {
        Some(path) => HostConfig::from_path(path).unwrap_or_else(|e| {
            eprintln!("{e}");
            std::process::exit(1);
        }),
        None => HostConfig::new(),
    };

    if args.verbose {
        info!("Starting file sink");
        info!("Default log file path: {}", args.log_file().display());
    }

    let mut host = Host::new(Some("file_sink"));
    let sink = FileSinkPlugin::new(args.log_file().to_path_buf());
    if let Err(e) = host.register_plugin(Plugin::native(sink)) {
        eprintln!("Failed to register sink: {e}");
        std::process::exit(1);
    }
    if let Err(e) = host.start(&config) {
        eprintln!("Failed to start host: {e}");
        std::process::exit(1);
    }

    #[cfg(unix)]
    host.install_signal_handlers();

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Failed to read stdin: {e}");
                    break;
                }
            }
        }
    });

    let mut reason = ShutdownReason::InputClosed;
    loop {
        if !host.is_running() {
            reason = host.shutdown_reason();
            break;
        }
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => {
                if let Err(e) = host.dispatch(&parse_line(&line, &args.app)) {
                    log::warn!("Entry not dispatched: {e}");
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    if args.verbose {
        info!("Stopping file sink: {reason}");
    }
    host.shutdown(reason);
}
