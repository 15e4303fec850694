mod cli;
mod ndjson;

use clap::Parser;
use log::info;
use logship_plugin::binding::ModuleCatalog;
use logship_plugin::prelude::*;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const READ_BUFFER_SIZE: usize = 8 * 1024;

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

    let mut catalog = ModuleCatalog::new();
    catalog.add(ndjson::MODULE_NAME, ndjson::module());

    let warnings = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&warnings);
    let mut host = Host::with_consumer(
        Some("sink-ndjson"),
        Arc::new(move |entry: LogEntry| {
            if entry.level() >= Level::Warn {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        }),
    );

    let plugin = catalog.bind(ndjson::MODULE_NAME).unwrap_or_else(|e| {
        eprintln!("Failed to bind sink: {e}");
        std::process::exit(1);
    });
    if let Err(e) = host.register_plugin(Plugin::bound(plugin)) {
        eprintln!("Failed to register sink: {e}");
        std::process::exit(1);
    }
    if let Err(e) = host.start(&config) {
        eprintln!("Failed to start host: {e}");
        std::process::exit(1);
    }

    let conn = if args.datagram {
        ConnectionType::datagram(ndjson::MODULE_NAME)
    } else {
        ConnectionType::stream(ndjson::MODULE_NAME)
    };
    if args.verbose {
        info!("Reading {conn} records from {}", args.source());
    }

    let result = if args.datagram {
        pump_lines(&host, &conn, args.source())
    } else {
        pump_stream(&host, &conn, args.source())
    };

    host.shutdown(ShutdownReason::InputClosed);
    if args.verbose {
        info!(
            "Forwarded entries at WARN or above: {}",
            warnings.load(Ordering::Relaxed)
        );
    }

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn pump_stream(host: &Host, conn: &ConnectionType, source: &str) -> Result<(), String> {
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    let mut buffer = [0u8; READ_BUFFER_SIZE];

    loop {
        let read = stdin
            .read(&mut buffer)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        if read == 0 {
            break;
        }
        let data = buffer.get(..read).unwrap_or_default();
        write_chunk(&mut stdout, &host.chunk(conn, data, source).map_err(|e| e.to_string())?)?;
    }

    // an unterminated last line still counts as a record
    write_chunk(&mut stdout, &host.chunk(conn, b"\n", source).map_err(|e| e.to_string())?)
}

fn pump_lines(host: &Host, conn: &ConnectionType, source: &str) -> Result<(), String> {
    let mut stdout = std::io::stdout().lock();

    for line in std::io::stdin().lines() {
        let line = line.map_err(|e| format!("Failed to read stdin: {e}"))?;
        let out = host
            .chunk(conn, line.as_bytes(), source)
            .map_err(|e| e.to_string())?;
        write_chunk(&mut stdout, &out)?;
    }
    Ok(())
}

fn write_chunk(out: &mut impl Write, chunk: &[u8]) -> Result<(), String> {
    if chunk.is_empty() {
        return Ok(());
    }
    out.write_all(chunk)
        .and_then(|_| out.flush())
        .map_err(|e| format!("Failed to write stdout: {e}"))
}
