//! Accessory station console.
//!
//! Reads protocol frames from stdin, one per line, and prints replies to
//! stdout. Logs go to stderr. Turnouts persist as JSON under the data
//! directory when `<E>` is sent.
//!
//! # Usage
//!
//! ```bash
//! # Default data directory (current directory)
//! accessory_console
//!
//! # Custom data directory and config file
//! accessory_console --data-dir /var/lib/station --config station.json
//!
//! # Watch packets as they leave the queue
//! RUST_LOG=trainz_accessories=debug accessory_console -v
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trainz_accessories::hal::{FileStore, SharedPacketQueue, DEFAULT_QUEUE_DEPTH};
use trainz_accessories::services::{LineHandler, SharedStation};
use trainz_accessories::traits::StatusDisplay;
use trainz_accessories::{AccessoryStation, Config, StorageConfig};

/// How often the generator thread drains the packet queue
const GENERATOR_POLL_MS: u64 = 5;

/// Accessory station console - DCC turnout control over stdin/stdout
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding persisted turnouts (overrides the config file)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Status display that writes to the log.
struct LogDisplay;

impl StatusDisplay for LogDisplay {
    type Error = core::convert::Infallible;

    fn replace_line(&mut self, line: u8, text: &str) -> Result<(), Self::Error> {
        info!("[display {}] {}", line, text);
        Ok(())
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose {
        "trainz_accessories=debug,accessory_console=debug"
    } else {
        "trainz_accessories=info,accessory_console=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Config::from_json(&json)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => Config::default(),
    };
    if let Some(dir) = &args.data_dir {
        let storage = config.storage.clone();
        config = config.with_storage(StorageConfig {
            data_dir: trainz_accessories::config::long_string(&dir.to_string_lossy()),
            ..storage
        });
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = load_config(&args)?;
    info!(
        "{} ({}) using {}",
        config.device.name,
        config.device.id,
        config.storage.data_dir
    );

    let queue: SharedPacketQueue<DEFAULT_QUEUE_DEPTH> = SharedPacketQueue::new();
    let store = FileStore::new(config.storage.data_dir.as_str());
    let station = AccessoryStation::new(queue.clone(), store, &config);
    let shared = Arc::new(SharedStation::new(station));

    shared
        .init(&mut LogDisplay)
        .context("Failed to load persisted turnouts")?;

    // Stand-in for the waveform generator: drain the queue and log packets
    let running = Arc::new(AtomicBool::new(true));
    let generator = {
        let running = Arc::clone(&running);
        let queue = queue.clone();
        thread::spawn(move || {
            while running.load(Ordering::Relaxed) || !queue.is_empty() {
                match queue.pop() {
                    Some(packet) => debug!("Track <- {:02X?} x{}", packet.bytes, packet.repeats),
                    None => thread::sleep(Duration::from_millis(GENERATOR_POLL_MS)),
                }
            }
        })
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read stdin")?;
        for reply in shared.handle_line(&line) {
            writeln!(out, "{}", reply)?;
        }
        out.flush()?;
    }

    running.store(false, Ordering::Relaxed);
    if generator.join().is_err() {
        anyhow::bail!("Packet generator thread panicked");
    }
    info!("Console closed");
    Ok(())
}
