use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vgdlog::{IndexStatus, LogReader, OffsetMode, Pixel, ReadOutcome, ReaderOptions};

#[derive(Parser)]
#[command(name = "vgd", about = "Inspect VGD log containers")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the log count and where each log starts
    Info {
        input: PathBuf,
        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the records of one or more logs
    Dump {
        input: PathBuf,
        /// 1-based log number; repeatable.  Default: every log, last first
        #[arg(short, long = "log")]
        logs: Vec<u32>,
        /// Print records as hex instead of decoded sync flags and RGB
        #[arg(long)]
        raw: bool,
        /// Advance the reported offset by 4 bytes per record instead of 1
        #[arg(long)]
        byte_offsets: bool,
    },
    /// Drain every log and report its record count
    Check {
        input: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {

        // ── Info ─────────────────────────────────────────────────────────────
        Commands::Info { input, json } => {
            let log = LogReader::open(&input)?;
            let summary = Summary::of(&input, &log);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("Container: {}", input.display());
                println!("  Status  {:?}", summary.status);
                println!("  Logs    {}", summary.log_count);
                for (i, off) in summary.offsets.iter().enumerate() {
                    println!("  Log {} @ file offset 0x{:x}", i + 1, off);
                }
            }
            log.close()?;
        }

        // ── Dump ─────────────────────────────────────────────────────────────
        Commands::Dump { input, logs, raw, byte_offsets } => {
            let options = ReaderOptions {
                offset_mode: if byte_offsets { OffsetMode::ByteExact } else { OffsetMode::RecordTick },
            };
            let mut log = LogReader::open_with(&input, options)?;
            let selection = if logs.is_empty() {
                (1..=log.log_count()).rev().collect()
            } else {
                logs
            };

            for n in selection {
                if let Err(e) = log.select(n) {
                    eprintln!("Skipping log {n}: {e}");
                    continue;
                }
                println!("Reading log {} @ offset 0x{:x}:", n, log.current_offset());
                while let ReadOutcome::Continue(record) = log.read_record()? {
                    if raw {
                        println!("Line:\t{}", hex::encode(record.as_bytes()));
                    } else {
                        println!("Line:\t{}", Pixel::from(record));
                    }
                }
                println!("End of log {} @ offset 0x{:x}", n, log.current_offset());
            }
            log.close()?;
        }

        // ── Check ────────────────────────────────────────────────────────────
        Commands::Check { input } => {
            let mut log = LogReader::open(&input)?;
            if log.index_status() == IndexStatus::Failed {
                return Err(format!("could not index {}", input.display()).into());
            }
            for n in 1..=log.log_count() {
                log.select(n)?;
                let records = log.records().collect::<vgdlog::Result<Vec<_>>>()?.len();
                println!("  log {:>6}  start 0x{:08x}  records {}", n, log.offsets()[n as usize - 1], records);
            }
            println!("{} log(s) in {}", log.log_count(), input.display());
            log.close()?;
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Summary<'a> {
    path:      String,
    status:    IndexStatus,
    log_count: u32,
    offsets:   &'a [u64],
}

impl<'a> Summary<'a> {
    fn of(path: &Path, log: &'a LogReader) -> Self {
        Summary {
            path:      path.display().to_string(),
            status:    log.index_status(),
            log_count: log.log_count(),
            offsets:   log.offsets(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
