//! tracebuf: capture a handful of demo records, then replay them.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::Level;
use workerpool::thunk::{Thunk, ThunkWorker};
use workerpool::Pool;

use tracebuf::{
    lval, record, record_here, BufferConfig, CaptureError, JsonPrinter, RecordSink, Static,
    TextPrinter, TraceBuffer,
};

#[derive(Debug, Parser)]
#[command(name = "tracebuf")]
#[command(about = "Capture demo trace records and replay them")]
#[command(version)]
struct Command {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Output format: text, json
    #[arg(short, long, default_value = "text")]
    format: String,
    /// Write replayed records here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// JSON buffer config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Worker threads capturing concurrently (0 = none)
    #[arg(long, default_value = "0")]
    threads: usize,
    /// Records each worker thread captures
    #[arg(long, default_value = "4")]
    records_per_thread: usize,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn capture_demo(buffer: &TraceBuffer) -> Result<()> {
    record_here!(buffer, "Area1", "Hello, ", "world!")?;
    record!(
        buffer,
        "Area2",
        "I like to write",
        5,
        "numbers:",
        1,
        2,
        3,
        4,
        5
    )?;

    let x = 4;
    let f = 3.1415f32;
    let blah = "Yo!";
    record!(buffer, "Area1", lval!(x), lval!(f), lval!(blah))?;

    record!(
        buffer,
        "Really just a char*",
        Static("but not so in the real implementation"),
        Static("...sound good?")
    )?;
    Ok(())
}

fn capture_concurrent(
    buffer: &Arc<TraceBuffer>,
    threads: usize,
    records_per_thread: usize,
) -> Result<()> {
    let pool = Pool::<ThunkWorker<()>>::new(threads);
    let failures: Arc<Mutex<Vec<(usize, CaptureError)>>> = Arc::new(Mutex::new(Vec::new()));
    for worker in 0..threads {
        let buffer = Arc::clone(buffer);
        let failures = Arc::clone(&failures);
        pool.execute(Thunk::of(move || {
            for seq in 0..records_per_thread {
                if let Err(err) = record!(buffer, "Worker", lval!(worker), lval!(seq)) {
                    failures
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((worker, err));
                    return;
                }
            }
        }));
    }
    pool.join();

    let failures = mem::take(&mut *failures.lock().unwrap_or_else(PoisonError::into_inner));
    if let Some((worker, err)) = failures.into_iter().min_by_key(|(worker, _)| *worker) {
        return Err(err).with_context(|| format!("Worker {worker} stopped capturing"));
    }
    Ok(())
}

fn main() -> Result<()> {
    let opts = Command::parse();
    init_logging(opts.verbose);

    if opts.format != "text" && opts.format != "json" {
        bail!("Unknown output format '{}'. Valid formats: text, json", opts.format);
    }

    let config = match &opts.config {
        Some(path) => BufferConfig::from_file(path)?,
        None => BufferConfig::default(),
    };
    tracing::info!("Buffer config: {:?}", config);

    let buffer = Arc::new(TraceBuffer::with_config(config));
    capture_demo(&buffer)?;
    if opts.threads > 0 {
        capture_concurrent(&buffer, opts.threads, opts.records_per_thread)?;
    }
    tracing::info!(
        "Captured {} records ({} bytes, {} shapes)",
        buffer.record_count(),
        buffer.len(),
        buffer.registry().shape_count()
    );

    let writer: Box<dyn Write> = match &opts.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let mut sink: Box<dyn RecordSink> = match opts.format.as_str() {
        "json" => Box::new(JsonPrinter::new(writer)),
        _ => Box::new(TextPrinter::new(writer)),
    };

    let stats = buffer.replay(sink.as_mut())?;
    tracing::info!("Replayed {} records ({} bytes)", stats.records, stats.bytes);
    Ok(())
}
