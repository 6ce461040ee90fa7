//! Byte converter CLI
//!
//! Reads byte literals from stdin, converts them in the background worker
//! and prints the symbols once the input is exhausted.
//!
//! ```text
//! $ echo "0b11111100 0b01100110 0b01100101" | byteconv
//! 63
//! z
//! 25
//! ```
//!
//! Options:
//! - `--json`: print a JSON array instead of one symbol per line
//!
//! Environment:
//! - `BYTECONV_CONFIG`: path to a JSON `ConverterConfig`
//! - `RUST_LOG`: log filter, `info` by default (logs go to stderr)

use byteconv::{ConfigError, Converter, ConverterConfig, MemSink, MemSource};
use cli::{feed_lines, output};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

fn load_config() -> Result<ConverterConfig, ConfigError> {
    match std::env::var_os("BYTECONV_CONFIG") {
        Some(path) => {
            let file = std::fs::File::open(&path)?;
            ConverterConfig::from_reader(std::io::BufReader::new(file))
        }
        None => Ok(ConverterConfig::default()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let json = std::env::args().skip(1).any(|arg| arg == "--json");

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let source = Arc::new(MemSource::new());
    let sink = Arc::new(MemSink::new());
    let mut converter = Converter::with_config(Arc::clone(&source), Arc::clone(&sink), config);
    if let Err(e) = converter.run() {
        error!(error = %e, "failed to start the converter");
        return ExitCode::FAILURE;
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    // A read error ends the input; what was queued so far is still printed
    let input_failed = match feed_lines(stdin, &source).await {
        Ok(stats) => {
            info!(
                lines = stats.lines,
                bytes = stats.bytes,
                rejected = stats.rejected,
                "input finished"
            );
            false
        }
        Err(e) => {
            error!(error = %e, "failed to read stdin, converting what was read");
            true
        }
    };

    // Waiting and joining block, keep them off the runtime thread
    let drained = tokio::task::spawn_blocking(move || {
        let drained = converter.wait_drained(DRAIN_TIMEOUT);
        converter.stop();
        drained
    })
    .await;
    match drained {
        Ok(true) => {}
        Ok(false) => warn!(pending = source.len(), "converter did not drain in time"),
        Err(e) => {
            error!(error = %e, "converter shutdown task failed");
            return ExitCode::FAILURE;
        }
    }

    let symbols = sink.snapshot();
    let rendered = if json {
        match output::render_json(&symbols) {
            Ok(text) => text + "\n",
            Err(e) => {
                error!(error = %e, "failed to render symbols");
                return ExitCode::FAILURE;
            }
        }
    } else {
        output::render_plain(&symbols)
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(rendered.as_bytes()).and_then(|()| stdout.flush()) {
        error!(error = %e, "failed to write output");
        return ExitCode::FAILURE;
    }

    if input_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
