//! xp-view: print every single patch found in a raw SysEx capture.
//!
//! Usage:
//!   xp-view path/to/capture.syx
//!   xp-view path/to/capture.syx > patches.txt
//!
//! Exit status: 0 when at least one patch was printed, 1 when the input
//! cannot be read, 3 when no single patch dump was found, 4 when a dump is
//! cut short (patches before it are still printed), 5 on other I/O errors.

use std::fs;
use std::io::{self, Cursor, Read, Seek, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use xp_formats::{FormatError, PatchStream};
use xp_ir::PatchListing;

const EXIT_BAD_INPUT: u8 = 1;
const EXIT_NO_PATCH: u8 = 3;
const EXIT_TRUNCATED: u8 = 4;
const EXIT_IO: u8 = 5;

const BANNER: &str = "Oberheim Xpander/Matrix 12 single patch viewer";

#[derive(Parser, Debug)]
#[command(
    name = "xp-view",
    version,
    about = "Dump Xpander / Matrix-12 single patches from a SysEx capture"
)]
struct Args {
    /// Raw SysEx file to scan
    input: PathBuf,

    /// Log scanning progress to stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    /// Do not print the banner line
    #[arg(long)]
    no_banner: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let data = match fs::read(&args.input) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {}", args.input.display(), e);
            return ExitCode::from(EXIT_BAD_INPUT);
        }
    };
    debug!(path = %args.input.display(), bytes = data.len(), "loaded capture");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if !args.no_banner {
        if let Err(e) = write_banner(&mut out) {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(exit_code(&e));
        }
    }

    match print_patches(Cursor::new(data), &mut out) {
        Ok(0) => {
            eprintln!("NO single patch data found!");
            ExitCode::from(EXIT_NO_PATCH)
        }
        Ok(count) => {
            info!(count, "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let _ = out.flush();
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn write_banner<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{}", BANNER).context("failed to write banner")
}

/// Print every patch in `source` to `out`, returning how many were printed.
///
/// A dump that runs out of data is reported after the complete ones.
fn print_patches<R: Read + Seek, W: Write>(source: R, out: &mut W) -> Result<usize> {
    let mut printed = 0;
    for found in PatchStream::new(source) {
        let found = found?;
        write!(out, "{}", PatchListing::new(found.intro.program, &found.patch))
            .context("failed to write listing")?;
        printed += 1;
    }
    out.flush().context("failed to flush output")?;
    Ok(printed)
}

fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<FormatError>() {
        Some(e) if e.is_truncated() => EXIT_TRUNCATED,
        _ => EXIT_IO,
    }
}
