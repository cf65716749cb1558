//! Command-line driver: reads a raw OOB demodulator byte stream and writes recovered
//! MPEG-2 TS packets, via [`oobcore::OobDecoder`].

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use oobcore::OobDecoder;

/// One 768-byte unit is two encoded frames: four 96-byte RS blocks, decoding to four
/// TS packets of 188 bytes each.
const INPUT_UNIT_LEN: usize = 768;
const OUTPUT_UNIT_LEN: usize = 752;

#[derive(Parser)]
#[command(about = "Decode a CableLabs OOB downstream byte stream into MPEG-2 TS packets")]
struct Args {
    /// Input filename, or "-" for stdin
    #[arg(short = 'f', default_value = "-")]
    input: PathBuf,

    /// Output filename (overwritten if it exists), or "-" for stdout
    #[arg(short = 'w', default_value = "-")]
    output: PathBuf,

    /// Number of 768-byte units to read and process per chunk
    #[arg(short = 'b', default_value_t = 100)]
    blocks_per_chunk: usize,

    /// Enable FEC: check and repair Reed-Solomon blocks, flag uncorrectable packets
    #[arg(short = 'e')]
    do_fec: bool,
}

fn open_input(path: &PathBuf) -> io::Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

fn open_output(path: &PathBuf) -> io::Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(File::create(path)?))
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut input = match open_input(&args.input) {
        Ok(f) => f,
        Err(e) => {
            error!("unable to open input '{}': {e}", args.input.display());
            return ExitCode::from(2);
        }
    };
    let mut output = match open_output(&args.output) {
        Ok(f) => f,
        Err(e) => {
            error!("unable to open output '{}': {e}", args.output.display());
            return ExitCode::from(2);
        }
    };

    match run(&mut *input, &mut *output, args.blocks_per_chunk, args.do_fec) {
        Ok(decoder) => {
            if args.do_fec {
                let stats = decoder.stats();
                info!(
                    "processed FEC blocks: {}, errors: {}, corrected: {}",
                    stats.blocks_total(),
                    stats.blocks_error(),
                    stats.blocks_corrected(),
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(
    input: &mut dyn Read,
    output: &mut dyn Write,
    blocks_per_chunk: usize,
    do_fec: bool,
) -> Result<OobDecoder, RunError> {
    let in_cap = blocks_per_chunk * INPUT_UNIT_LEN;
    let out_cap = blocks_per_chunk * OUTPUT_UNIT_LEN;

    let mut in_buf = vec![0u8; in_cap];
    let mut out_buf = vec![0u8; out_cap];
    let mut residual = 0;
    let mut decoder = OobDecoder::new();

    loop {
        let bytes_read = input.read(&mut in_buf[residual..in_cap])?;
        if bytes_read == 0 {
            break;
        }

        let result =
            decoder.process_chunk(&mut in_buf, residual + bytes_read, &mut out_buf, do_fec)?;
        if result.out_len > 0 {
            output.write_all(&out_buf[..result.out_len])?;
        }
        residual = result.remaining;
    }

    Ok(decoder)
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Pipeline(#[from] oobcore::PipelineError),
}
