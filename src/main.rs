//! `bcfnt-extract` - dump a BCFNT font and write out its glyph sheets.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::info;

use bcfnt::ErrorCategory;
use bcfnt::dump::write_report;
use bcfnt::formats::bcfnt::{BcfntReader, DecodeOptions};

const EXIT_USAGE: u8 = 1;
const EXIT_IO: u8 = 1;
const EXIT_FORMAT: u8 = 3;
const EXIT_TRUNCATED: u8 = 4;
const EXIT_RANGE: u8 = 5;

#[derive(Parser)]
#[command(version, about = "Dump a BCFNT font and extract its raw glyph sheets")]
struct Cli {
    /// Font file to decode
    path: PathBuf,

    /// Directory the glyph sheets are written to
    #[arg(short, long, default_value = "tmp")]
    output_dir: PathBuf,

    /// Bytes preceding the CFNT header (128 for shared font memory dumps)
    #[arg(long, default_value_t = 128)]
    preamble: u64,

    /// Address the font was mapped at, hex with 0x prefix or decimal
    #[arg(long, default_value = "0x18000000", value_parser = parse_address)]
    base_address: u32,

    /// Print the dump only, without writing sheets
    #[arg(long)]
    no_sheets: bool,

    /// Log decoding progress
    #[arg(short, long)]
    verbose: bool,
}

fn parse_address(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address \"{s}\": {e}"))
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not load '{}': {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("could not write '{}': {source}", .path.display())]
    Output { path: PathBuf, source: io::Error },
    #[error("{0}")]
    Decode(#[from] bcfnt::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Open { .. } | CliError::Output { .. } => EXIT_IO,
            CliError::Decode(e) => match e.category() {
                ErrorCategory::InvalidFormat | ErrorCategory::UnsupportedVersion => EXIT_FORMAT,
                ErrorCategory::TruncatedInput => EXIT_TRUNCATED,
                ErrorCategory::InvalidRange | ErrorCategory::AddressResolution => EXIT_RANGE,
                ErrorCategory::Io => EXIT_IO,
            },
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            return match e.print() {
                Ok(()) => ExitCode::from(code),
                Err(_) => ExitCode::from(EXIT_IO),
            };
        }
    };

    let filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let file = File::open(&cli.path).map_err(|source| CliError::Open {
        path: cli.path.clone(),
        source,
    })?;
    let options = DecodeOptions {
        preamble_len: cli.preamble,
        base_address: cli.base_address,
    };
    let mut reader = BcfntReader::new(BufReader::new(file), &options)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_report(&mut out, &reader.font)
        .and_then(|()| out.flush())
        .map_err(|source| CliError::Output {
            path: PathBuf::from("<stdout>"),
            source,
        })?;

    if !cli.no_sheets {
        write_sheets(&mut reader, &cli.output_dir)?;
    }
    Ok(())
}

fn write_sheets<R: io::Read + io::Seek>(
    reader: &mut BcfntReader<R>,
    dir: &Path,
) -> Result<(), CliError> {
    fs::create_dir_all(dir).map_err(|source| CliError::Output {
        path: dir.to_path_buf(),
        source,
    })?;

    for i in 0..reader.font.glyphs.num_sheets {
        let data = reader.read_sheet(i)?;
        let path = dir.join(format!("sheet-{i}.bin"));
        if let Err(source) = fs::write(&path, &data) {
            return Err(CliError::Output { path, source });
        }
        info!("wrote {} ({} bytes)", path.display(), data.len());
    }
    Ok(())
}
