use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use modgrep::{KeywordSet, NativeDecoder, ReportFormat, ScanConfig, ScanError, Scanner};

#[derive(Parser, Debug)]
#[command(name = "modgrep", version)]
#[command(about = "Search tracker module metadata (message, sample and instrument names) for keywords")]
struct Args {
    /// Emit one JSON object per match instead of text lines
    #[arg(long)]
    json: bool,

    /// Do not unpack LHA-archived modules before decoding
    #[arg(long)]
    no_unpack: bool,

    /// Reject files larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    max_size: Option<u64>,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Module file to scan, then the keywords to look for (matched
    /// case-insensitively). Options are only recognised before FILEPATH.
    #[arg(
        value_name = "FILEPATH KEYWORD",
        required = true,
        num_args = 2..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    operands: Vec<OsString>,
}

impl Args {
    /// Split the operands into the file path and the keywords.
    fn split_operands(&self) -> Option<(PathBuf, Vec<String>)> {
        let (file, keywords) = self.operands.split_first()?;
        Some((
            PathBuf::from(file),
            keywords.iter().map(|k| keyword_text(k)).collect(),
        ))
    }

    fn scan_config(&self) -> ScanConfig {
        let format = if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        };
        let config = ScanConfig::default().with_format(format);
        match self.max_size {
            Some(bytes) => config.with_max_file_size(bytes),
            None => config,
        }
    }
}

/// Keyword text from a raw argument. Arguments that are not UTF-8 are read
/// byte for byte as Latin-1, the way module names are decoded.
fn keyword_text(arg: &OsStr) -> String {
    match arg.to_str() {
        Some(text) => text.to_string(),
        None => latin1_text(arg),
    }
}

#[cfg(unix)]
fn latin1_text(arg: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;
    arg.as_bytes().iter().map(|&b| b as char).collect()
}

#[cfg(not(unix))]
fn latin1_text(arg: &OsStr) -> String {
    arg.to_string_lossy().into_owned()
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn usage_error() -> ScanError {
    let program = std::env::args_os()
        .next()
        .map(|arg0| arg0.to_string_lossy().into_owned())
        .unwrap_or_else(|| "modgrep".to_string());
    ScanError::Usage { program }
}

fn fail(err: ScanError) -> ExitCode {
    eprintln!("{}", err);
    ExitCode::from(err.exit_code())
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => return fail(usage_error()),
    };

    init_logging(args.verbose);

    let Some((file, keywords)) = args.split_operands() else {
        return fail(usage_error());
    };
    let keywords = match KeywordSet::new(keywords) {
        Ok(keywords) => keywords,
        Err(e) => {
            log::debug!("{}", e);
            return fail(usage_error());
        }
    };

    let decoder = NativeDecoder::new().with_unpack_archives(!args.no_unpack);
    let scanner = Scanner::new(decoder, args.scan_config());

    match scanner.scan_file(&file, &keywords, io::stdout().lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}
