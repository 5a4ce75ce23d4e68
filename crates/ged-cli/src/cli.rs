//! CLI argument definitions for the GEDCOM converter.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use ged_core::ConvertOptions;

#[derive(Parser)]
#[command(
    name = "ged5to7",
    version,
    about = "Convert GEDCOM 5.5.1 files to GEDCOM 7.0",
    long_about = "Convert a GEDCOM 5.5.1 file to GEDCOM 7.0.\n\n\
                  Reads ANSEL, ASCII, UTF-8, UTF-16 and the common 8-bit \
                  encodings and always writes UTF-8.\n\
                  Without FROM/TO the converter reads stdin and writes stdout."
)]
pub struct Cli {
    /// Input file (`-` for stdin).
    #[arg(value_name = "FROM", conflicts_with = "from")]
    pub from_arg: Option<PathBuf>,

    /// Output file (`-` for stdout).
    #[arg(value_name = "TO", conflicts_with = "to")]
    pub to_arg: Option<PathBuf>,

    /// Input file (`-` for stdin).
    #[arg(short = 'f', long = "from", value_name = "FILE")]
    pub from: Option<PathBuf>,

    /// Output file (`-` for stdout).
    #[arg(short = 't', long = "to", value_name = "FILE")]
    pub to: Option<PathBuf>,

    /// Replace the output file if it already exists.
    #[arg(short = 'o', long = "overwrite")]
    pub overwrite: bool,

    /// Treat cross-reference identifiers case-insensitively (emit upper case).
    #[arg(short = 'x', long = "xref-icase")]
    pub xref_icase: bool,

    /// Drop enumeration text that has no 7.0 code instead of keeping a PHRASE.
    #[arg(short = 'p', long = "few-phrases")]
    pub few_phrases: bool,

    /// Maximum output line length before values are split with CONC.
    #[arg(
        long = "max-line-length",
        value_name = "N",
        conflicts_with = "no_line_limit"
    )]
    pub max_line_length: Option<usize>,

    /// Never split long values.
    #[arg(long = "no-line-limit")]
    pub no_line_limit: bool,

    /// Write a UTF-8 byte-order mark.
    #[arg(long = "bom")]
    pub bom: bool,

    /// Print conversion statistics to stderr.
    #[arg(long = "summary")]
    pub summary: bool,

    /// Format of the `--summary` output.
    #[arg(long = "summary-format", value_enum, default_value = "table")]
    pub summary_format: SummaryFormatArg,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Input path, or `None` for stdin.
    pub fn input(&self) -> Option<&Path> {
        stream_path(self.from.as_deref().or(self.from_arg.as_deref()))
    }

    /// Output path, or `None` for stdout.
    pub fn output(&self) -> Option<&Path> {
        stream_path(self.to.as_deref().or(self.to_arg.as_deref()))
    }

    /// Conversion options selected by the flags.
    pub fn convert_options(&self) -> ConvertOptions {
        let options = ConvertOptions::new()
            .with_xref_case_insensitive(self.xref_icase)
            .with_omit_phrases(self.few_phrases)
            .with_byte_order_mark(self.bom);
        match (self.no_line_limit, self.max_line_length) {
            (true, _) => options.without_line_limit(),
            (false, Some(limit)) => options.with_line_limit(limit),
            (false, None) => options,
        }
    }
}

fn stream_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|path| *path != Path::new("-"))
}

/// CLI summary format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum SummaryFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
