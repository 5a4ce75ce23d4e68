use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, anyhow};
use ged_core::{ConversionStats, convert};
use tracing::{debug, info_span};

use crate::cli::Cli;

/// A failed run, classified by the stage that failed.
#[derive(Debug)]
pub enum RunError {
    /// The input could not be opened.
    Input(anyhow::Error),
    /// The output could not be created.
    Output(anyhow::Error),
    /// The converter reported a fatal error.
    Conversion(anyhow::Error),
}

impl RunError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Conversion(_) => 1,
            Self::Input(_) => 2,
            Self::Output(_) => 3,
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Self::Input(error) | Self::Output(error) | Self::Conversion(error)) = self;
        write!(f, "{error:#}")
    }
}

impl std::error::Error for RunError {}

/// Convert the input selected by `cli` into its output.
pub fn run(cli: &Cli) -> Result<ConversionStats, RunError> {
    let input_path = cli.input();
    let output_path = cli.output();
    let span = info_span!(
        "run",
        from = %display_stream(input_path, "<stdin>"),
        to = %display_stream(output_path, "<stdout>")
    );
    let _guard = span.enter();

    let input = open_input(input_path).map_err(RunError::Input)?;
    if let (Some(from), Some(to)) = (input_path, output_path)
        && same_file(from, to)
    {
        return Err(RunError::Output(anyhow!(
            "{} is also the input file",
            to.display()
        )));
    }
    let output = open_output(output_path, cli.overwrite).map_err(RunError::Output)?;

    let options = cli.convert_options();
    debug!(?options, "converting");
    convert(input, output, &options)
        .with_context(|| format!("cannot convert {}", display_stream(input_path, "<stdin>")))
        .map_err(RunError::Conversion)
}

fn open_input(path: Option<&Path>) -> anyhow::Result<Box<dyn Read>> {
    let Some(path) = path else {
        return Ok(Box::new(io::stdin().lock()));
    };
    let file = File::open(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(Box::new(file))
}

/// Open the output, refusing to replace an existing file unless asked to.
fn open_output(path: Option<&Path>, overwrite: bool) -> anyhow::Result<Box<dyn Write>> {
    let Some(path) = path else {
        return Ok(Box::new(io::stdout().lock()));
    };
    let mut open = OpenOptions::new();
    open.write(true);
    if overwrite {
        open.create(true).truncate(true);
    } else {
        open.create_new(true);
    }
    match open.open(path) {
        Ok(file) => Ok(Box::new(file)),
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists => Err(anyhow!(
            "{} already exists (use --overwrite to replace it)",
            path.display()
        )),
        Err(error) => Err(error).with_context(|| format!("cannot create {}", path.display())),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn display_stream(path: Option<&Path>, fallback: &str) -> String {
    path.map_or_else(|| fallback.to_string(), |path| path.display().to_string())
}
