//! Mini-Pager CLI
//!
//! Paginates a plain text file with a JSON job configuration and prints the
//! rendered pages as JSON. The main interface is through WASM bindings.

use mini_pager::{Device, FixedMetricsDevice, JobConfig, LayoutError, PrintJob, RenderedJob};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use thiserror::Error;

const USAGE: &str = "usage: mini-pager [-v] [--char-width PT] [--line-height PT] <config.json> <text-file>";

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("cannot encode output: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Debug)]
struct Args {
    config: PathBuf,
    text: PathBuf,
    char_width: f32,
    line_height: f32,
    verbose: bool,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, CliError> {
        let mut positional = Vec::new();
        let mut char_width = 6.0;
        let mut line_height = 12.0;
        let mut verbose = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-v" | "--verbose" => verbose = true,
                "--char-width" => char_width = points_arg(&arg, args.next())?,
                "--line-height" => line_height = points_arg(&arg, args.next())?,
                flag if flag.starts_with('-') => {
                    return Err(CliError::Usage(format!("unknown option {flag}")))
                }
                _ => positional.push(PathBuf::from(&arg)),
            }
        }

        let [config, text]: [PathBuf; 2] = positional
            .try_into()
            .map_err(|_| CliError::Usage("expected a config file and a text file".into()))?;

        Ok(Self {
            config,
            text,
            char_width,
            line_height,
            verbose,
        })
    }
}

fn points_arg(flag: &str, value: Option<String>) -> Result<f32, CliError> {
    value
        .as_deref()
        .and_then(|v| v.parse::<f32>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or_else(|| CliError::Usage(format!("{flag} needs a positive number")))
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn run(args: &Args) -> Result<String, CliError> {
    let config = JobConfig::from_json(&read(&args.config)?)?;
    let text = read(&args.text)?;

    let device: Rc<dyn Device> = Rc::new(FixedMetricsDevice::monospace(
        args.char_width,
        args.line_height,
        72,
    ));
    let job = PrintJob::from_config(&config, &text)?;
    let pages = job.paginate(&device)?;

    Ok(serde_json::to_string_pretty(&RenderedJob::new(job.name(), &pages))?)
}

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match run(&args) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(target: "mini_pager::cli", "{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, CliError> {
        Args::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_positional() {
        let args = parse(&["job.json", "body.txt"]).unwrap();
        assert_eq!(args.config, PathBuf::from("job.json"));
        assert_eq!(args.text, PathBuf::from("body.txt"));
        assert_eq!(args.char_width, 6.0);
        assert!(!args.verbose);
    }

    #[test]
    fn test_parse_options() {
        let args = parse(&["-v", "--char-width", "7.5", "a.json", "--line-height", "14", "b.txt"])
            .unwrap();
        assert!(args.verbose);
        assert_eq!(args.char_width, 7.5);
        assert_eq!(args.line_height, 14.0);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(&["only.json"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["a", "b", "c"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["--char-width", "0", "a", "b"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["--line-height"]), Err(CliError::Usage(_))));
        assert!(matches!(parse(&["--color", "a", "b"]), Err(CliError::Usage(_))));
    }
}
