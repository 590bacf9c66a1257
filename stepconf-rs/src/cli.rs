//! Command-line argument parsing.
//!
//! Usage:
//!   stepconf --input <file> [--output <file>] [-v…] [-q]
//!
//! The input path may also be given through `STEPCONF_INPUT`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::LevelFilter;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "stepconf",
    version,
    about = "Convert an OpenStep-style configuration file to TOML-style text"
)]
pub struct CliArgs {
    /// Path of the configuration file to convert.
    #[arg(short, long, env = "STEPCONF_INPUT", value_name = "FILE")]
    pub input: PathBuf,

    /// Write the result to this file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (`-v` info, `-vv` debug, `-vvv` trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Log errors only.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CliArgs {
    /// Default log level implied by `-v`/`-q`.  `RUST_LOG` still wins.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args_os()`.
pub fn parse_args() -> Result<CliArgs, clap::Error> {
    CliArgs::try_parse()
}

/// Parse an explicit argument vector (exposed for testing).  The first
/// element is the program name.
pub fn parse_argv<I, T>(argv: I) -> Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(argv)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("stepconf")
            .chain(args.iter().copied())
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn input_long() {
        let a = parse_argv(argv(&["--input", "app.conf"])).unwrap();
        assert_eq!(a.input, PathBuf::from("app.conf"));
        assert_eq!(a.output, None);
        assert_eq!(a.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn input_short_and_output() {
        let a = parse_argv(argv(&["-i", "in.conf", "-o", "out.toml"])).unwrap();
        assert_eq!(a.input, PathBuf::from("in.conf"));
        assert_eq!(a.output, Some(PathBuf::from("out.toml")));
    }

    #[test]
    fn verbosity() {
        let a = parse_argv(argv(&["-i", "x", "-vv"])).unwrap();
        assert_eq!(a.verbose, 2);
        assert_eq!(a.log_level(), LevelFilter::Debug);
        let a = parse_argv(argv(&["-i", "x", "-vvvv"])).unwrap();
        assert_eq!(a.log_level(), LevelFilter::Trace);
        let a = parse_argv(argv(&["-i", "x", "-q"])).unwrap();
        assert_eq!(a.log_level(), LevelFilter::Error);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(parse_argv(argv(&["-i", "x", "-q", "-v"])).is_err());
    }

    #[test]
    fn unknown_flag() {
        assert!(parse_argv(argv(&["-i", "x", "-z"])).is_err());
    }

    #[test]
    fn stray_positional() {
        assert!(parse_argv(argv(&["-i", "x", "extra"])).is_err());
    }
}
