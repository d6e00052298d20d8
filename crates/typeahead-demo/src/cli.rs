#![forbid(unsafe_code)]

//! Command-line argument parsing for the typeahead demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `TYPEAHEAD_DEMO_*` prefix; explicit flags win
//! over the environment.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Typeahead Demo: async and sync autocomplete fields

USAGE:
    typeahead-demo [OPTIONS]

OPTIONS:
    --delay-ms=N         Async lookup delay in milliseconds (default: 1000)
    --multiple           Allow several checked values per field
    --open-on-focus      Open the sync field's results when it gains focus
    --candidates=PATH    Newline-separated candidate list (default: currencies)
    --log-file=PATH      Write logs to PATH (filter with TYPEAHEAD_LOG)
    --no-mouse           Disable mouse event capture
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Tab / Shift-Tab      Switch field
    Up / Down            Move through results
    Enter                Check or uncheck the highlighted result
    Esc                  Close the results
    Ctrl+C / Ctrl+Q      Quit

ENVIRONMENT VARIABLES:
    TYPEAHEAD_DEMO_DELAY_MS     Override --delay-ms
    TYPEAHEAD_DEMO_MULTIPLE     Set to 1 for --multiple
    TYPEAHEAD_DEMO_CANDIDATES   Override --candidates
    TYPEAHEAD_DEMO_LOG_FILE     Override --log-file
    TYPEAHEAD_LOG               Log filter directives (default: info)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Delay of the simulated async backend.
    pub delay: Duration,
    /// Multi-select for both fields.
    pub multiple: bool,
    /// Sync field opens on focus.
    pub open_on_focus: bool,
    /// Candidate list file; the built-in list when absent.
    pub candidates: Option<PathBuf>,
    /// Log file; logging is off when absent.
    pub log_file: Option<PathBuf>,
    /// Whether mouse events are enabled.
    pub mouse: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1000),
            multiple: false,
            open_on_focus: false,
            candidates: None,
            log_file: None,
            mouse: true,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Invalid command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptsError {
    UnknownArgument(String),
    InvalidValue { flag: &'static str, value: String },
}

impl fmt::Display for OptsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
        }
    }
}

impl std::error::Error for OptsError {}

impl Opts {
    /// Parse the process environment and arguments.
    ///
    /// Prints help or version and exits when asked; prints the error and
    /// exits with status 1 on invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(|key| env::var(key).ok(), &args) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("typeahead-demo {VERSION}");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("{e}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from an environment lookup and an argument list.
    pub fn parse_from<E>(env: E, args: &[String]) -> Result<Command, OptsError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first; malformed values are ignored.
        if let Some(val) = env("TYPEAHEAD_DEMO_DELAY_MS")
            && let Ok(ms) = val.parse()
        {
            opts.delay = Duration::from_millis(ms);
        }
        if let Some(val) = env("TYPEAHEAD_DEMO_MULTIPLE") {
            opts.multiple = is_truthy(&val);
        }
        if let Some(val) = env("TYPEAHEAD_DEMO_CANDIDATES")
            && !val.is_empty()
        {
            opts.candidates = Some(PathBuf::from(val));
        }
        if let Some(val) = env("TYPEAHEAD_DEMO_LOG_FILE")
            && !val.is_empty()
        {
            opts.log_file = Some(PathBuf::from(val));
        }

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--multiple" => opts.multiple = true,
                "--open-on-focus" => opts.open_on_focus = true,
                "--no-mouse" => opts.mouse = false,
                other => {
                    if let Some(val) = other.strip_prefix("--delay-ms=") {
                        let ms = val.parse().map_err(|_| OptsError::InvalidValue {
                            flag: "--delay-ms",
                            value: val.to_string(),
                        })?;
                        opts.delay = Duration::from_millis(ms);
                    } else if let Some(val) = other.strip_prefix("--candidates=") {
                        opts.candidates = Some(non_empty_path("--candidates", val)?);
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(non_empty_path("--log-file", val)?);
                    } else {
                        return Err(OptsError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on")
}

fn non_empty_path(flag: &'static str, value: &str) -> Result<PathBuf, OptsError> {
    if value.is_empty() {
        return Err(OptsError::InvalidValue {
            flag,
            value: String::new(),
        });
    }
    Ok(PathBuf::from(value))
}
