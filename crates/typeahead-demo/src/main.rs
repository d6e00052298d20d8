#![forbid(unsafe_code)]

//! Typeahead demo binary entry point.

use typeahead_demo::app::{AppConfig, DemoApp};
use typeahead_demo::{cli, logging, options};
use typeahead_runtime::{Program, ProgramConfig};

fn main() {
    let opts = cli::Opts::parse();

    if let Err(e) = logging::init(opts.log_file.as_deref()) {
        eprintln!("Failed to open log file: {e}");
        std::process::exit(1);
    }

    let candidates = match options::load(opts.candidates.as_deref()) {
        Ok(list) => list,
        Err(e) => {
            eprintln!("Failed to load candidates: {e}");
            std::process::exit(1);
        }
    };

    let model = DemoApp::new(AppConfig::from_opts(&opts, candidates));
    let config = ProgramConfig::fullscreen().with_mouse(opts.mouse);
    match Program::with_config(model, config) {
        Ok(mut program) => {
            if let Err(e) = program.run() {
                tracing::error!(error = %e, "runtime error");
                eprintln!("Runtime error: {e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Failed to initialize: {e}");
            std::process::exit(1);
        }
    }
}
