//! revmark — sticky review annotations embedded in a review's text field.
//!
//! Entry point for the `revmark` binary, a file-backed reference host: the
//! "review field" is a local file, the "page" is stdout. Useful for
//! inspecting and exporting the annotation layer of a saved review
//! description, and as the working example of how a real host wires the
//! pieces together.
//!
//! # Startup sequence
//!
//! 1. Initialise tracing from `RUST_LOG` — before anything can warn.
//! 2. Load config (soft-failing, see `config.rs`).
//! 3. Build the gateway (`FileField`) and host (`ConsoleHost`).
//! 4. Auto-load per `open_frequency`; an explicit `export` command loads
//!    regardless — the command itself is the manual open action.

use std::process::ExitCode;

use revmark::config::{Config, Frequency};
use revmark::field::FileField;
use revmark::host::ConsoleHost;
use revmark::sync::{HostAction, SyncController, SyncError};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: revmark <field-file> [export]");
        return ExitCode::FAILURE;
    };
    let command = args.next();

    match run(&path, command.as_deref()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("revmark: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(path: &str, command: Option<&str>) -> Result<(), SyncError> {
    let config = Config::load();
    let auto_open = config.open_frequency == Frequency::Auto;
    let mut controller = SyncController::new(ConsoleHost::new(), FileField::new(path), config);

    // `export` is an explicit ask for the field's content, so it loads even
    // under open_frequency = manual.
    if auto_open || command == Some("export") {
        controller.handle(HostAction::Load).await?;
    }

    match command {
        Some("export") => {
            let payload = controller.presentation().export();
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Some(other) => {
            eprintln!("revmark: unknown command {other:?} (expected: export)");
        }
        None => {
            if controller.presentation().is_empty() {
                println!("no annotations");
            } else {
                print!("{}", controller.host().render());
            }
        }
    }
    Ok(())
}
