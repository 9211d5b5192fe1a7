use std::process::ExitCode;

use env_logger::Env;
use log::LevelFilter;
use twilio_admin::cli::{self, console::StdConsole};
use twilio_admin::config::Settings;

/// Crate debug records pass the filter but stay behind `log::max_level` until
/// debug logging is switched on from Developer Tools.
const DEFAULT_LOG_FILTER: &str = "warn,twilio_admin=debug";

/// Conventional exit status for SIGINT.
const INTERRUPTED: i32 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter_from_env = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();
    if !filter_from_env {
        log::set_max_level(LevelFilter::Warn);
    }

    let mut gateway = match Settings::from_env().and_then(|settings| settings.gateway()) {
        Ok(gateway) => gateway,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut console = StdConsole::new();

    tokio::select! {
        result = cli::run(&mut gateway, &mut console) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
        _ = tokio::signal::ctrl_c() => {
            println!("\nInterrupted, exiting.");
            // Runtime shutdown would block on the pending stdin read.
            std::process::exit(INTERRUPTED)
        }
    }
}
