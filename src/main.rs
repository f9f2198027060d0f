use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use pdfa_validator_rs::prelude::*;

#[derive(Parser)]
#[command(name = "pdfa_validator_rs", version)]
#[command(
    about = "Validate one PDF with veraPDF, one run at a time, and optionally merge a policy check into the report",
    long_about = None
)]
struct Cli {
    /// INPUT REPORT MAX_FAILURES MAX_FAILURES_DISPLAYED PROFILE [POLICY]
    #[arg(value_name = "ARGS", allow_hyphen_values = true)]
    args: Vec<OsString>,

    /// JSON settings file
    #[arg(long, env = "PDFA_VALIDATOR_CONFIG")]
    config: Option<PathBuf>,

    /// veraPDF executable
    #[arg(long, env = "VERAPDF_BIN")]
    verapdf: Option<PathBuf>,

    /// Policy checker executable, invoked as `<checker> <policy> <report>`
    #[arg(long, env = "PDFA_POLICY_CHECKER")]
    policy_checker: Option<PathBuf>,

    /// Seconds to wait for the validation engine before giving up
    #[arg(long, env = "PDFA_LOCK_TIMEOUT_SECS")]
    lock_timeout_secs: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                e.exit();
            }
            let _ = e.print();
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = run(&cli);
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }
    ExitCode::from(exit_code(&result))
}

fn run(cli: &Cli) -> Result<()> {
    // Arity and integer checks come before any file access
    let invocation = Invocation::from_positionals(&cli.args)?;

    let settings = resolve_settings(cli)?;
    log::debug!("Settings: {:?}", settings);

    let orchestrator = Orchestrator::new(
        VeraPdfCli::new(&settings.verapdf),
        CommandPolicyEngine::new(&settings.policy_checker),
    )
    .with_lock_timeout(settings.lock_timeout());

    dispatch(&orchestrator, &invocation)?;
    Ok(())
}

/// Settings file first, then flags and environment variables on top
fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let mut settings =
        Settings::load_or_default(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(verapdf) = &cli.verapdf {
        settings.verapdf = verapdf.clone();
    }
    if let Some(checker) = &cli.policy_checker {
        settings.policy_checker = checker.clone();
    }
    if cli.lock_timeout_secs.is_some() {
        settings.lock_timeout_secs = cli.lock_timeout_secs;
    }
    Ok(settings)
}
