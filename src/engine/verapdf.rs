//! veraPDF command-line backend

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use super::{operand, ValidationEngine};
use crate::core::config::{TaskType, ValidationRunConfig};
use crate::core::error::EngineError;

/// veraPDF exit codes that still mean "report produced":
/// 0 = all files compliant, 1 = at least one file non-compliant
const REPORT_EXIT_CODES: [i32; 2] = [0, 1];

/// Drives an installed `verapdf` executable
pub struct VeraPdfCli {
    program: PathBuf,
    version: OnceLock<String>,
}

impl VeraPdfCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            version: OnceLock::new(),
        }
    }

    /// Version reported by the executable, once initialized
    pub fn version(&self) -> Option<&str> {
        self.version.get().map(String::as_str)
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    fn run(&self, command: &mut Command) -> Result<Output, EngineError> {
        command.output().map_err(|source| EngineError::Spawn {
            program: self.program_name(),
            source,
        })
    }
}

/// Command-line flags for one run, in the order veraPDF expects them before
/// the file list
pub fn cli_args(config: &ValidationRunConfig) -> Vec<String> {
    let mut args = vec![
        "--format".to_string(),
        config.format.as_str().to_string(),
        "--flavour".to_string(),
        config.profile.code().to_string(),
        "--maxfailures".to_string(),
        config.max_failures.as_raw().to_string(),
        "--maxfailuresdisplayed".to_string(),
        config.max_failures_displayed.as_raw().to_string(),
    ];
    if config.include_passes {
        args.push("--success".to_string());
    }
    if config.has_task(TaskType::ExtractFeatures) {
        args.push("--extract".to_string());
    }
    args.push("--nonpdfext".to_string());
    args
}

impl ValidationEngine for VeraPdfCli {
    fn initialize(&self) -> Result<(), EngineError> {
        if self.version.get().is_some() {
            return Ok(());
        }

        let output = self.run(Command::new(&self.program).arg("--version"))?;
        if !output.status.success() {
            return Err(EngineError::Exit {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        log::info!("Initialized {} ({})", self.program_name(), version);
        let _ = self.version.set(version);
        Ok(())
    }

    fn run_batch(
        &self,
        files: &[PathBuf],
        config: &ValidationRunConfig,
        out: &mut dyn Write,
    ) -> Result<(), EngineError> {
        let args = cli_args(config);
        log::debug!("Running {} {} {:?}", self.program_name(), args.join(" "), files);

        let operands = files.iter().map(|f| operand(f).into_owned());
        let output = self.run(Command::new(&self.program).args(&args).args(operands))?;

        let accepted = output
            .status
            .code()
            .is_some_and(|code| REPORT_EXIT_CODES.contains(&code));
        if !accepted {
            return Err(EngineError::Exit {
                program: self.program_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(EngineError::Malformed(format!(
                "{} produced an empty report",
                self.program_name()
            )));
        }

        out.write_all(&output.stdout)?;
        Ok(())
    }
}
