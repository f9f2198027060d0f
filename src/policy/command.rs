//! Policy checking through an external command

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::merge::insert_policy_report;
use super::PolicyEngine;
use crate::core::error::EngineError;
use crate::engine::operand;

/// Runs `<checker> <policy> <report>` and reads the policy result from its
/// stdout. With the default `xsltproc` checker the policy file is a compiled
/// policy stylesheet.
pub struct CommandPolicyEngine {
    checker: PathBuf,
}

impl CommandPolicyEngine {
    pub fn new(checker: impl Into<PathBuf>) -> Self {
        Self {
            checker: checker.into(),
        }
    }

    fn checker_name(&self) -> String {
        self.checker.display().to_string()
    }
}

impl PolicyEngine for CommandPolicyEngine {
    fn evaluate(
        &self,
        policy: &Path,
        report: &Path,
        out: &mut dyn Write,
    ) -> Result<(), EngineError> {
        log::debug!(
            "Evaluating policy {} against {}",
            policy.display(),
            report.display()
        );
        let output = Command::new(&self.checker)
            .arg(operand(policy).as_ref())
            .arg(operand(report).as_ref())
            .output()
            .map_err(|source| EngineError::Spawn {
                program: self.checker_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::Exit {
                program: self.checker_name(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.iter().all(u8::is_ascii_whitespace) {
            return Err(EngineError::Malformed(format!(
                "{} produced no policy result",
                self.checker_name()
            )));
        }

        out.write_all(&output.stdout)?;
        Ok(())
    }

    fn merge(
        &self,
        policy_result: &Path,
        report: &Path,
        out: &mut dyn Write,
    ) -> Result<(), EngineError> {
        let policy_result = fs::read_to_string(policy_result)?;
        let report = fs::read_to_string(report)?;
        let merged = insert_policy_report(&policy_result, &report)?;
        out.write_all(merged.as_bytes())?;
        Ok(())
    }
}
