//! Error taxonomy for the validation pipeline

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by an external collaborator (validation or policy engine)
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("I/O error")]
    Io(#[from] io::Error),

    #[error("failed to launch {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("malformed output: {0}")]
    Malformed(String),
}

/// Errors surfaced by the orchestrator and dispatcher
#[derive(Debug, Error)]
pub enum Error {
    #[error("bad arguments: {0}")]
    BadArguments(String),

    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("validation of {} failed", .input.display())]
    ValidationFailed {
        input: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("timed out after {0:?} waiting for the validation engine")]
    LockTimeout(Duration),

    #[error("policy file not found: {}", .0.display())]
    PolicyFileNotFound(PathBuf),

    #[error("report not found: {}", .0.display())]
    ReportNotFound(PathBuf),

    #[error("policy evaluation with {} failed", .policy.display())]
    PolicyEvaluationFailed {
        policy: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("merging policy results into {} failed", .report.display())]
    MergeFailed {
        report: PathBuf,
        #[source]
        source: EngineError,
    },

    /// Never returned to callers; logged when scratch removal fails.
    #[error("failed to remove scratch directory {}", .path.display())]
    CleanupFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn validation(input: impl Into<PathBuf>, source: impl Into<EngineError>) -> Self {
        Error::ValidationFailed {
            input: input.into(),
            source: source.into(),
        }
    }

    pub(crate) fn evaluation(policy: impl Into<PathBuf>, source: impl Into<EngineError>) -> Self {
        Error::PolicyEvaluationFailed {
            policy: policy.into(),
            source: source.into(),
        }
    }

    pub(crate) fn merge(report: impl Into<PathBuf>, source: impl Into<EngineError>) -> Self {
        Error::MergeFailed {
            report: report.into(),
            source: source.into(),
        }
    }
}
