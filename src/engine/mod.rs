//! Validation engine capability

pub mod verapdf;

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::config::ValidationRunConfig;
use crate::core::error::EngineError;

pub use verapdf::VeraPdfCli;

/// A PDF/A validation engine.
///
/// Implementations are not expected to be reentrant: the orchestrator holds
/// the process-wide engine lock around every call.
pub trait ValidationEngine: Send + Sync {
    /// One-time setup. Must be cheap to call again once it has succeeded.
    fn initialize(&self) -> Result<(), EngineError>;

    /// Validate `files` and write the XML report to `out`.
    fn run_batch(
        &self,
        files: &[PathBuf],
        config: &ValidationRunConfig,
        out: &mut dyn Write,
    ) -> Result<(), EngineError>;
}

/// Path as a subprocess operand; relative paths starting with `-` get a `./`
/// prefix so the child does not read them as options.
pub(crate) fn operand(path: &Path) -> Cow<'_, Path> {
    if path.as_os_str().to_string_lossy().starts_with('-') {
        Cow::Owned(Path::new(".").join(path))
    } else {
        Cow::Borrowed(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_guards_leading_dash() {
        assert_eq!(operand(Path::new("-draft.pdf")), Path::new("./-draft.pdf"));
        assert_eq!(operand(Path::new("in.pdf")), Path::new("in.pdf"));
        assert_eq!(operand(Path::new("/tmp/-x.pdf")), Path::new("/tmp/-x.pdf"));
    }
}
