//! Report file handling: streamed writes, scratch space and atomic replace

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

use crate::core::error::{EngineError, Error};

/// Name prefix of every policy-pass scratch directory
pub const SCRATCH_PREFIX: &str = ".pdfa-policy-";

/// Create (or truncate) `path` and hand a buffered writer to `write`.
///
/// The file is flushed and closed before this returns, whether `write`
/// succeeded or not.
pub fn write_report_with<F>(path: &Path, write: F) -> Result<(), EngineError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), EngineError>,
{
    let mut out = BufWriter::new(File::create(path)?);
    let result = write(&mut out);
    let flushed = out.flush();
    result?;
    flushed?;
    Ok(())
}

/// Swap `replacement` in for `report` with a single rename.
///
/// Both paths must be on one filesystem; the scratch directory lives beside
/// the report for that reason.
pub fn replace_report(replacement: &Path, report: &Path) -> io::Result<()> {
    fs::rename(replacement, report)
}

/// Directory where the report lives, `.` for bare file names
pub fn report_dir(report: &Path) -> &Path {
    match report.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Uniquely named scratch directory scoped to one policy pass.
///
/// Removed by [`ScratchDir::close`], or on drop if the pass unwinds.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn beside(report: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(report_dir(report))?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Fresh, randomly named XML file path inside the scratch directory
    pub fn new_file(&self) -> PathBuf {
        self.dir.path().join(format!("{}.xml", Uuid::new_v4()))
    }

    /// Remove the directory and everything in it.
    pub fn close(self) -> Result<(), Error> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|source| Error::CleanupFailed { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_scratch_leftovers(dir: &Path) -> bool {
        fs::read_dir(dir)
            .unwrap()
            .any(|e| e.unwrap().file_name().to_string_lossy().starts_with(SCRATCH_PREFIX))
    }

    #[test]
    fn test_write_report_with_creates_and_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xml");
        fs::write(&path, "a much longer previous report").unwrap();

        write_report_with(&path, |out| {
            out.write_all(b"<report/>")?;
            Ok(())
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<report/>");
    }

    #[test]
    fn test_write_report_with_flushes_partial_output_on_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xml");

        let err = write_report_with(&path, |out| {
            out.write_all(b"<report>")?;
            Err(EngineError::Malformed("engine crashed".into()))
        })
        .unwrap_err();

        assert!(matches!(err, EngineError::Malformed(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<report>");
    }

    #[test]
    fn test_write_report_with_missing_parent_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.xml");
        let err = write_report_with(&path, |_| Ok(())).unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }

    #[test]
    fn test_scratch_dir_is_beside_report_and_removed_on_close() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("out.xml");

        let scratch = ScratchDir::beside(&report).unwrap();
        assert_eq!(scratch.path().parent().unwrap(), dir.path());
        let first = scratch.new_file();
        let second = scratch.new_file();
        assert_ne!(first, second);
        fs::write(&first, "x").unwrap();
        assert!(has_scratch_leftovers(dir.path()));

        scratch.close().unwrap();
        assert!(!has_scratch_leftovers(dir.path()));
    }

    #[test]
    fn test_close_reports_scratch_removed_behind_its_back() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::beside(&dir.path().join("out.xml")).unwrap();
        let path = scratch.path().to_path_buf();
        fs::remove_dir_all(&path).unwrap();

        match scratch.close() {
            Err(Error::CleanupFailed { path: failed, source }) => {
                assert_eq!(failed, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_replace_report_swaps_contents() {
        let dir = TempDir::new().unwrap();
        let report = dir.path().join("out.xml");
        let merged = dir.path().join("merged.xml");
        fs::write(&report, "old").unwrap();
        fs::write(&merged, "new").unwrap();

        replace_report(&merged, &report).unwrap();

        assert_eq!(fs::read_to_string(&report).unwrap(), "new");
        assert!(!merged.exists());
    }

    #[test]
    fn test_report_dir_for_bare_file_name() {
        assert_eq!(report_dir(Path::new("out.xml")), Path::new("."));
        assert_eq!(report_dir(Path::new("/tmp/out.xml")), Path::new("/tmp"));
    }
}
