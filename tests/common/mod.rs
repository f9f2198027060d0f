//! Shared helpers for integration tests.

use pdfa_validator_rs::reporting::report_file::SCRATCH_PREFIX;
use std::fs;
use std::io;
use std::path::Path;

/// True if `dir` holds any policy-pass scratch directory
pub fn has_scratch_leftovers(dir: &Path) -> io::Result<bool> {
    for entry in fs::read_dir(dir)? {
        if entry?.file_name().to_string_lossy().starts_with(SCRATCH_PREFIX) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Remove every policy-pass scratch directory in `dir`
#[allow(dead_code)]
pub fn remove_scratch_dirs(dir: &Path) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with(SCRATCH_PREFIX) {
            fs::remove_dir_all(entry.path())?;
        }
    }
    Ok(())
}
