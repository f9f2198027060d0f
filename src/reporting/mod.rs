//! Report file handling

pub mod report_file;

pub use report_file::{replace_report, write_report_with, ScratchDir};
