//! Validation and policy requests

use std::fmt;
use std::path::{Path, PathBuf};

/// Conformance profile selecting the PDF/A (or PDF/UA) rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// No explicit flavour: the engine detects the claimed conformance itself
    NoFlavour,
    PdfA1a,
    PdfA1b,
    PdfA2a,
    PdfA2b,
    PdfA2u,
    PdfA3a,
    PdfA3b,
    PdfA3u,
    PdfA4,
    PdfA4e,
    PdfA4f,
    PdfUa1,
    PdfUa2,
}

impl Profile {
    const KNOWN: [Profile; 13] = [
        Profile::PdfA1a,
        Profile::PdfA1b,
        Profile::PdfA2a,
        Profile::PdfA2b,
        Profile::PdfA2u,
        Profile::PdfA3a,
        Profile::PdfA3b,
        Profile::PdfA3u,
        Profile::PdfA4,
        Profile::PdfA4e,
        Profile::PdfA4f,
        Profile::PdfUa1,
        Profile::PdfUa2,
    ];

    /// Map a profile code such as `"1b"` to a profile.
    ///
    /// Unknown or empty codes fall back to [`Profile::NoFlavour`].
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        Self::KNOWN
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(code))
            .unwrap_or(Profile::NoFlavour)
    }

    /// Engine identifier for this profile (`"0"` for no flavour)
    pub fn code(self) -> &'static str {
        match self {
            Profile::NoFlavour => "0",
            Profile::PdfA1a => "1a",
            Profile::PdfA1b => "1b",
            Profile::PdfA2a => "2a",
            Profile::PdfA2b => "2b",
            Profile::PdfA2u => "2u",
            Profile::PdfA3a => "3a",
            Profile::PdfA3b => "3b",
            Profile::PdfA3u => "3u",
            Profile::PdfA4 => "4",
            Profile::PdfA4e => "4e",
            Profile::PdfA4f => "4f",
            Profile::PdfUa1 => "ua1",
            Profile::PdfUa2 => "ua2",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::NoFlavour => f.write_str("no flavour"),
            other => write!(f, "{}", other.code()),
        }
    }
}

/// Cap on recorded or displayed failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureLimit {
    Unbounded,
    AtMost(u32),
}

impl FailureLimit {
    /// Normalize a raw threshold: every value <= -1 means unbounded.
    pub fn from_raw(raw: i32) -> Self {
        u32::try_from(raw).map_or(FailureLimit::Unbounded, FailureLimit::AtMost)
    }

    /// Raw engine value, `-1` when unbounded
    pub fn as_raw(self) -> i64 {
        match self {
            FailureLimit::Unbounded => -1,
            FailureLimit::AtMost(n) => i64::from(n),
        }
    }
}

/// One batch-of-one validation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    input_path: PathBuf,
    output_path: PathBuf,
    max_failures: i32,
    max_failures_displayed: i32,
    profile_code: String,
}

impl ValidationRequest {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        max_failures: i32,
        max_failures_displayed: i32,
        profile_code: impl Into<String>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            max_failures,
            max_failures_displayed,
            profile_code: profile_code.into(),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn max_failures(&self) -> i32 {
        self.max_failures
    }

    pub fn max_failures_displayed(&self) -> i32 {
        self.max_failures_displayed
    }

    pub fn profile_code(&self) -> &str {
        &self.profile_code
    }
}

/// Policy pass over an existing report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyRequest {
    policy_path: PathBuf,
    report_path: PathBuf,
}

impl PolicyRequest {
    pub fn new(policy_path: impl Into<PathBuf>, report_path: impl Into<PathBuf>) -> Self {
        Self {
            policy_path: policy_path.into(),
            report_path: report_path.into(),
        }
    }

    pub fn policy_path(&self) -> &Path {
        &self.policy_path
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_codes_are_case_insensitive() {
        assert_eq!(Profile::from_code("1b"), Profile::PdfA1b);
        assert_eq!(Profile::from_code("1B"), Profile::PdfA1b);
        assert_eq!(Profile::from_code(" 3u "), Profile::PdfA3u);
        assert_eq!(Profile::from_code("UA1"), Profile::PdfUa1);
        assert_eq!(Profile::from_code("4"), Profile::PdfA4);
    }

    #[test]
    fn test_unknown_profile_falls_back_to_no_flavour() {
        assert_eq!(Profile::from_code(""), Profile::NoFlavour);
        assert_eq!(Profile::from_code("5z"), Profile::NoFlavour);
        assert_eq!(Profile::from_code("0"), Profile::NoFlavour);
        assert_eq!(Profile::NoFlavour.code(), "0");
    }

    #[test]
    fn test_negative_limits_normalize_to_unbounded() {
        assert_eq!(FailureLimit::from_raw(-1), FailureLimit::Unbounded);
        assert_eq!(FailureLimit::from_raw(-42), FailureLimit::Unbounded);
        assert_eq!(FailureLimit::from_raw(i32::MIN), FailureLimit::Unbounded);
        assert_eq!(FailureLimit::from_raw(-7).as_raw(), -1);
    }

    #[test]
    fn test_non_negative_limits_are_kept() {
        assert_eq!(FailureLimit::from_raw(0), FailureLimit::AtMost(0));
        assert_eq!(FailureLimit::from_raw(10), FailureLimit::AtMost(10));
        assert_eq!(FailureLimit::from_raw(5).as_raw(), 5);
    }
}
