//! Policy checking capability

pub mod command;
pub mod merge;

use std::io::Write;
use std::path::Path;

use crate::core::error::EngineError;

pub use command::CommandPolicyEngine;
pub use merge::insert_policy_report;

/// Evaluates a policy against a validation report and merges the outcome
/// back into it. Calls on distinct file pairs may run concurrently.
pub trait PolicyEngine: Send + Sync {
    /// Write the policy result document for `report` to `out`.
    fn evaluate(&self, policy: &Path, report: &Path, out: &mut dyn Write)
        -> Result<(), EngineError>;

    /// Write `report` with the policy result merged in to `out`.
    fn merge(&self, policy_result: &Path, report: &Path, out: &mut dyn Write)
        -> Result<(), EngineError>;
}
