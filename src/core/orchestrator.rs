//! Serialized validate -> policy pipeline around a single-instance engine

use std::fs;
use std::path::Path;
use std::time::Duration;

use rayon::prelude::*;

use super::config::ValidationRunConfig;
use super::error::{EngineError, Error};
use super::lock::{EngineLock, ReportLocks};
use super::request::{PolicyRequest, ValidationRequest};
use crate::engine::ValidationEngine;
use crate::policy::PolicyEngine;
use crate::reporting::{replace_report, write_report_with, ScratchDir};

/// Owns the validation and policy engines and sequences every call to them.
///
/// All orchestrators in a process share one engine lock, so at most one
/// validation run is in flight regardless of how many threads call
/// [`Orchestrator::validate`].
pub struct Orchestrator<V, P> {
    engine: V,
    policy: P,
    lock_timeout: Option<Duration>,
}

impl<V: ValidationEngine, P: PolicyEngine> Orchestrator<V, P> {
    pub fn new(engine: V, policy: P) -> Self {
        Self {
            engine,
            policy,
            lock_timeout: None,
        }
    }

    /// Give up waiting for the engine after `timeout` instead of blocking forever
    pub fn with_lock_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Validate one file, writing the MRR report to the request's output path.
    pub fn validate(&self, request: &ValidationRequest) -> Result<(), Error> {
        let input = request.input_path();
        if !input.is_file() {
            return Err(Error::InputNotFound(input.to_path_buf()));
        }

        log::debug!("Waiting for validation engine: {}", input.display());
        let _lease = EngineLock::global().acquire(self.lock_timeout)?;

        self.engine
            .initialize()
            .map_err(|e| Error::validation(input, e))?;

        let config = ValidationRunConfig::from_request(request);
        let batch = [input.to_path_buf()];
        log::info!(
            "Validating {} (profile {}) -> {}",
            input.display(),
            config.profile,
            request.output_path().display()
        );

        write_report_with(request.output_path(), |out| {
            self.engine.run_batch(&batch, &config, out)
        })
        .map_err(|e| Error::validation(input, e))
    }

    /// Validate many files from a thread pool; results keep request order.
    pub fn validate_batch(&self, requests: &[ValidationRequest]) -> Vec<Result<(), Error>> {
        requests.par_iter().map(|r| self.validate(r)).collect()
    }

    /// Evaluate a policy against an existing report and merge the result into
    /// it in place. The report is only replaced once evaluation and merge have
    /// both succeeded.
    pub fn apply_policy(&self, request: &PolicyRequest) -> Result<(), Error> {
        let policy = request.policy_path();
        if !policy.is_file() {
            return Err(Error::PolicyFileNotFound(policy.to_path_buf()));
        }
        let report = request.report_path();
        let key = report
            .canonicalize()
            .map_err(|_| Error::ReportNotFound(report.to_path_buf()))?;

        let _lease = ReportLocks::global().acquire(&key);
        if !key.is_file() {
            return Err(Error::ReportNotFound(report.to_path_buf()));
        }

        let scratch = ScratchDir::beside(report).map_err(|e| Error::evaluation(policy, e))?;
        let outcome = self.policy_pass(&scratch, policy, report);
        // Cleanup failures are logged, never returned
        if let Err(e) = scratch.close() {
            log::warn!("{:#}", anyhow::Error::new(e));
        }
        outcome
    }

    fn policy_pass(&self, scratch: &ScratchDir, policy: &Path, report: &Path) -> Result<(), Error> {
        let policy_result = scratch.new_file();
        let merged = scratch.new_file();

        log::info!(
            "Applying policy {} to {}",
            policy.display(),
            report.display()
        );
        write_report_with(&policy_result, |out| self.policy.evaluate(policy, report, out))
            .map_err(|e| Error::evaluation(policy, e))?;

        write_report_with(&merged, |out| self.policy.merge(&policy_result, report, out))
            .map_err(|e| Error::merge(report, e))?;

        // An empty merge result would wipe the report
        let size = fs::metadata(&merged)
            .map_err(|e| Error::merge(report, e))?
            .len();
        if size == 0 {
            return Err(Error::merge(
                report,
                EngineError::Malformed("merged report is empty".into()),
            ));
        }

        replace_report(&merged, report).map_err(|e| Error::merge(report, e))?;
        log::debug!("Replaced {} with policy-merged report", report.display());
        Ok(())
    }
}
