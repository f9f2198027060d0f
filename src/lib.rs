//! PDF/A Validator Library
//!
//! Serialized access to a single-instance veraPDF engine, with an optional
//! policy pass merged into the validation report.

pub mod core;
pub mod dispatch;
pub mod engine;
pub mod policy;
pub mod reporting;
pub mod settings;

pub use crate::core::{Error, Orchestrator};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::core::config::ValidationRunConfig;
    pub use crate::core::error::{EngineError, Error};
    pub use crate::core::orchestrator::Orchestrator;
    pub use crate::core::request::{FailureLimit, PolicyRequest, Profile, ValidationRequest};
    pub use crate::dispatch::{dispatch, exit_code, Invocation, EXIT_FAILURE};
    pub use crate::engine::{ValidationEngine, VeraPdfCli};
    pub use crate::policy::{CommandPolicyEngine, PolicyEngine};
    pub use crate::settings::Settings;
}
