//! Requests, per-run configuration, locking and the orchestrator

pub mod config;
pub mod error;
pub mod lock;
pub mod orchestrator;
pub mod request;

pub use config::ValidationRunConfig;
pub use error::{EngineError, Error};
pub use orchestrator::Orchestrator;
pub use request::{FailureLimit, PolicyRequest, Profile, ValidationRequest};
