//! Fixed positional command contract

use std::ffi::OsStr;

use crate::core::error::Error;
use crate::core::orchestrator::Orchestrator;
use crate::core::request::{PolicyRequest, ValidationRequest};
use crate::engine::ValidationEngine;
use crate::policy::PolicyEngine;

/// A parsed invocation: validation, then an optional policy pass on its report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub validation: ValidationRequest,
    pub policy: Option<PolicyRequest>,
}

impl Invocation {
    /// Parse `input report max-failures max-displayed profile [policy]`.
    ///
    /// Paths are taken as-is, so they need not be valid UTF-8.
    pub fn from_positionals<S: AsRef<OsStr>>(args: &[S]) -> Result<Self, Error> {
        if !(5..=6).contains(&args.len()) {
            return Err(Error::BadArguments(format!(
                "expected 5 or 6 arguments, got {}",
                args.len()
            )));
        }
        let arg = |i: usize| args[i].as_ref();

        let validation = ValidationRequest::new(
            arg(0),
            arg(1),
            parse_int("max failures", arg(2))?,
            parse_int("max failures displayed", arg(3))?,
            arg(4).to_string_lossy(),
        );
        let policy = (args.len() == 6).then(|| PolicyRequest::new(arg(5), arg(1)));

        Ok(Self { validation, policy })
    }
}

fn parse_int(name: &str, value: &OsStr) -> Result<i32, Error> {
    value
        .to_str()
        .ok_or_else(|| Error::BadArguments(format!("{name} must be an integer, got {value:?}")))?
        .parse()
        .map_err(|e| Error::BadArguments(format!("{name} must be an integer, got {value:?}: {e}")))
}

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Process exit status for an invocation outcome: 0 on success, 1 on any error.
pub fn exit_code<E>(result: &Result<(), E>) -> u8 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}

/// Run the invocation: validate, then apply the policy if one was given.
pub fn dispatch<V, P>(orchestrator: &Orchestrator<V, P>, invocation: &Invocation) -> Result<(), Error>
where
    V: ValidationEngine,
    P: PolicyEngine,
{
    orchestrator.validate(&invocation.validation)?;
    if let Some(policy) = &invocation.policy {
        orchestrator.apply_policy(policy)?;
    }
    Ok(())
}
