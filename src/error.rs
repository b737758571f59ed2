//! Error types.
//!
//! Input problems are reported before a simulation starts. Policy invariant
//! violations and runaway loops abort a run; the simulation is
//! deterministic, so none of these are transient.

use std::fmt;

use crate::types::{Pid, Tick};

/// Malformed input or policy selection.
#[derive(Debug)]
pub enum InputError {
    /// Reading a task file failed.
    Io(std::io::Error),
    /// CSV parse error (bad header, non-integer field, ...).
    Csv(csv::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// A field parsed but its value is unusable.
    InvalidValue(String),
    /// Two tasks share a process id.
    DuplicateProcess(Pid),
    /// The selected policy needs a parameter that was not given.
    MissingPolicyParameter {
        policy: &'static str,
        parameter: &'static str,
    },
    /// A policy parameter is out of range.
    InvalidPolicyParameter(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Io(e) => write!(f, "I/O error: {e}"),
            InputError::Csv(e) => write!(f, "CSV parse error: {e}"),
            InputError::Json(e) => write!(f, "JSON parse error: {e}"),
            InputError::InvalidValue(msg) => write!(f, "invalid value: {msg}"),
            InputError::DuplicateProcess(pid) => write!(f, "duplicate process id: {pid}"),
            InputError::MissingPolicyParameter { policy, parameter } => {
                write!(f, "policy {policy} requires parameter {parameter}")
            }
            InputError::InvalidPolicyParameter(msg) => {
                write!(f, "invalid policy parameter: {msg}")
            }
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::Io(e) => Some(e),
            InputError::Csv(e) => Some(e),
            InputError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for InputError {
    fn from(e: std::io::Error) -> Self {
        InputError::Io(e)
    }
}

impl From<csv::Error> for InputError {
    fn from(e: csv::Error) -> Self {
        InputError::Csv(e)
    }
}

impl From<serde_json::Error> for InputError {
    fn from(e: serde_json::Error) -> Self {
        InputError::Json(e)
    }
}

/// A dispatch policy broke its contract with the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyViolation {
    /// Dispatch was asked to pick from an empty Ready list.
    EmptyReady { policy: &'static str },
    /// Dispatch returned a task that is not in Ready.
    NotInReady { policy: &'static str, pid: Pid },
    /// Dispatch inserted into or removed from Ready.
    MembershipChanged { policy: &'static str },
}

impl fmt::Display for PolicyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyViolation::EmptyReady { policy } => {
                write!(f, "{policy}: dispatch called with an empty ready list")
            }
            PolicyViolation::NotInReady { policy, pid } => {
                write!(f, "{policy}: dispatched pid={pid} which is not ready")
            }
            PolicyViolation::MembershipChanged { policy } => {
                write!(f, "{policy}: dispatch changed ready list membership")
            }
        }
    }
}

impl std::error::Error for PolicyViolation {}

/// A simulation could not run to completion.
#[derive(Debug)]
pub enum SimError {
    Input(InputError),
    PolicyInvariant(PolicyViolation),
    /// The clock hit the safety bound with tasks still unfinished.
    RunawayLoop { max_ticks: Tick, unfinished: usize },
}

impl SimError {
    pub fn is_input(&self) -> bool {
        matches!(self, SimError::Input(_))
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Input(e) => write!(f, "{e}"),
            SimError::PolicyInvariant(v) => write!(f, "policy invariant violated: {v}"),
            SimError::RunawayLoop {
                max_ticks,
                unfinished,
            } => write!(
                f,
                "simulation did not finish within {max_ticks} ticks ({unfinished} tasks unfinished)"
            ),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Input(e) => Some(e),
            SimError::PolicyInvariant(v) => Some(v),
            SimError::RunawayLoop { .. } => None,
        }
    }
}

impl From<InputError> for SimError {
    fn from(e: InputError) -> Self {
        SimError::Input(e)
    }
}

impl From<PolicyViolation> for SimError {
    fn from(v: PolicyViolation) -> Self {
        SimError::PolicyInvariant(v)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_policy_violation_is_source() {
        let err = SimError::from(PolicyViolation::MembershipChanged { policy: "rr" });
        let source = err.source().unwrap();
        assert_eq!(
            source.to_string(),
            "rr: dispatch changed ready list membership"
        );
        assert!(source.downcast_ref::<PolicyViolation>().is_some());

        let err = SimError::RunawayLoop {
            max_ticks: 10,
            unfinished: 1,
        };
        assert!(err.source().is_none());
    }
}
