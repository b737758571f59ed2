//! Newtype wrappers and type aliases for domain concepts.
//!
//! Process identifiers come from user input and may be integers or strings,
//! so `Pid` is an enum rather than a numeric newtype. Internally the engine
//! refers to tasks by `TaskIdx`, a position in the task arena, which is cheap
//! to copy and compare. Type aliases for plain quantities (ticks) keep the
//! code self-documenting without arithmetic boilerplate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Simulated time, in ticks.
pub type Tick = u64;

/// Process identifier as given in the input.
///
/// Integer-looking identifiers are kept as numbers so that output mirrors
/// the input (`1` stays `1`, not `"1"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pid {
    Num(i64),
    Name(String),
}

impl Pid {
    /// Parse a raw identifier: integers become `Pid::Num`, anything else a
    /// trimmed `Pid::Name`.
    pub fn parse(raw: &str) -> Pid {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(n) => Pid::Num(n),
            Err(_) => Pid::Name(raw.to_string()),
        }
    }
}

impl From<i64> for Pid {
    fn from(n: i64) -> Self {
        Pid::Num(n)
    }
}

impl From<i32> for Pid {
    fn from(n: i32) -> Self {
        Pid::Num(n.into())
    }
}

impl From<&str> for Pid {
    fn from(s: &str) -> Self {
        Pid::Name(s.to_string())
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pid::Num(n) => write!(f, "{n}"),
            Pid::Name(s) => f.write_str(s),
        }
    }
}

/// Index of a task in the simulator's task arena.
///
/// Every task lives in exactly one arena slot for the whole run; the four
/// state lists only hold indices, so burst decrements are visible no matter
/// which list currently owns the task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskIdx(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_parse() {
        assert_eq!(Pid::parse("42"), Pid::Num(42));
        assert_eq!(Pid::parse(" 7 "), Pid::Num(7));
        assert_eq!(Pid::parse("p1"), Pid::Name("p1".into()));
        assert_eq!(Pid::parse("-3"), Pid::Num(-3));
    }

    #[test]
    fn test_pid_serde_untagged() {
        assert_eq!(serde_json::to_string(&Pid::Num(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Pid::from("web")).unwrap(), "\"web\"");
        let pid: Pid = serde_json::from_str("\"db\"").unwrap();
        assert_eq!(pid, Pid::from("db"));
        let pid: Pid = serde_json::from_str("12").unwrap();
        assert_eq!(pid, Pid::Num(12));
    }
}
