//! Copy status state machine
//!
//! A physical copy is always in exactly one of three states. Workflows ask for a
//! transition through [`StatusRequest`]; the machine itself accepts any request
//! from any state. The only status-based rule enforced elsewhere is that a
//! borrowed copy cannot be deleted (see `domain::rules`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Availability status of a physical copy.
///
/// Persisted as the variant name (`"Available"`, `"Borrowed"`, `"Withdrawn"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CopyStatus {
    /// On the shelf, can be lent
    #[default]
    Available,
    /// Currently out on loan (an open borrowing references it)
    Borrowed,
    /// Taken out of circulation by an operator
    Withdrawn,
}

/// Transition requested by a higher-level workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRequest {
    /// A borrowing was opened against the copy
    Lend,
    /// The borrowing was closed or deleted
    Release,
    /// Operator takes the copy out of circulation
    Withdraw,
    /// Operator puts a withdrawn copy back on the shelf
    Reinstate,
}

impl CopyStatus {
    /// Apply a transition request and return the resulting state.
    pub fn apply(self, request: StatusRequest) -> CopyStatus {
        match request {
            StatusRequest::Lend => CopyStatus::Borrowed,
            StatusRequest::Release | StatusRequest::Reinstate => CopyStatus::Available,
            StatusRequest::Withdraw => CopyStatus::Withdrawn,
        }
    }

    pub fn is_lendable(self) -> bool {
        self == CopyStatus::Available
    }

    /// A copy in this state may not be physically removed.
    pub fn blocks_delete(self) -> bool {
        self == CopyStatus::Borrowed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CopyStatus::Available => "Available",
            CopyStatus::Borrowed => "Borrowed",
            CopyStatus::Withdrawn => "Withdrawn",
        }
    }
}

impl fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a persisted status string is not a known state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown copy status '{}'", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for CopyStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(CopyStatus::Available),
            "Borrowed" => Ok(CopyStatus::Borrowed),
            "Withdrawn" => Ok(CopyStatus::Withdrawn),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requests_are_accepted_from_any_state() {
        for state in [
            CopyStatus::Available,
            CopyStatus::Borrowed,
            CopyStatus::Withdrawn,
        ] {
            assert_eq!(state.apply(StatusRequest::Lend), CopyStatus::Borrowed);
            assert_eq!(state.apply(StatusRequest::Release), CopyStatus::Available);
            assert_eq!(state.apply(StatusRequest::Withdraw), CopyStatus::Withdrawn);
            assert_eq!(state.apply(StatusRequest::Reinstate), CopyStatus::Available);
        }
    }

    #[test]
    fn test_only_borrowed_blocks_delete() {
        assert!(CopyStatus::Borrowed.blocks_delete());
        assert!(!CopyStatus::Available.blocks_delete());
        assert!(!CopyStatus::Withdrawn.blocks_delete());
    }

    #[test]
    fn test_only_available_is_lendable() {
        assert!(CopyStatus::Available.is_lendable());
        assert!(!CopyStatus::Borrowed.is_lendable());
        assert!(!CopyStatus::Withdrawn.is_lendable());
    }

    #[test]
    fn test_parse_persisted_names() {
        assert_eq!("Borrowed".parse::<CopyStatus>(), Ok(CopyStatus::Borrowed));
        assert_eq!(
            CopyStatus::Withdrawn.as_str().parse::<CopyStatus>(),
            Ok(CopyStatus::Withdrawn)
        );
        assert_eq!(
            "loaned".parse::<CopyStatus>(),
            Err(UnknownStatus("loaned".to_string()))
        );
    }
}
