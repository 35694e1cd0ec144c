use serde::{Deserialize, Serialize};

use crate::errors::HubError;

/// Lock state of a routable destination.
///
/// The device distinguishes locks held by this controller (`O`) from locks
/// held by other controllers (`L`), but every path through this adapter
/// treats both as "someone holds it", so they collapse to [`LockState::Owned`]
/// on parse. Only `U` and `O` are ever transmitted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LockState {
    Unlocked,
    Owned,
}

impl LockState {
    /// Parse a wire lock code. `U` → Unlocked, `O` or `L` → Owned; anything
    /// else is rejected so the caller can skip the line with a warning.
    pub fn from_wire(code: &str) -> Result<Self, HubError> {
        match code {
            "U" => Ok(LockState::Unlocked),
            "O" | "L" => Ok(LockState::Owned),
            other => Err(HubError::InvalidLockValue(other.to_string())),
        }
    }

    /// Wire code for outbound lock commands.
    pub fn to_wire(self) -> &'static str {
        match self {
            LockState::Unlocked => "U",
            LockState::Owned => "O",
        }
    }

    /// The state a toggle request moves to.
    pub fn toggled(self) -> Self {
        match self {
            LockState::Unlocked => LockState::Owned,
            LockState::Owned => LockState::Unlocked,
        }
    }
}

impl Default for LockState {
    fn default() -> Self {
        LockState::Unlocked
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wire_codes() {
        assert_eq!(LockState::from_wire("U").unwrap(), LockState::Unlocked);
        assert_eq!(LockState::from_wire("O").unwrap(), LockState::Owned);
        assert_eq!(LockState::from_wire("L").unwrap(), LockState::Owned);
    }

    #[test]
    fn test_invalid_code_rejected() {
        match LockState::from_wire("X") {
            Err(HubError::InvalidLockValue(code)) => assert_eq!(code, "X"),
            other => panic!("Expected InvalidLockValue, got {:?}", other),
        }
    }

    #[test]
    fn test_owned_never_roundtrips_to_l() {
        assert_eq!(LockState::from_wire("L").unwrap().to_wire(), "O");
    }

    #[test]
    fn test_toggle() {
        assert_eq!(LockState::Unlocked.toggled(), LockState::Owned);
        assert_eq!(LockState::Owned.toggled(), LockState::Unlocked);
    }
}
