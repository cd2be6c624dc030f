//! Package-relative jump targets.

use std::fmt;

/// Target of a control-flow instruction, as a package-relative instruction
/// index.
///
/// The all-ones value is reserved as the invalid sentinel; it can never name a
/// real instruction because a package of `u64::MAX` instructions cannot be
/// built.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct JumpAddress(u64);

impl JumpAddress {
    /// Sentinel denoting "no valid target".
    pub const INVALID: JumpAddress = JumpAddress(u64::MAX);

    /// Creates a jump address targeting the given instruction index.
    pub const fn new(address: u64) -> JumpAddress {
        JumpAddress(address)
    }

    /// Returns the target instruction index.
    pub const fn address(self) -> u64 {
        self.0
    }

    /// Returns `true` unless this is the invalid sentinel.
    pub const fn is_potentially_valid(self) -> bool {
        self.0 != u64::MAX
    }
}

impl fmt::Display for JumpAddress {
    /// Renders the address in its textual operand form, e.g. `@20`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}
