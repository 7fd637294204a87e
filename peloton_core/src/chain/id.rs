// Copyright 2026 the Peloton Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile instance identity.

use alloc::format;
use alloc::string::String;
use core::fmt;

/// Identifies one placement of a tile drawing within a session.
///
/// Ids are handed out by a counter that never goes backwards, not even when
/// tiles are removed or the course is reset, so the namespace prefix derived
/// from an id is never reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(pub(crate) u32);

impl InstanceId {
    /// Creates an id from its raw counter value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Namespace prefix for element ids of this instance, e.g. `t3-`.
    #[must_use]
    pub fn prefix(self) -> String {
        format!("t{}-", self.0)
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_format() {
        assert_eq!(InstanceId::from_raw(1).prefix(), "t1-");
        assert_eq!(InstanceId::from_raw(42).prefix(), "t42-");
    }
}
