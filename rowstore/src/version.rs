//! Process-wide version stamps for cheap equality

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Opaque stamp identifying one state of a keyed store
///
/// Stamps come from a single process-wide counter, so two stores share a
/// stamp only when one is an unmodified copy of the other (or both are
/// still in their freshly created state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(u64);

impl Version {
    /// Stamp of a store nobody has written to yet
    pub const INITIAL: Version = Version(0);

    /// Draw a stamp newer than every stamp drawn before
    pub fn next() -> Self {
        Version(NEXT_VERSION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_increase() {
        let a = Version::next();
        let b = Version::next();
        assert!(b > a);
        assert!(a > Version::INITIAL);
        assert_eq!(Version::default(), Version::INITIAL);
    }
}
