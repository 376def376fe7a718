//! Message tag handles.

use core::fmt;

/// Handle identifying a message port by its tag string.
///
/// Tags cross the bridge as 32-bit FNV-1a hashes so the real-time path can
/// key tables without string comparisons. The hash is stable across runs and
/// platforms.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageTag(pub u32);

impl MessageTag {
    /// Hash a tag string into its handle.
    pub fn from_str(tag: &str) -> Self {
        let mut hash: u32 = 0x811c9dc5;
        for byte in tag.as_bytes() {
            hash ^= u32::from(*byte);
            hash = hash.wrapping_mul(0x01000193);
        }
        Self(hash)
    }
}

impl fmt::Debug for MessageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageTag({:#010x})", self.0)
    }
}

impl From<&str> for MessageTag {
    fn from(tag: &str) -> Self {
        Self::from_str(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_and_distinct() {
        assert_eq!(MessageTag::from_str("bang"), MessageTag::from_str("bang"));
        assert_ne!(MessageTag::from_str("bang"), MessageTag::from_str("gate"));
        assert_ne!(MessageTag::from_str(""), MessageTag::from_str(" "));
    }

    #[test]
    fn known_vector() {
        // FNV-1a 32 of the empty string is the offset basis.
        assert_eq!(MessageTag::from_str("").0, 0x811c9dc5);
    }
}
