use std::{borrow::Borrow, fmt};

use crate::{LabelKey, LabelValue};

/// Opaque token used as a single edge in a segment path.
///
/// Segments carry no meaning beyond equality; the empty string is a valid segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Segment(String);

impl Segment {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Segment {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Segment {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&LabelKey> for Segment {
    fn from(k: &LabelKey) -> Self {
        Self(k.as_str().to_string())
    }
}

impl From<&LabelValue> for Segment {
    fn from(v: &LabelValue) -> Self {
        Self(v.as_str().to_string())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
