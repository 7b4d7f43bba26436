use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Name half of a label (e.g. `severity`).
///
/// Opaque UTF-8 string; no validation is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelKey(String);

impl LabelKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LabelKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LabelKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LabelKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value half of a label (e.g. `critical`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelValue(String);

impl LabelValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for LabelValue {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LabelValue {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LabelValue {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for LabelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable key–value pair used to classify alerts and rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Label {
    key: LabelKey,
    value: LabelValue,
}

impl Label {
    /// Create a new label.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<LabelKey>,
        V: Into<LabelValue>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the key.
    pub fn key(&self) -> &LabelKey {
        &self.key
    }

    /// Get the value.
    pub fn value(&self) -> &LabelValue {
        &self.value
    }
}

impl From<(&str, &str)> for Label {
    fn from((key, value): (&str, &str)) -> Self {
        Self::new(key, value)
    }
}

impl From<(String, String)> for Label {
    fn from((key, value): (String, String)) -> Self {
        Self::new(key, value)
    }
}

impl From<(LabelKey, LabelValue)> for Label {
    fn from((key, value): (LabelKey, LabelValue)) -> Self {
        Self { key, value }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
