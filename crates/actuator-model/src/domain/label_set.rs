use std::{collections::HashSet, fmt};

use crate::{Label, LabelKey, LabelValue, ModelError, ModelResult, Segment};

/// How a batch insertion treats keys that are already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnSeen {
    /// Reject the whole batch.
    Fail,
    /// Skip the label, keeping the value that was there first.
    Skip,
}

/// Canonical, duplicate-free, key-sorted collection of labels.
///
/// Two sets holding the same labels produce the same sequence, [`Display`](fmt::Display)
/// identity and [`LabelSet::segments`] path regardless of the order the labels arrived in.
///
/// Every insertion re-sorts the accumulated sequence, so prefer one batched call
/// over calling [`LabelSet::add`] once per label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    in_order: Vec<Label>,
    seen: HashSet<LabelKey>,
}

impl LabelSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from labels, failing on any repeated key.
    pub fn from_labels<I>(labels: I) -> ModelResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        let mut set = Self::new();
        set.add(labels)?;
        Ok(set)
    }

    /// Insert labels, failing with [`ModelError::DuplicateLabel`] if a key is
    /// already present in the set or repeated within the batch.
    ///
    /// On failure the set is left unchanged.
    pub fn add<I>(&mut self, labels: I) -> ModelResult<()>
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        self.admit(labels.into_iter().map(Into::into), OnSeen::Fail)
    }

    /// Insert labels, silently skipping keys that are already present.
    ///
    /// The first value seen for a key always wins.
    pub fn accumulate<I>(&mut self, labels: I)
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        // Skip policy never reports a conflict.
        let _ = self.admit(labels.into_iter().map(Into::into), OnSeen::Skip);
    }

    /// Strict insertion from an unordered mapping.
    pub fn add_map<'a, M>(&mut self, labels: M) -> ModelResult<()>
    where
        M: IntoIterator<Item = (&'a LabelKey, &'a LabelValue)>,
    {
        self.admit(map_labels(labels), OnSeen::Fail)
    }

    /// Accumulating insertion from an unordered mapping.
    pub fn accumulate_map<'a, M>(&mut self, labels: M)
    where
        M: IntoIterator<Item = (&'a LabelKey, &'a LabelValue)>,
    {
        let _ = self.admit(map_labels(labels), OnSeen::Skip);
    }

    fn admit<I>(&mut self, labels: I, on_seen: OnSeen) -> ModelResult<()>
    where
        I: Iterator<Item = Label>,
    {
        let mut admitted: Vec<Label> = Vec::new();
        let mut batch: HashSet<LabelKey> = HashSet::new();

        for label in labels {
            if self.seen.contains(label.key()) || batch.contains(label.key()) {
                match on_seen {
                    OnSeen::Fail => return Err(ModelError::DuplicateLabel(label.key().clone())),
                    OnSeen::Skip => continue,
                }
            }
            batch.insert(label.key().clone());
            admitted.push(label);
        }
        if admitted.is_empty() {
            return Ok(());
        }

        self.seen.extend(batch);
        self.in_order.extend(admitted);
        self.in_order.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(())
    }

    /// Flatten into a segment path: key then value for every label, in key order.
    ///
    /// An empty set yields an empty path.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segs = Vec::with_capacity(2 * self.in_order.len());
        for l in &self.in_order {
            segs.push(Segment::from(l.key()));
            segs.push(Segment::from(l.value()));
        }
        segs
    }

    /// Get the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&LabelValue> {
        self.in_order
            .iter()
            .find(|l| l.key().as_str() == key)
            .map(Label::value)
    }

    /// Returns `true` if the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.seen.contains(key)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.in_order.len()
    }

    /// Returns `true` if no labels are present.
    pub fn is_empty(&self) -> bool {
        self.in_order.is_empty()
    }

    /// Iterate labels in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.in_order.iter()
    }
}

fn map_labels<'a, M>(labels: M) -> impl Iterator<Item = Label>
where
    M: IntoIterator<Item = (&'a LabelKey, &'a LabelValue)>,
{
    labels
        .into_iter()
        .map(|(k, v)| Label::from((k.clone(), v.clone())))
}

/// Stable identity: `key=value;` for every label in key order.
impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for l in &self.in_order {
            write!(f, "{}={};", l.key(), l.value())?;
        }
        Ok(())
    }
}
