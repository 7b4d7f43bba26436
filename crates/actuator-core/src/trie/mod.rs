//! Prefix tree keyed by sequences of opaque [`Segment`]s.
//!
//! A lookup walks the query path from the root and collects the value of every node it passes,
//! so a value stored under a shorter path is returned for every longer path that extends it.
use std::collections::HashMap;

use actuator_model::{LabelSet, Segment};

/// Anything that can be flattened into a segment path.
pub trait Segmentable {
    fn segments(&self) -> Vec<Segment>;
}

impl Segmentable for LabelSet {
    fn segments(&self) -> Vec<Segment> {
        LabelSet::segments(self)
    }
}

impl Segmentable for [Segment] {
    fn segments(&self) -> Vec<Segment> {
        self.to_vec()
    }
}

impl Segmentable for Vec<Segment> {
    fn segments(&self) -> Vec<Segment> {
        self.clone()
    }
}

/// Trie node; exclusively owns its children.
///
/// A node without a value only routes lookups further down.
#[derive(Debug)]
pub struct Node<V> {
    value: Option<V>,
    children: HashMap<Segment, Node<V>>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self {
            value: None,
            children: HashMap::new(),
        }
    }
}

impl<V> Node<V> {
    /// Value stored at this node, if any.
    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    /// Child reached through `segment`, if any.
    pub fn child(&self, segment: &str) -> Option<&Node<V>> {
        self.children.get(segment)
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Segment-keyed prefix tree.
#[derive(Debug)]
pub struct SegmentTrie<V> {
    root: Node<V>,
    len: usize,
}

impl<V> Default for SegmentTrie<V> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }
}

impl<V> SegmentTrie<V> {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` at the node reached by `path`, creating intermediate nodes as needed.
    ///
    /// Returns `true` if the node had no value before, `false` if a value was overwritten.
    /// The empty path addresses the root.
    pub fn insert(&mut self, path: &[Segment], value: V) -> bool {
        let mut node = &mut self.root;
        for seg in path {
            node = node.children.entry(seg.clone()).or_default();
        }
        let novel = node.value.replace(value).is_none();
        if novel {
            self.len += 1;
        }
        novel
    }

    /// Collect every value found while walking `path`, shallowest first.
    ///
    /// The root value (stored under the empty path) prefixes every walk. The walk stops at the
    /// first segment without a matching child; an unmatched path yields an empty vector.
    pub fn get(&self, path: &[Segment]) -> Vec<&V> {
        let mut node = &self.root;
        let mut values: Vec<&V> = node.value.iter().collect();

        for seg in path {
            let Some(child) = node.children.get(seg) else {
                break;
            };
            node = child;
            if let Some(v) = &node.value {
                values.push(v);
            }
        }
        values
    }

    /// Collect every value stored under a path built from an ordered subset of `path`'s
    /// `width`-segment chunks, shallowest first.
    ///
    /// With `width == 2` and a label set's segments, this returns the value of every stored
    /// label set that is a subset of the queried one. The root value is always included. A
    /// trailing partial chunk is ignored.
    pub fn get_subsets(&self, path: &[Segment], width: usize) -> Vec<&V> {
        if width == 0 {
            return self.root.value.iter().collect();
        }
        let chunks: Vec<&[Segment]> = path.chunks_exact(width).collect();
        let mut found: Vec<(usize, &V)> = Vec::new();
        if let Some(v) = &self.root.value {
            found.push((0, v));
        }
        Self::walk_subsets(&self.root, &chunks, 0, &mut found);
        found.sort_by_key(|(depth, _)| *depth);
        found.into_iter().map(|(_, v)| v).collect()
    }

    fn walk_subsets<'a>(
        node: &'a Node<V>,
        chunks: &[&[Segment]],
        depth: usize,
        found: &mut Vec<(usize, &'a V)>,
    ) {
        for (i, chunk) in chunks.iter().enumerate() {
            let Some(child) = Self::descend(node, chunk) else {
                continue;
            };
            if let Some(v) = &child.value {
                found.push((depth + 1, v));
            }
            if !child.is_leaf() {
                Self::walk_subsets(child, &chunks[i + 1..], depth + 1, found);
            }
        }
    }

    fn descend<'a>(node: &'a Node<V>, chunk: &[Segment]) -> Option<&'a Node<V>> {
        chunk
            .iter()
            .try_fold(node, |n, seg| n.children.get(seg.as_str()))
    }

    /// [`SegmentTrie::insert`] using the key's segment path.
    pub fn insert_key<K>(&mut self, key: &K, value: V) -> bool
    where
        K: Segmentable + ?Sized,
    {
        self.insert(&key.segments(), value)
    }

    /// [`SegmentTrie::get`] using the key's segment path.
    pub fn get_key<K>(&self, key: &K) -> Vec<&V>
    where
        K: Segmentable + ?Sized,
    {
        self.get(&key.segments())
    }

    /// Root node of the tree.
    pub fn root(&self) -> &Node<V> {
        &self.root
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no value is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
