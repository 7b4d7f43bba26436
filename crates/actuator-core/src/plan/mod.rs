//! Rule registry: label conditions mapped to reaction groups.
//!
//! Every rule is stored in a [`SegmentTrie`] under the segment path of its condition set. A rule
//! matches an alert when the alert carries every label of the rule; all matching rules are
//! returned, broadest first.
use std::fmt;

use actuator_model::{Label, LabelSet};
use tracing::{debug, warn};

use crate::{error::CoreResult, reaction::ReactionGroup, trie::SegmentTrie};

/// Label conditions bound to the reactions they trigger.
pub struct Rule {
    conditions: LabelSet,
    reactions: ReactionGroup,
}

impl Rule {
    /// Build a rule, rejecting conditions that repeat a label key.
    pub fn new<I>(conditions: I, reactions: ReactionGroup) -> CoreResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        Ok(Self {
            conditions: LabelSet::from_labels(conditions)?,
            reactions,
        })
    }

    /// Build a rule from an already canonical condition set.
    pub fn from_set(conditions: LabelSet, reactions: ReactionGroup) -> Self {
        Self {
            conditions,
            reactions,
        }
    }

    pub fn conditions(&self) -> &LabelSet {
        &self.conditions
    }

    pub fn reactions(&self) -> &ReactionGroup {
        &self.reactions
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("conditions", &self.conditions.to_string())
            .field("reactions", &self.reactions.len())
            .finish()
    }
}

/// Set of registered rules.
///
/// Built once at startup, then shared read-only (typically behind an `Arc`) by every
/// dispatcher.
#[derive(Default)]
pub struct Plan {
    actions: SegmentTrie<ReactionGroup>,
}

impl Plan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a plan from a static rule set.
    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut plan = Self::new();
        for rule in rules {
            plan.register(rule);
        }
        plan
    }

    /// Build a plan from raw `(conditions, reactions)` pairs.
    ///
    /// Fails on the first malformed condition set; no partial plan is returned.
    pub fn try_from_rules<I, C>(rules: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (C, ReactionGroup)>,
        C: IntoIterator,
        C::Item: Into<Label>,
    {
        let mut plan = Self::new();
        for (conditions, reactions) in rules {
            plan.register_rule(conditions, reactions)?;
        }
        Ok(plan)
    }

    /// Register a rule.
    ///
    /// Returns `false` if a rule with identical conditions was already registered; its
    /// reactions are replaced.
    pub fn register(&mut self, rule: Rule) -> bool {
        self.register_set(&rule.conditions, rule.reactions)
    }

    /// Register `reactions` under the given label conditions.
    ///
    /// Fails if the conditions repeat a label key.
    pub fn register_rule<I>(&mut self, conditions: I, reactions: ReactionGroup) -> CoreResult<bool>
    where
        I: IntoIterator,
        I::Item: Into<Label>,
    {
        let conditions = LabelSet::from_labels(conditions)?;
        Ok(self.register_set(&conditions, reactions))
    }

    /// Register `reactions` under an already canonical condition set.
    pub fn register_set(&mut self, conditions: &LabelSet, reactions: ReactionGroup) -> bool {
        let size = reactions.len();
        let novel = self.actions.insert(&conditions.segments(), reactions);
        if novel {
            debug!(conditions = %conditions, reactions = size, "rule registered");
        } else {
            warn!(conditions = %conditions, reactions = size, "rule replaced an earlier rule with the same conditions");
        }
        novel
    }

    /// Reaction groups of every rule whose conditions are a subset of `labels`, broadest rule
    /// first.
    ///
    /// An empty result means there is nothing to do for these labels.
    pub fn matches(&self, labels: &LabelSet) -> Vec<&ReactionGroup> {
        self.actions.get_subsets(&labels.segments(), 2)
    }

    /// Number of distinct rule conditions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no rule is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan").field("rules", &self.len()).finish()
    }
}
