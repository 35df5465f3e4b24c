//! Policy statements: one effect bound to a resource set and an action set.

use std::cmp::Ordering;

use super::action::{compare_actions, PolicyAction};
use super::{Effect, PolicyError};
use crate::collection::OrderedList;
use crate::identifier::{compare_identifiers, Identifier};

/// An atomic rule: `effect` applies to every (resource, action) pair drawn
/// from the statement's two target sets.
///
/// Statements are immutable once constructed; a policy edits its rule set by
/// replacing whole statements. Empty target sets are legal; such a
/// statement matches nothing and is inert rather than invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    effect: Effect,
    resources: OrderedList<Identifier>,
    actions: OrderedList<PolicyAction>,
}

impl Statement {
    /// Create a statement. Only `Allow` and `Deny` are constructible
    /// effects; `Unspecified` is rejected.
    pub fn new(
        effect: Effect,
        resources: Vec<Identifier>,
        actions: Vec<PolicyAction>,
    ) -> Result<Self, PolicyError> {
        effect.as_str()?;
        Ok(Self {
            effect,
            resources: OrderedList::with_items(compare_identifiers, resources),
            actions: OrderedList::with_items(compare_actions, actions),
        })
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Target resources, in insertion order.
    pub fn resources(&self) -> &[Identifier] {
        self.resources.as_slice()
    }

    /// Target actions, in insertion order.
    pub fn actions(&self) -> &[PolicyAction] {
        self.actions.as_slice()
    }

    /// The applicable effect for `(resource, action)`: the statement's own
    /// effect when both targets contain the query pair, `Unspecified`
    /// otherwise.
    pub fn permission(&self, resource: &Identifier, action: PolicyAction) -> Effect {
        if !self.resources.contains(resource) || !self.actions.contains(&action) {
            return Effect::Unspecified;
        }
        self.effect
    }
}

/// Structural ordering: effect first, then resource sets, then action sets.
pub fn compare_statements(a: &Statement, b: &Statement) -> Ordering {
    let effect_rank = |effect: Effect| match effect {
        Effect::Allow => 0u8,
        Effect::Deny => 1,
        Effect::Unspecified => 2,
    };
    effect_rank(a.effect)
        .cmp(&effect_rank(b.effect))
        .then_with(|| a.resources.as_slice().cmp(b.resources.as_slice()))
        .then_with(|| a.actions.as_slice().cmp(b.actions.as_slice()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
