//! Named filter clauses combined into a single item predicate.
//!
//! Every clause sits under a [`ClauseKey`] and carries a [`Combinator`].
//! An item passes when all AND clauses hold and at least one OR clause
//! holds. What happens when no OR clause is registered is decided by the
//! registry's [`EmptyOrPolicy`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Axis, Item};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    And,
    Or,
}

/// Slot a clause occupies in the registry. At most one clause per key.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClauseKey {
    AxisLimit(Axis),
    Category(String),
    NameSearch,
}

/// Filter condition. Each variant stores the literal value it was built with.
#[derive(Clone, Debug, PartialEq)]
pub enum Clause {
    AxisAtMost { axis: Axis, max: f64 },
    CategoryIs(String),
    NameEquals(String),
    /// Case-insensitive phrase match on the display name.
    NameContains(String),
}

impl Clause {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::AxisAtMost { axis, max } => item.metric(*axis) <= *max,
            Self::CategoryIs(category) => item.category == *category,
            Self::NameEquals(name) => item.display_name == *name,
            Self::NameContains(phrase) => item
                .display_name
                .to_lowercase()
                .contains(&phrase.trim().to_lowercase()),
        }
    }

    pub fn key(&self) -> ClauseKey {
        match self {
            Self::AxisAtMost { axis, .. } => ClauseKey::AxisLimit(*axis),
            Self::CategoryIs(category) => ClauseKey::Category(category.clone()),
            Self::NameEquals(_) | Self::NameContains(_) => ClauseKey::NameSearch,
        }
    }

    pub fn default_combinator(&self) -> Combinator {
        match self {
            Self::CategoryIs(_) => Combinator::Or,
            Self::AxisAtMost { .. } | Self::NameEquals(_) | Self::NameContains(_) => {
                Combinator::And
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FilterClause {
    pub clause: Clause,
    pub combinator: Combinator,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyOrPolicy {
    /// No OR clause means no item passes.
    #[default]
    RejectAll,
    /// No OR clause means the OR group is vacuously satisfied.
    PassAll,
}

#[derive(Clone, Debug, Default)]
pub struct FilterRegistry {
    clauses: BTreeMap<ClauseKey, FilterClause>,
    empty_or: EmptyOrPolicy,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(empty_or: EmptyOrPolicy) -> Self {
        Self {
            clauses: BTreeMap::new(),
            empty_or,
        }
    }

    pub fn policy(&self) -> EmptyOrPolicy {
        self.empty_or
    }

    /// Inserts or replaces the clause under `key`, returning the replaced one.
    pub fn set_clause(
        &mut self,
        key: ClauseKey,
        clause: Clause,
        combinator: Combinator,
    ) -> Option<FilterClause> {
        self.clauses
            .insert(key, FilterClause { clause, combinator })
    }

    /// Inserts `clause` under its natural key with its default combinator.
    pub fn set(&mut self, clause: Clause) -> Option<FilterClause> {
        let key = clause.key();
        let combinator = clause.default_combinator();
        self.set_clause(key, clause, combinator)
    }

    /// Removes the clause under `key`. Absent keys are not an error.
    pub fn remove_clause(&mut self, key: &ClauseKey) -> Option<FilterClause> {
        self.clauses.remove(key)
    }

    pub fn contains(&self, key: &ClauseKey) -> bool {
        self.clauses.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClauseKey, &FilterClause)> {
        self.clauses.iter()
    }

    /// Drops every category clause, leaving axis and name clauses in place.
    pub fn clear_categories(&mut self) {
        self.clauses
            .retain(|key, _| !matches!(key, ClauseKey::Category(_)));
    }

    /// Snapshots the current clause set into a standalone predicate.
    pub fn build_predicate(&self) -> CombinedPredicate {
        let mut and_clauses = Vec::new();
        let mut or_clauses = Vec::new();
        for entry in self.clauses.values() {
            match entry.combinator {
                Combinator::And => and_clauses.push(entry.clause.clone()),
                Combinator::Or => or_clauses.push(entry.clause.clone()),
            }
        }

        CombinedPredicate {
            and_clauses,
            or_clauses,
            empty_or: self.empty_or,
        }
    }
}

/// Owned snapshot of a registry's clauses at the time it was built.
#[derive(Clone, Debug, PartialEq)]
pub struct CombinedPredicate {
    and_clauses: Vec<Clause>,
    or_clauses: Vec<Clause>,
    empty_or: EmptyOrPolicy,
}

impl CombinedPredicate {
    pub fn matches(&self, item: &Item) -> bool {
        let and_result = self.and_clauses.iter().all(|clause| clause.matches(item));
        let or_result = if self.or_clauses.is_empty() {
            self.empty_or == EmptyOrPolicy::PassAll
        } else {
            self.or_clauses.iter().any(|clause| clause.matches(item))
        };

        and_result && or_result
    }
}
