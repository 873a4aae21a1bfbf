// warden-core/src/core/query.rs
// ============================================================================
// Module: Warden Query Types
// Description: Composed query specifications and request-supplied directives.
// Purpose: Express filtering, joining, ordering, and eager-load hints generically.
// Dependencies: crate::core::identifiers, serde
// ============================================================================

//! ## Overview
//! A [`QuerySpec`] is the composed output of the scope builder: an ordered
//! predicate list plus joins, ordering, and eager-load hints that the
//! persistence collaborator executes. [`RequestDirectives`] carry the raw
//! request inputs (named scope, ad-hoc conditions, join and order requests)
//! before validation and translation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::AssociationName;
use crate::core::identifiers::FieldName;
use crate::core::identifiers::ScopeName;

// ============================================================================
// SECTION: Ordering
// ============================================================================

/// Sort direction for an order specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Ordering applied to a composed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    /// Field ordered by.
    pub field: FieldName,
    /// Sort direction.
    pub direction: SortDirection,
}

impl OrderSpec {
    /// Creates an order specification.
    #[must_use]
    pub fn new(field: impl Into<FieldName>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

// ============================================================================
// SECTION: Predicates
// ============================================================================

/// Comparison applied by a predicate fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateOp {
    /// Field value equals the predicate value.
    Equals,
    /// String field value contains the predicate value.
    Contains,
}

/// Single AND-conjoined predicate fragment in a composed query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    /// Field the predicate applies to.
    pub field: FieldName,
    /// Comparison operator.
    pub op: PredicateOp,
    /// Comparison value.
    pub value: Value,
}

impl Predicate {
    /// Creates an equality predicate.
    #[must_use]
    pub fn equals(field: impl Into<FieldName>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: PredicateOp::Equals,
            value,
        }
    }

    /// Creates a containment predicate.
    #[must_use]
    pub fn contains(field: impl Into<FieldName>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: PredicateOp::Contains,
            value,
        }
    }
}

// ============================================================================
// SECTION: Composed Query
// ============================================================================

/// Condition map carried by request directives and sticky filter state.
pub type ConditionMap = BTreeMap<FieldName, Value>;

/// Composed query handed to the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Validated named scope, applied by the persistence layer.
    pub scope: Option<ScopeName>,
    /// Ordered predicate fragments, AND-conjoined.
    pub predicates: Vec<Predicate>,
    /// Association joins, deduplicated in request order.
    pub joins: Vec<AssociationName>,
    /// Explicit ordering, when any.
    pub order: Option<OrderSpec>,
    /// Associations marked for eager loading.
    pub eager: Vec<AssociationName>,
}

impl QuerySpec {
    /// Creates an empty query spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a predicate fragment.
    pub fn push_predicate(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    /// Appends a join, collapsing duplicates.
    pub fn push_join(&mut self, join: AssociationName) {
        if !self.joins.contains(&join) {
            self.joins.push(join);
        }
    }
}

// ============================================================================
// SECTION: Request Directives
// ============================================================================

/// Raw per-request directives consumed by the scope builder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDirectives {
    /// Requested named scope; must be declared on the entity.
    pub scope: Option<ScopeName>,
    /// Ad-hoc filter conditions keyed by field name.
    pub conditions: ConditionMap,
    /// When set, sticky filter state is discarded before merging.
    pub reset_filters: bool,
    /// Requested association joins.
    pub joins: Vec<AssociationName>,
    /// Explicit order field.
    pub order_by: Option<FieldName>,
    /// Explicit sort direction; defaults to descending when `order_by` is
    /// present without a direction.
    pub sort_order: Option<SortDirection>,
}

impl RequestDirectives {
    /// Creates empty directives.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
