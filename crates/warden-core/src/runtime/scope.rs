// warden-core/src/runtime/scope.rs
// ============================================================================
// Module: Warden Query-Scope Builder
// Description: Composes a query from directives, sticky state, and metadata.
// Purpose: Build the narrowed, ordered, eager-hinted query for collection reads.
// Dependencies: crate::core, crate::interfaces, crate::runtime::ownership
// ============================================================================

//! ## Overview
//! The scope builder runs a fixed sequence per request: named-scope
//! validation, sticky condition merge and translation, ownership narrowing,
//! join validation, ordering, and eager-load hints. A scope name outside the
//! entity's declared set aborts the whole request; unknown condition fields
//! are dropped and unknown order fields fall back to the default order, so no
//! unvalidated input ever reaches the persistence layer as a raw predicate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::EntityDescriptor;
use crate::core::FieldKind;
use crate::core::FieldSpec;
use crate::core::OrderSpec;
use crate::core::PermissionMatrix;
use crate::core::Predicate;
use crate::core::Principal;
use crate::core::QuerySpec;
use crate::core::RequestDirectives;
use crate::core::SortDirection;
use crate::interfaces::FilterStateError;
use crate::interfaces::FilterStateStore;
use crate::interfaces::StickyKey;
use crate::runtime::ownership::narrow_to_owner;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Query-scope builder errors.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Requested scope is not in the entity's declared set. Terminal for
    /// every role, including root.
    #[error("requested scope is not declared: {0}")]
    ScopeNotPermitted(String),
    /// Requested join names an undeclared association.
    #[error("requested join is not declared: {0}")]
    UnknownAssociation(String),
    /// Sticky filter state could not be read or written.
    #[error(transparent)]
    FilterState(#[from] FilterStateError),
}

// ============================================================================
// SECTION: Scope Builder
// ============================================================================

/// Builds the composed query for a collection read.
///
/// Steps run in order; later steps operate on the narrowed query. Building
/// twice from the same directives and sticky state yields the same query.
///
/// # Errors
///
/// Returns [`QueryError::ScopeNotPermitted`] for undeclared scopes,
/// [`QueryError::UnknownAssociation`] for undeclared joins, and
/// [`QueryError::FilterState`] when sticky state access fails.
pub fn build_scope<F: FilterStateStore>(
    entity: &EntityDescriptor,
    matrix: &PermissionMatrix,
    principal: &Principal,
    directives: &RequestDirectives,
    filters: &F,
) -> Result<QuerySpec, QueryError> {
    let mut query = QuerySpec::new();

    if let Some(scope) = &directives.scope {
        if !entity.scopes.contains(scope) {
            return Err(QueryError::ScopeNotPermitted(scope.to_string()));
        }
        query.scope = Some(scope.clone());
    }

    apply_conditions(&mut query, entity, principal, directives, filters)?;
    narrow_to_owner(&mut query, matrix, principal, entity);
    apply_joins(&mut query, entity, directives)?;
    apply_order(&mut query, entity, directives);
    query.eager = entity.eager_associations();

    Ok(query)
}

/// Merges request conditions into sticky state and translates the merged set
/// into predicate fragments.
fn apply_conditions<F: FilterStateStore>(
    query: &mut QuerySpec,
    entity: &EntityDescriptor,
    principal: &Principal,
    directives: &RequestDirectives,
    filters: &F,
) -> Result<(), QueryError> {
    let key = StickyKey::new(principal.id.clone(), entity.name.clone());
    let mut merged = if directives.reset_filters {
        Default::default()
    } else {
        filters.load(&key)?.unwrap_or_default()
    };
    merged.extend(directives.conditions.clone());
    filters.replace(&key, merged.clone())?;

    for (field, value) in &merged {
        // Unknown condition fields fail closed: dropped, never passed raw.
        if let Some(spec) = entity.field(field) {
            query.push_predicate(translate_condition(spec, value));
        }
    }
    Ok(())
}

/// Validates requested joins against declared associations and collapses
/// duplicates.
fn apply_joins(
    query: &mut QuerySpec,
    entity: &EntityDescriptor,
    directives: &RequestDirectives,
) -> Result<(), QueryError> {
    for join in &directives.joins {
        if entity.association(join).is_none() {
            return Err(QueryError::UnknownAssociation(join.to_string()));
        }
        query.push_join(join.clone());
    }
    Ok(())
}

/// Applies explicit ordering, falling back to the entity default. An explicit
/// order field that is not declared also falls back to the default.
fn apply_order(query: &mut QuerySpec, entity: &EntityDescriptor, directives: &RequestDirectives) {
    query.order = match &directives.order_by {
        Some(field) if entity.field(field).is_some() => Some(OrderSpec::new(
            field.clone(),
            directives.sort_order.unwrap_or(SortDirection::Desc),
        )),
        _ => entity.default_order.clone(),
    };
}

/// Translates one merged condition into a predicate fragment using the
/// field's declared kind.
fn translate_condition(spec: &FieldSpec, value: &Value) -> Predicate {
    match spec.kind {
        FieldKind::String => Predicate::contains(spec.name.clone(), value.clone()),
        FieldKind::Boolean => Predicate::equals(spec.name.clone(), normalize_boolean(value)),
        FieldKind::Integer | FieldKind::Reference => {
            Predicate::equals(spec.name.clone(), value.clone())
        }
    }
}

/// Normalizes request-supplied boolean condition values. String forms arrive
/// from query parameters as `"true"` / `"1"` and friends.
fn normalize_boolean(value: &Value) -> Value {
    match value {
        Value::String(text) => match text.as_str() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => value.clone(),
        },
        _ => value.clone(),
    }
}
