// warden-core/src/runtime/memory.rs
// ============================================================================
// Module: Warden In-Memory Collaborators
// Description: In-memory record store and principal source for tests and examples.
// Purpose: Provide deterministic collaborator implementations without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides simple in-memory implementations of [`RecordStore`]
//! and [`PrincipalSource`] for tests and local demos. Collections preserve
//! insertion order so an unordered query returns rows in the order they were
//! stored, matching the persistence-default ordering contract. Named scopes
//! and required-field validations are registered explicitly, standing in for
//! the scope and validation machinery of a real backend.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::Value;

use crate::core::EntityName;
use crate::core::FieldName;
use crate::core::Predicate;
use crate::core::PredicateOp;
use crate::core::Principal;
use crate::core::PrincipalId;
use crate::core::QuerySpec;
use crate::core::Record;
use crate::core::RecordId;
use crate::core::ScopeName;
use crate::core::SortDirection;
use crate::core::scalar_text;
use crate::interfaces::FieldError;
use crate::interfaces::PrincipalSource;
use crate::interfaces::PrincipalSourceError;
use crate::interfaces::RecordStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Record Store
// ============================================================================

/// Mutable collections shared behind the store mutex.
#[derive(Debug, Default)]
struct StoreState {
    /// Records per entity, in insertion order.
    collections: BTreeMap<String, Vec<Record>>,
    /// Next identifier assigned on first save.
    next_id: u64,
}

/// In-memory record store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<StoreState>>,
    /// Required fields per entity, enforced on save.
    required: BTreeMap<String, BTreeSet<FieldName>>,
    /// Named scope predicates keyed by entity and scope name.
    scopes: BTreeMap<String, Predicate>,
}

impl InMemoryRecordStore {
    /// Creates an empty record store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a required field for an entity. Saves missing the field or
    /// carrying JSON null are rejected with a validation error.
    pub fn require_field(&mut self, entity: impl Into<EntityName>, field: impl Into<FieldName>) {
        self.required.entry(entity.into().to_string()).or_default().insert(field.into());
    }

    /// Registers the predicate a named scope applies for an entity.
    pub fn register_scope(
        &mut self,
        entity: impl Into<EntityName>,
        scope: impl Into<ScopeName>,
        predicate: Predicate,
    ) {
        self.scopes.insert(scope_key(&entity.into(), &scope.into()), predicate);
    }

    /// Seeds a record directly, bypassing validation. Intended for test
    /// fixtures.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] when the store mutex is poisoned.
    pub fn seed(&self, record: Record) -> Result<(), StoreError> {
        let mut guard = self.lock_state()?;
        guard.collections.entry(record.entity.to_string()).or_default().push(record);
        drop(guard);
        Ok(())
    }

    /// Locks the store state.
    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("record store mutex poisoned".to_string()))
    }

    /// Validates required fields for a record.
    fn validate(&self, record: &Record) -> Result<(), StoreError> {
        let Some(required) = self.required.get(record.entity.as_str()) else {
            return Ok(());
        };
        let errors: Vec<FieldError> = required
            .iter()
            .filter(|field| {
                matches!(record.get(field), None | Some(Value::Null))
            })
            .map(|field| FieldError {
                field: field.clone(),
                message: "can't be blank".to_string(),
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(errors))
        }
    }

    /// Resolves the scope predicate for a query, when a scope is requested.
    fn scope_predicate(
        &self,
        entity: &EntityName,
        query: &QuerySpec,
    ) -> Result<Option<Predicate>, StoreError> {
        query.scope.as_ref().map_or(Ok(None), |scope| {
            self.scopes.get(&scope_key(entity, scope)).cloned().map_or_else(
                || Err(StoreError::Backend(format!("scope not implemented: {scope}"))),
                |predicate| Ok(Some(predicate)),
            )
        })
    }
}

impl RecordStore for InMemoryRecordStore {
    fn select(&self, entity: &EntityName, query: &QuerySpec) -> Result<Vec<Record>, StoreError> {
        let scope_predicate = self.scope_predicate(entity, query)?;
        let guard = self.lock_state()?;
        let mut rows: Vec<Record> = guard
            .collections
            .get(entity.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|record| {
                scope_predicate.as_ref().is_none_or(|predicate| matches(record, predicate))
                    && query.predicates.iter().all(|predicate| matches(record, predicate))
            })
            .cloned()
            .collect();
        drop(guard);
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        Ok(rows)
    }

    fn find(&self, entity: &EntityName, id: &RecordId) -> Result<Option<Record>, StoreError> {
        let guard = self.lock_state()?;
        Ok(guard
            .collections
            .get(entity.as_str())
            .and_then(|rows| rows.iter().find(|record| &record.id == id))
            .cloned())
    }

    fn save(&self, record: &Record) -> Result<Record, StoreError> {
        self.validate(record)?;
        let mut stored = record.clone();
        let mut guard = self.lock_state()?;
        if stored.id.as_str().is_empty() {
            guard.next_id += 1;
            stored.id = RecordId::new(guard.next_id.to_string());
        }
        let rows = guard.collections.entry(stored.entity.to_string()).or_default();
        if let Some(existing) = rows.iter_mut().find(|row| row.id == stored.id) {
            *existing = stored.clone();
        } else {
            rows.push(stored.clone());
        }
        drop(guard);
        Ok(stored)
    }

    fn destroy(&self, record: &Record) -> Result<(), StoreError> {
        let mut guard = self.lock_state()?;
        let rows = guard
            .collections
            .get_mut(record.entity.as_str())
            .ok_or_else(|| StoreError::Backend(format!("unknown entity: {}", record.entity)))?;
        let before = rows.len();
        rows.retain(|row| row.id != record.id);
        let removed = rows.len() < before;
        drop(guard);
        if removed {
            Ok(())
        } else {
            Err(StoreError::Backend(format!("record not found: {}", record.id)))
        }
    }
}

/// Builds the scope registry key for an entity and scope.
fn scope_key(entity: &EntityName, scope: &ScopeName) -> String {
    format!("{entity}/{scope}")
}

/// Evaluates one predicate fragment against a record.
fn matches(record: &Record, predicate: &Predicate) -> bool {
    let Some(actual) = record.get(&predicate.field) else {
        return false;
    };
    match predicate.op {
        PredicateOp::Equals => scalar_eq(actual, &predicate.value),
        PredicateOp::Contains => match (actual.as_str(), predicate.value.as_str()) {
            (Some(haystack), Some(needle)) => haystack.contains(needle),
            _ => false,
        },
    }
}

/// Loose scalar equality: exact JSON equality, or equal canonical text forms
/// so that query-parameter strings match stored numbers.
fn scalar_eq(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (scalar_text(a), scalar_text(b)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Total ordering over optional attribute values for sorting.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => match (left.as_f64(), right.as_f64()) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => scalar_text(left)
                .unwrap_or_default()
                .cmp(&scalar_text(right).unwrap_or_default()),
        },
    }
}

// ============================================================================
// SECTION: In-Memory Principal Source
// ============================================================================

/// In-memory principal source for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPrincipalSource {
    /// Principals keyed by identifier, protected by a mutex.
    principals: Arc<Mutex<BTreeMap<PrincipalId, Principal>>>,
}

impl InMemoryPrincipalSource {
    /// Creates an empty principal source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a principal.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalSourceError`] when the mutex is poisoned.
    pub fn insert(&self, principal: Principal) -> Result<(), PrincipalSourceError> {
        self.principals
            .lock()
            .map_err(|_| PrincipalSourceError::Source("principal source mutex poisoned".to_string()))?
            .insert(principal.id.clone(), principal);
        Ok(())
    }
}

impl PrincipalSource for InMemoryPrincipalSource {
    fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, PrincipalSourceError> {
        let guard = self.principals.lock().map_err(|_| {
            PrincipalSourceError::Source("principal source mutex poisoned".to_string())
        })?;
        Ok(guard.get(id).cloned())
    }
}
