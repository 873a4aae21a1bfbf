// warden-core/src/interfaces/mod.rs
// ============================================================================
// Module: Warden Interfaces
// Description: Backend-agnostic interfaces for persistence, principals, and filter state.
// Purpose: Define the contract surfaces used by the Warden runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Warden integrates with external systems without
//! embedding backend-specific details. The engine composes queries and
//! decides authorization; the persistence collaborator executes them. The
//! core does not manage transactions, pooling, or retries; those belong to
//! the implementations behind these traits.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::ConditionMap;
use crate::core::EntityName;
use crate::core::FieldName;
use crate::core::Principal;
use crate::core::PrincipalId;
use crate::core::QuerySpec;
use crate::core::Record;
use crate::core::RecordId;

// ============================================================================
// SECTION: Record Store
// ============================================================================

/// Field-level error reported by the persistence collaborator on a rejected
/// write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field the error applies to.
    pub field: FieldName,
    /// Human-readable message.
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Record store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend reported an operational error.
    #[error("record store error: {0}")]
    Backend(String),
    /// Backend rejected a write with field-level validation errors.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),
}

/// Backend-agnostic persistence collaborator for one or more entities.
///
/// Implementations accept composed [`QuerySpec`] values and return or mutate
/// dynamic records. Joins and eager-load hints are executed or ignored at the
/// backend's discretion; predicates, scope, and ordering must be honored.
pub trait RecordStore {
    /// Executes a composed query for an entity's collection.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query cannot be executed.
    fn select(&self, entity: &EntityName, query: &QuerySpec) -> Result<Vec<Record>, StoreError>;

    /// Finds a single record by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn find(&self, entity: &EntityName, id: &RecordId) -> Result<Option<Record>, StoreError>;

    /// Persists a record, assigning an identifier on first save, and returns
    /// the stored form.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when the backend rejects the write.
    fn save(&self, record: &Record) -> Result<Record, StoreError>;

    /// Destroys a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when destruction fails.
    fn destroy(&self, record: &Record) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Principal Source
// ============================================================================

/// Principal store errors.
#[derive(Debug, Error)]
pub enum PrincipalSourceError {
    /// Principal store reported an error.
    #[error("principal source error: {0}")]
    Source(String),
}

/// Lookup surface for principals.
pub trait PrincipalSource {
    /// Finds a principal by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PrincipalSourceError`] when the lookup fails.
    fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, PrincipalSourceError>;
}

// ============================================================================
// SECTION: Filter State Store
// ============================================================================

/// Key addressing sticky filter state: one condition set per principal and
/// entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StickyKey {
    /// Principal the state belongs to.
    pub principal: PrincipalId,
    /// Entity the state filters.
    pub entity: EntityName,
}

impl StickyKey {
    /// Creates a sticky state key.
    #[must_use]
    pub fn new(principal: impl Into<PrincipalId>, entity: impl Into<EntityName>) -> Self {
        Self {
            principal: principal.into(),
            entity: entity.into(),
        }
    }
}

impl fmt::Display for StickyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.principal, self.entity)
    }
}

/// Filter state store errors.
#[derive(Debug, Error)]
pub enum FilterStateError {
    /// Filter state store reported an error.
    #[error("filter state error: {0}")]
    Store(String),
}

/// Sticky condition state persisted across requests.
///
/// Writers replace the entire condition set for a key atomically; independent
/// keys never contend. Expiry is the enclosing session layer's concern.
pub trait FilterStateStore {
    /// Loads the condition set for a key.
    ///
    /// # Errors
    ///
    /// Returns [`FilterStateError`] when the load fails.
    fn load(&self, key: &StickyKey) -> Result<Option<ConditionMap>, FilterStateError>;

    /// Replaces the condition set for a key.
    ///
    /// # Errors
    ///
    /// Returns [`FilterStateError`] when the replace fails.
    fn replace(&self, key: &StickyKey, conditions: ConditionMap) -> Result<(), FilterStateError>;
}
