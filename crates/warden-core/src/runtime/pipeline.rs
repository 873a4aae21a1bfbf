// warden-core/src/runtime/pipeline.rs
// ============================================================================
// Module: Warden Resource Operation Pipeline
// Description: Generic CRUD-plus-toggle flow over registered entities.
// Purpose: Orchestrate authorization, ownership, scoping, and attribute filtering.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The pipeline is the single canonical execution path for resource
//! operations. Every operation resolves entity metadata and authorizes
//! before touching data; record-scoped operations additionally pass the
//! ownership gate. Authorization and ownership denials are indistinguishable
//! at the response level: both surface as the uniform
//! [`PipelineError::NotAllowed`], leaking nothing about why.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::ActionName;
use crate::core::AttributeProtectionPolicy;
use crate::core::EntityDescriptor;
use crate::core::EntityName;
use crate::core::EntityRegistry;
use crate::core::FieldKind;
use crate::core::FieldName;
use crate::core::Ownership;
use crate::core::Principal;
use crate::core::Record;
use crate::core::RecordId;
use crate::core::RequestDirectives;
use crate::core::Submission;
use crate::core::View;
use crate::interfaces::FieldError;
use crate::interfaces::FilterStateStore;
use crate::interfaces::RecordStore;
use crate::interfaces::StoreError;
use crate::runtime::authorizer::AuthorizationEngine;
use crate::runtime::authorizer::AuthorizationError;
use crate::runtime::authorizer::Decision;
use crate::runtime::ownership::permits_access;
use crate::runtime::scope::QueryError;
use crate::runtime::scope::build_scope;

// ============================================================================
// SECTION: Action Names
// ============================================================================

/// Collection listing action.
pub const ACTION_INDEX: &str = "index";
/// Single-record read action.
pub const ACTION_SHOW: &str = "show";
/// Record creation action.
pub const ACTION_CREATE: &str = "create";
/// Record update action.
pub const ACTION_UPDATE: &str = "update";
/// Record destruction action.
pub const ACTION_DESTROY: &str = "destroy";
/// Boolean field toggle action.
pub const ACTION_TOGGLE: &str = "toggle";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Resource operation pipeline errors.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Authorization or ownership denied the request. Uniform and
    /// non-specific by design.
    #[error("not allowed")]
    NotAllowed,
    /// Requested scope is not declared on the entity. Terminal.
    #[error("requested scope is not permitted: {0}")]
    ScopeNotPermitted(String),
    /// Persistence rejected a write; recoverable, the caller re-presents the
    /// input with the field errors attached.
    #[error("validation failed on {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),
    /// Principal must be treated as unauthenticated.
    #[error("principal role is not configured or account is disabled")]
    PrincipalInvalid,
    /// Entity name is not registered.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    /// Record does not exist.
    #[error("record not found: {0}")]
    RecordNotFound(String),
    /// Toggle requested on a field that is not a declared boolean.
    #[error("field is not toggleable: {0}")]
    InvalidToggleField(String),
    /// Query composition failed.
    #[error("query error: {0}")]
    Query(String),
    /// Collaborator reported an operational error.
    #[error("store error: {0}")]
    Store(String),
}

impl From<AuthorizationError> for PipelineError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::PrincipalInvalid => Self::PrincipalInvalid,
            AuthorizationError::Source(source) => Self::Store(source.to_string()),
        }
    }
}

impl From<QueryError> for PipelineError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::ScopeNotPermitted(scope) => Self::ScopeNotPermitted(scope),
            QueryError::UnknownAssociation(_) => Self::Query(err.to_string()),
            QueryError::FilterState(state) => Self::Store(state.to_string()),
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => Self::ValidationFailed(errors),
            StoreError::Backend(message) => Self::Store(message),
        }
    }
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Generic resource operation pipeline over collaborator interfaces.
pub struct Pipeline<R, F> {
    /// Registered entity metadata.
    registry: EntityRegistry,
    /// Authorization engine and permission matrix.
    engine: AuthorizationEngine,
    /// Attribute protection policy applied to mutations.
    attributes: AttributeProtectionPolicy,
    /// Persistence collaborator.
    records: R,
    /// Sticky filter state store.
    filters: F,
}

impl<R, F> Pipeline<R, F>
where
    R: RecordStore,
    F: FilterStateStore,
{
    /// Creates a pipeline over the given collaborators.
    #[must_use]
    pub const fn new(
        registry: EntityRegistry,
        engine: AuthorizationEngine,
        attributes: AttributeProtectionPolicy,
        records: R,
        filters: F,
    ) -> Self {
        Self {
            registry,
            engine,
            attributes,
            records,
            filters,
        }
    }

    /// Returns the authorization engine.
    #[must_use]
    pub const fn engine(&self) -> &AuthorizationEngine {
        &self.engine
    }

    /// Returns the entity registry.
    #[must_use]
    pub const fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Lists the records visible to the principal under the composed scope.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] on denial, undeclared scope, or store
    /// failure.
    pub fn list(
        &self,
        principal: &Principal,
        entity: &EntityName,
        directives: &RequestDirectives,
    ) -> Result<Vec<Record>, PipelineError> {
        let descriptor = self.descriptor(entity)?;
        let decision =
            self.engine.authorize(principal, descriptor, &ActionName::new(ACTION_INDEX), None)?;
        ensure_allowed(&decision)?;
        let query =
            build_scope(descriptor, self.engine.matrix(), principal, directives, &self.filters)?;
        Ok(self.records.select(entity, &query)?)
    }

    /// Reads a single record after the authorization and ownership gates.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] on denial or when the record is missing.
    pub fn read(
        &self,
        principal: &Principal,
        entity: &EntityName,
        id: &RecordId,
    ) -> Result<Record, PipelineError> {
        let descriptor = self.descriptor(entity)?;
        self.gate_record(principal, descriptor, ACTION_SHOW, id)
    }

    /// Creates a record from a filtered submission.
    ///
    /// When the entity declares foreign-key ownership, the ownership field is
    /// stamped with the acting principal's identifier before the write.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ValidationFailed`] when persistence rejects
    /// the write, or [`PipelineError`] on denial.
    pub fn create(
        &self,
        principal: &Principal,
        entity: &EntityName,
        submission: &Submission,
    ) -> Result<Record, PipelineError> {
        let descriptor = self.descriptor(entity)?;
        let decision =
            self.engine.authorize(principal, descriptor, &ActionName::new(ACTION_CREATE), None)?;
        ensure_allowed(&decision)?;

        let access = self.attributes.writable_fields(&principal.role, entity);
        let write_set = AttributeProtectionPolicy::filter_submission(
            &submission.effective_attributes(),
            &access,
        );
        let mut record = Record::new(entity.clone(), "");
        for (field, value) in write_set.values {
            record.set(field, value);
        }
        if let Some(Ownership::ForeignKey {
            field,
        }) = &descriptor.ownership
        {
            record.set(field.clone(), Value::String(principal.id.to_string()));
        }
        Ok(self.records.save(&record)?)
    }

    /// Updates a record from a filtered submission.
    ///
    /// A non-root update of an entity with foreign-key ownership re-stamps
    /// the ownership field with the acting principal's identifier, so
    /// non-root principals cannot reassign records they own.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ValidationFailed`] when persistence rejects
    /// the write, or [`PipelineError`] on denial.
    pub fn update(
        &self,
        principal: &Principal,
        entity: &EntityName,
        id: &RecordId,
        submission: &Submission,
    ) -> Result<Record, PipelineError> {
        let descriptor = self.descriptor(entity)?;
        let mut record = self.gate_record(principal, descriptor, ACTION_UPDATE, id)?;

        let access = self.attributes.writable_fields(&principal.role, entity);
        let write_set = AttributeProtectionPolicy::filter_submission(
            &submission.effective_attributes(),
            &access,
        );
        for (field, value) in write_set.values {
            record.set(field, value);
        }
        if !self.engine.matrix().is_root(principal)
            && let Some(Ownership::ForeignKey {
                field,
            }) = &descriptor.ownership
        {
            record.set(field.clone(), Value::String(principal.id.to_string()));
        }
        Ok(self.records.save(&record)?)
    }

    /// Destroys a record after the authorization and ownership gates.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] on denial or store failure.
    pub fn delete(
        &self,
        principal: &Principal,
        entity: &EntityName,
        id: &RecordId,
    ) -> Result<(), PipelineError> {
        let descriptor = self.descriptor(entity)?;
        let record = self.gate_record(principal, descriptor, ACTION_DESTROY, id)?;
        Ok(self.records.destroy(&record)?)
    }

    /// Flips a declared boolean field on a record and persists it.
    ///
    /// A missing attribute toggles to true. Persistence rejection surfaces
    /// as [`PipelineError::ValidationFailed`], not a denial.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidToggleField`] when the field is not a
    /// declared boolean, or [`PipelineError`] on denial or store failure.
    pub fn toggle_field(
        &self,
        principal: &Principal,
        entity: &EntityName,
        id: &RecordId,
        field: &FieldName,
    ) -> Result<Record, PipelineError> {
        let descriptor = self.descriptor(entity)?;
        let declared = descriptor.field(field);
        if !declared.is_some_and(|spec| spec.kind == FieldKind::Boolean) {
            return Err(PipelineError::InvalidToggleField(field.to_string()));
        }
        let mut record = self.gate_record(principal, descriptor, ACTION_TOGGLE, id)?;
        let current = record.bool_field(field).unwrap_or(false);
        record.set(field.clone(), Value::Bool(!current));
        Ok(self.records.save(&record)?)
    }

    /// Lists the custom actions declared for a view, narrowed to those the
    /// acting role may perform.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::PrincipalInvalid`] for unauthenticated
    /// principals or [`PipelineError::UnknownEntity`] for unknown entities.
    pub fn custom_actions(
        &self,
        principal: &Principal,
        entity: &EntityName,
        view: View,
    ) -> Result<Vec<ActionName>, PipelineError> {
        let descriptor = self.descriptor(entity)?;
        self.engine.ensure_authenticated(principal)?;
        Ok(descriptor
            .custom_actions_for(view)
            .iter()
            .filter(|action| {
                self.engine.matrix().allowed(&principal.role, entity.as_str(), action)
            })
            .cloned()
            .collect())
    }

    /// Resolves a registered entity descriptor.
    fn descriptor(&self, entity: &EntityName) -> Result<&EntityDescriptor, PipelineError> {
        self.registry
            .get(entity)
            .ok_or_else(|| PipelineError::UnknownEntity(entity.to_string()))
    }

    /// Fetches a record behind the authorization and ownership gates.
    ///
    /// For non-principal entities the matrix gate runs before the fetch; for
    /// the principal entity the self-management table needs the target, so
    /// the decision runs against the fetched record.
    fn gate_record(
        &self,
        principal: &Principal,
        descriptor: &EntityDescriptor,
        action: &str,
        id: &RecordId,
    ) -> Result<Record, PipelineError> {
        let action = ActionName::new(action);
        if !descriptor.principal_entity {
            let decision = self.engine.authorize(principal, descriptor, &action, None)?;
            ensure_allowed(&decision)?;
        }
        let record = self
            .records
            .find(&descriptor.name, id)?
            .ok_or_else(|| PipelineError::RecordNotFound(id.to_string()))?;
        if descriptor.principal_entity {
            let decision = self.engine.authorize(principal, descriptor, &action, Some(&record))?;
            ensure_allowed(&decision)?;
        }
        if !permits_access(self.engine.matrix(), principal, descriptor, &record) {
            return Err(PipelineError::NotAllowed);
        }
        Ok(record)
    }
}

/// Maps a deny decision to the uniform denial error, discarding the internal
/// reason.
fn ensure_allowed(decision: &Decision) -> Result<(), PipelineError> {
    if decision.is_allowed() {
        Ok(())
    } else {
        Err(PipelineError::NotAllowed)
    }
}
