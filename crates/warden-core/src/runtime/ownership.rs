// warden-core/src/runtime/ownership.rs
// ============================================================================
// Module: Warden Ownership Policy
// Description: Record-level ownership checks and collection-level narrowing.
// Purpose: Restrict non-root principals to records they own when configured.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Ownership applies only when the acting principal is not root and the
//! entity declares an ownership mechanism. Record-level checks honor both the
//! foreign-key and the association mechanism; collection-level narrowing
//! honors only the foreign-key form. That asymmetry is deliberate; do not
//! unify the two paths.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::EntityDescriptor;
use crate::core::Ownership;
use crate::core::PermissionMatrix;
use crate::core::Predicate;
use crate::core::Principal;
use crate::core::QuerySpec;
use crate::core::Record;
use crate::core::scalar_text;

// ============================================================================
// SECTION: Record-Level Check
// ============================================================================

/// Returns whether the principal may access a single record under the
/// entity's ownership mechanism.
///
/// Root principals and entities without a declared mechanism always pass.
/// A foreign-key mechanism requires the field value's canonical scalar text
/// to equal the principal id, the same rule stores apply when filtering, so
/// a numeric foreign key matches a string principal id. An association
/// mechanism requires the principal to appear in the member list.
#[must_use]
pub fn permits_access(
    matrix: &PermissionMatrix,
    principal: &Principal,
    entity: &EntityDescriptor,
    record: &Record,
) -> bool {
    if matrix.is_root(principal) {
        return true;
    }
    match &entity.ownership {
        None => true,
        Some(Ownership::ForeignKey {
            field,
        }) => record
            .get(field)
            .and_then(scalar_text)
            .is_some_and(|owner| owner == principal.id.as_str()),
        Some(Ownership::Association {
            name,
        }) => record
            .association_members(name)
            .iter()
            .any(|member| member == principal.id.as_str()),
    }
}

// ============================================================================
// SECTION: Collection-Level Narrowing
// ============================================================================

/// Appends the ownership equality predicate to a composed query for non-root
/// principals.
///
/// Only the foreign-key mechanism narrows collections. Association ownership
/// is checked record-by-record in [`permits_access`] but is not propagated
/// here; members see the unfiltered listing and are gated per record.
pub fn narrow_to_owner(
    query: &mut QuerySpec,
    matrix: &PermissionMatrix,
    principal: &Principal,
    entity: &EntityDescriptor,
) {
    if matrix.is_root(principal) {
        return;
    }
    if let Some(Ownership::ForeignKey {
        field,
    }) = &entity.ownership
    {
        query.push_predicate(Predicate::equals(
            field.clone(),
            Value::String(principal.id.to_string()),
        ));
    }
}
