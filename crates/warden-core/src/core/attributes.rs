// warden-core/src/core/attributes.rs
// ============================================================================
// Module: Warden Attribute Protection
// Description: Per-role writable-field whitelists and submission filtering.
// Purpose: Narrow submitted attributes to the writable set without ever erroring.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! Attribute protection is deliberately fail-open: a role with no registered
//! whitelist for an entity writes without restriction, so resources that were
//! never explicitly configured stay usable. When a whitelist exists, fields
//! outside it are silently dropped from the submission. A write to a
//! forbidden field is a no-op, never a rejection; this asymmetry with the
//! hard-failing scope validation is intentional and must not be unified.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::EntityName;
use crate::core::identifiers::FieldName;
use crate::core::identifiers::RoleName;

// ============================================================================
// SECTION: Field Access
// ============================================================================

/// Writable-field decision for a role and entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldAccess {
    /// No whitelist registered; every submitted field is writable.
    Unrestricted,
    /// Only the listed fields are writable.
    Whitelist {
        /// Writable field names.
        fields: BTreeSet<FieldName>,
    },
}

/// Filtered attribute set permitted for a single mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeWriteSet {
    /// Permitted attribute values keyed by field name.
    pub values: BTreeMap<FieldName, Value>,
}

impl AttributeWriteSet {
    /// Returns whether the write set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// SECTION: Submissions
// ============================================================================

/// Submitted attributes for a create or update operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Submitted attribute values keyed by field name.
    pub attributes: BTreeMap<FieldName, Value>,
    /// When set, the submission nulls out this single field instead of
    /// carrying the attribute map.
    pub nullify: Option<FieldName>,
}

impl Submission {
    /// Creates a submission from an attribute map.
    #[must_use]
    pub fn new(attributes: BTreeMap<FieldName, Value>) -> Self {
        Self {
            attributes,
            nullify: None,
        }
    }

    /// Creates a submission that nulls out a single field.
    #[must_use]
    pub fn nullify(field: impl Into<FieldName>) -> Self {
        Self {
            attributes: BTreeMap::new(),
            nullify: Some(field.into()),
        }
    }

    /// Returns the effective attribute map: the nullify field mapped to JSON
    /// null when present, otherwise the submitted attributes.
    #[must_use]
    pub fn effective_attributes(&self) -> BTreeMap<FieldName, Value> {
        self.nullify.as_ref().map_or_else(
            || self.attributes.clone(),
            |field| {
                let mut map = BTreeMap::new();
                map.insert(field.clone(), Value::Null);
                map
            },
        )
    }
}

// ============================================================================
// SECTION: Attribute Protection Policy
// ============================================================================

/// Per-role attribute whitelists keyed by role and entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeProtectionPolicy {
    /// Registered whitelists keyed by (role, entity).
    whitelists: BTreeMap<(RoleName, EntityName), BTreeSet<FieldName>>,
}

impl AttributeProtectionPolicy {
    /// Creates an empty policy with protection disabled everywhere.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a whitelist for a role and entity. Registering merges with
    /// any existing whitelist for the same pair.
    pub fn allow(
        &mut self,
        role: impl Into<RoleName>,
        entity: impl Into<EntityName>,
        fields: impl IntoIterator<Item = FieldName>,
    ) {
        let entry = self.whitelists.entry((role.into(), entity.into())).or_default();
        entry.extend(fields);
    }

    /// Returns the writable-field decision for a role and entity. Absent
    /// registration yields [`FieldAccess::Unrestricted`].
    #[must_use]
    pub fn writable_fields(&self, role: &RoleName, entity: &EntityName) -> FieldAccess {
        self.whitelists.get(&(role.clone(), entity.clone())).map_or(
            FieldAccess::Unrestricted,
            |fields| FieldAccess::Whitelist {
                fields: fields.clone(),
            },
        )
    }

    /// Filters a submission down to the permitted write set. Disallowed
    /// fields are dropped silently; this never errors.
    #[must_use]
    pub fn filter_submission(
        attributes: &BTreeMap<FieldName, Value>,
        access: &FieldAccess,
    ) -> AttributeWriteSet {
        let values = match access {
            FieldAccess::Unrestricted => attributes.clone(),
            FieldAccess::Whitelist {
                fields,
            } => attributes
                .iter()
                .filter(|(field, _)| fields.contains(*field))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        };
        AttributeWriteSet {
            values,
        }
    }
}
