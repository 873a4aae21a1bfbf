// warden-core/src/core/record.rs
// ============================================================================
// Module: Warden Records
// Description: Dynamic record representation with typed entity binding.
// Purpose: Carry attribute values for arbitrary entities without per-model types.
// Dependencies: crate::core::identifiers, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Record`] is the dynamic unit the pipeline reads and writes: an entity
//! name, a record identifier, and an attribute map of JSON values. Ownership
//! checks read the ownership foreign key or association membership straight
//! from the attribute map, so no per-entity accessor code is required.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::AssociationName;
use crate::core::identifiers::EntityName;
use crate::core::identifiers::FieldName;
use crate::core::identifiers::RecordId;

// ============================================================================
// SECTION: Record
// ============================================================================

/// Dynamic record for a registered entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Entity the record belongs to.
    pub entity: EntityName,
    /// Record identifier.
    pub id: RecordId,
    /// Attribute values keyed by field name. Association membership used for
    /// ownership checks is stored as an array-valued attribute under the
    /// association name.
    pub attributes: BTreeMap<FieldName, Value>,
}

impl Record {
    /// Creates a record with an empty attribute map.
    #[must_use]
    pub fn new(entity: impl Into<EntityName>, id: impl Into<RecordId>) -> Self {
        Self {
            entity: entity.into(),
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Returns an attribute value by field name.
    #[must_use]
    pub fn get(&self, field: &FieldName) -> Option<&Value> {
        self.attributes.get(field)
    }

    /// Sets an attribute value.
    pub fn set(&mut self, field: impl Into<FieldName>, value: Value) {
        self.attributes.insert(field.into(), value);
    }

    /// Reads a boolean-like attribute. Accepts JSON booleans directly and the
    /// same string forms condition normalization accepts: `"true"` / `"1"`
    /// and `"false"` / `"0"`.
    #[must_use]
    pub fn bool_field(&self, field: &FieldName) -> Option<bool> {
        match self.attributes.get(field)? {
            Value::Bool(value) => Some(*value),
            Value::String(value) => match value.as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the member identifiers of an array-valued association
    /// attribute. Non-string members are skipped.
    #[must_use]
    pub fn association_members(&self, name: &AssociationName) -> Vec<String> {
        let key = FieldName::new(name.as_str());
        match self.attributes.get(&key) {
            Some(Value::Array(members)) => members
                .iter()
                .filter_map(|member| member.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

// ============================================================================
// SECTION: Scalar Coercion
// ============================================================================

/// Canonical text form for scalar JSON values: strings as-is, numbers and
/// booleans through their display form. Non-scalars yield `None`.
///
/// Every comparison between stored attribute values and request or principal
/// strings goes through this rule so that collection filtering and
/// record-level gates agree about the same record.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
