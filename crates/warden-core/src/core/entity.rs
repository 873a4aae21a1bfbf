// warden-core/src/core/entity.rs
// ============================================================================
// Module: Warden Entity Metadata
// Description: Entity descriptors, field and association metadata, and the registry.
// Purpose: Describe arbitrary entity types so the pipeline can stay generic.
// Dependencies: crate::core::{identifiers, query}, serde
// ============================================================================

//! ## Overview
//! Entity metadata replaces per-model code: every entity type is described by
//! an [`EntityDescriptor`] registered once at startup and shared read-only by
//! all requests. Descriptors are validated at registration time to enforce
//! invariants such as unique field names and resolvable ownership mechanisms.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ActionName;
use crate::core::identifiers::AssociationName;
use crate::core::identifiers::EntityName;
use crate::core::identifiers::FieldName;
use crate::core::identifiers::ScopeName;
use crate::core::query::OrderSpec;

// ============================================================================
// SECTION: Field Metadata
// ============================================================================

/// Kind of a declared entity field, used to translate filter conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form text field; filter conditions match by containment.
    String,
    /// Integer field; filter conditions match by equality.
    Integer,
    /// Boolean field; filter conditions match by equality and the field is
    /// eligible for the toggle operation.
    Boolean,
    /// Foreign-key reference to another entity; matches by equality.
    Reference,
}

/// Declared field on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name.
    pub name: FieldName,
    /// Field kind.
    pub kind: FieldKind,
    /// Whether the field is writable by default.
    pub writable: bool,
}

impl FieldSpec {
    /// Creates a writable field spec.
    #[must_use]
    pub fn new(name: impl Into<FieldName>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            writable: true,
        }
    }
}

// ============================================================================
// SECTION: Association Metadata
// ============================================================================

/// Kind of a declared association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationKind {
    /// This entity holds a foreign key to the target.
    BelongsTo,
    /// The target holds a foreign key to this entity.
    HasMany,
    /// Membership through a join collection.
    ManyToMany,
}

/// Declared association on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationSpec {
    /// Association name.
    pub name: AssociationName,
    /// Association kind.
    pub kind: AssociationKind,
    /// Target entity name.
    pub target: EntityName,
    /// Whether the association is polymorphic. Polymorphic belongs-to
    /// associations are excluded from automatic eager loading.
    pub polymorphic: bool,
}

impl AssociationSpec {
    /// Creates a non-polymorphic association spec.
    #[must_use]
    pub fn new(
        name: impl Into<AssociationName>,
        kind: AssociationKind,
        target: impl Into<EntityName>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            target: target.into(),
            polymorphic: false,
        }
    }
}

// ============================================================================
// SECTION: Ownership Mechanism
// ============================================================================

/// Ownership mechanism declared by an entity.
///
/// At most one mechanism is active per entity; the enum makes a second
/// mechanism unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ownership {
    /// Foreign-key field holding the owning principal's identifier.
    ForeignKey {
        /// Field holding the owner identifier.
        field: FieldName,
    },
    /// Many-to-many association whose membership includes the owners.
    Association {
        /// Association naming the owner collection.
        name: AssociationName,
    },
}

// ============================================================================
// SECTION: Entity Descriptor
// ============================================================================

/// View on which custom actions may be declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Collection listing view.
    Index,
    /// Single-record edit view.
    Edit,
    /// Single-record show view.
    Show,
}

/// Immutable description of a registered entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity name.
    pub name: EntityName,
    /// Declared fields.
    pub fields: Vec<FieldSpec>,
    /// Declared associations.
    pub associations: Vec<AssociationSpec>,
    /// Default ordering applied when a request carries no order directive.
    pub default_order: Option<OrderSpec>,
    /// Ownership mechanism, when ownership filtering is configured.
    pub ownership: Option<Ownership>,
    /// Named scopes the entity declares; requesting any other scope fails.
    pub scopes: BTreeSet<ScopeName>,
    /// Custom actions declared per view.
    pub custom_actions: BTreeMap<View, Vec<ActionName>>,
    /// Marks the entity whose records are principals; targets of this entity
    /// are routed through the self-management sub-policy.
    pub principal_entity: bool,
}

impl EntityDescriptor {
    /// Creates an empty descriptor for the given entity name.
    #[must_use]
    pub fn new(name: impl Into<EntityName>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            associations: Vec::new(),
            default_order: None,
            ownership: None,
            scopes: BTreeSet::new(),
            custom_actions: BTreeMap::new(),
            principal_entity: false,
        }
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &FieldName) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| &field.name == name)
    }

    /// Looks up a declared association by name.
    #[must_use]
    pub fn association(&self, name: &AssociationName) -> Option<&AssociationSpec> {
        self.associations.iter().find(|assoc| &assoc.name == name)
    }

    /// Returns the custom actions declared for a view.
    #[must_use]
    pub fn custom_actions_for(&self, view: View) -> &[ActionName] {
        self.custom_actions.get(&view).map_or(&[], Vec::as_slice)
    }

    /// Returns the associations eligible for automatic eager loading:
    /// every non-polymorphic belongs-to association.
    #[must_use]
    pub fn eager_associations(&self) -> Vec<AssociationName> {
        self.associations
            .iter()
            .filter(|assoc| assoc.kind == AssociationKind::BelongsTo && !assoc.polymorphic)
            .map(|assoc| assoc.name.clone())
            .collect()
    }

    /// Validates the descriptor invariants.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError`] when validation fails.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        ensure_unique_fields(&self.fields)?;
        ensure_unique_associations(&self.associations)?;
        self.ensure_ownership_resolves()?;
        self.ensure_default_order_resolves()?;
        Ok(())
    }

    /// Ensures the ownership mechanism refers to declared metadata.
    fn ensure_ownership_resolves(&self) -> Result<(), DescriptorError> {
        match &self.ownership {
            Some(Ownership::ForeignKey {
                field,
            }) => {
                if self.field(field).is_none() {
                    return Err(DescriptorError::UnknownOwnershipField(field.to_string()));
                }
            }
            Some(Ownership::Association {
                name,
            }) => {
                if self.association(name).is_none() {
                    return Err(DescriptorError::UnknownOwnershipAssociation(name.to_string()));
                }
            }
            None => {}
        }
        Ok(())
    }

    /// Ensures the default order refers to a declared field.
    fn ensure_default_order_resolves(&self) -> Result<(), DescriptorError> {
        if let Some(order) = &self.default_order
            && self.field(&order.field).is_none()
        {
            return Err(DescriptorError::UnknownOrderField(order.field.to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Entity Registry
// ============================================================================

/// Registry mapping entity names to immutable descriptors.
#[derive(Debug, Default, Clone)]
pub struct EntityRegistry {
    /// Registered descriptors keyed by entity name.
    entities: BTreeMap<EntityName, EntityDescriptor>,
}

impl EntityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }

    /// Registers a descriptor after validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the descriptor is invalid, the name is
    /// already registered, or a second principal entity is declared.
    pub fn register(&mut self, descriptor: EntityDescriptor) -> Result<(), RegistryError> {
        descriptor.validate()?;
        if self.entities.contains_key(&descriptor.name) {
            return Err(RegistryError::Duplicate(descriptor.name.to_string()));
        }
        if descriptor.principal_entity
            && let Some(existing) = self.principal_entity()
        {
            return Err(RegistryError::PrincipalEntityConflict(existing.name.to_string()));
        }
        self.entities.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    /// Looks up a descriptor by entity name.
    #[must_use]
    pub fn get(&self, name: &EntityName) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }

    /// Returns the descriptor flagged as the principal entity, when declared.
    #[must_use]
    pub fn principal_entity(&self) -> Option<&EntityDescriptor> {
        self.entities.values().find(|descriptor| descriptor.principal_entity)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Entity descriptor validation errors.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Duplicate field names detected.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
    /// Duplicate association names detected.
    #[error("duplicate association name: {0}")]
    DuplicateAssociation(String),
    /// Ownership foreign key refers to an undeclared field.
    #[error("ownership field is not declared: {0}")]
    UnknownOwnershipField(String),
    /// Ownership association refers to an undeclared association.
    #[error("ownership association is not declared: {0}")]
    UnknownOwnershipAssociation(String),
    /// Default order refers to an undeclared field.
    #[error("default order field is not declared: {0}")]
    UnknownOrderField(String),
}

/// Entity registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Descriptor failed validation.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
    /// Entity name already registered.
    #[error("entity already registered: {0}")]
    Duplicate(String),
    /// A principal entity is already declared.
    #[error("principal entity already declared: {0}")]
    PrincipalEntityConflict(String),
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Ensures field names are unique within a descriptor.
fn ensure_unique_fields(fields: &[FieldSpec]) -> Result<(), DescriptorError> {
    for (index, field) in fields.iter().enumerate() {
        if fields.iter().skip(index + 1).any(|other| other.name == field.name) {
            return Err(DescriptorError::DuplicateField(field.name.to_string()));
        }
    }
    Ok(())
}

/// Ensures association names are unique within a descriptor.
fn ensure_unique_associations(associations: &[AssociationSpec]) -> Result<(), DescriptorError> {
    for (index, assoc) in associations.iter().enumerate() {
        if associations.iter().skip(index + 1).any(|other| other.name == assoc.name) {
            return Err(DescriptorError::DuplicateAssociation(assoc.name.to_string()));
        }
    }
    Ok(())
}
