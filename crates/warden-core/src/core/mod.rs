// warden-core/src/core/mod.rs
// ============================================================================
// Module: Warden Core Types
// Description: Canonical Warden metadata, permission, and query structures.
// Purpose: Provide stable, serializable types for authorization and scoping.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Warden core types define entity metadata, the permission matrix, attribute
//! protection, dynamic records, and query specifications. These types are the
//! canonical source of truth for any request-handling surface built on top of
//! the engine.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod attributes;
pub mod entity;
pub mod identifiers;
pub mod matrix;
pub mod principal;
pub mod query;
pub mod record;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use attributes::AttributeProtectionPolicy;
pub use attributes::AttributeWriteSet;
pub use attributes::FieldAccess;
pub use attributes::Submission;
pub use entity::AssociationKind;
pub use entity::AssociationSpec;
pub use entity::DescriptorError;
pub use entity::EntityDescriptor;
pub use entity::EntityRegistry;
pub use entity::FieldKind;
pub use entity::FieldSpec;
pub use entity::Ownership;
pub use entity::RegistryError;
pub use entity::View;
pub use identifiers::ActionName;
pub use identifiers::AssociationName;
pub use identifiers::EntityName;
pub use identifiers::FieldName;
pub use identifiers::PrincipalId;
pub use identifiers::RecordId;
pub use identifiers::RoleName;
pub use identifiers::ScopeName;
pub use matrix::PermissionMatrix;
pub use matrix::ResourcePermissions;
pub use principal::Principal;
pub use principal::PrincipalStatus;
pub use query::ConditionMap;
pub use query::OrderSpec;
pub use query::Predicate;
pub use query::PredicateOp;
pub use query::QuerySpec;
pub use query::RequestDirectives;
pub use query::SortDirection;
pub use record::Record;
pub use record::scalar_text;
