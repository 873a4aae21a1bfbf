// crates/warden-core/tests/ownership.rs
// ============================================================================
// Module: Ownership Policy Tests
// Description: Record-level ownership checks and collection narrowing.
// ============================================================================
//! ## Overview
//! Validates the foreign-key and association ownership mechanisms, the root
//! bypass, and the foreign-key-only narrowing of composed queries.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap on deterministic fixtures.")]

use serde_json::Value;
use serde_json::json;
use warden_core::AssociationKind;
use warden_core::AssociationSpec;
use warden_core::EntityDescriptor;
use warden_core::FieldKind;
use warden_core::FieldSpec;
use warden_core::Ownership;
use warden_core::PermissionMatrix;
use warden_core::Predicate;
use warden_core::Principal;
use warden_core::QuerySpec;
use warden_core::Record;
use warden_core::narrow_to_owner;
use warden_core::permits_access;

fn matrix() -> PermissionMatrix {
    let mut matrix = PermissionMatrix::new();
    matrix.set_root_role("admin");
    matrix
}

fn foreign_key_entity() -> EntityDescriptor {
    let mut descriptor = EntityDescriptor::new("projects");
    descriptor.fields.push(FieldSpec::new("owner_id", FieldKind::Reference));
    descriptor.ownership = Some(Ownership::ForeignKey {
        field: "owner_id".into(),
    });
    descriptor
}

fn association_entity() -> EntityDescriptor {
    let mut descriptor = EntityDescriptor::new("boards");
    descriptor.associations.push(AssociationSpec::new(
        "members",
        AssociationKind::ManyToMany,
        "accounts",
    ));
    descriptor.ownership = Some(Ownership::Association {
        name: "members".into(),
    });
    descriptor
}

#[test]
fn foreign_key_ownership_admits_the_owner() {
    let editor = Principal::new("2", "editor");
    let mut record = Record::new("projects", "10");
    record.set("owner_id", json!("2"));
    assert!(permits_access(&matrix(), &editor, &foreign_key_entity(), &record));
}

#[test]
fn foreign_key_ownership_admits_numeric_owner_values() {
    // Backends that store foreign keys as numbers must pass the same gate
    // that admits string-valued keys.
    let editor = Principal::new("2", "editor");
    let mut record = Record::new("projects", "10");
    record.set("owner_id", json!(2));
    assert!(permits_access(&matrix(), &editor, &foreign_key_entity(), &record));
}

#[test]
fn foreign_key_ownership_rejects_non_owners() {
    let editor = Principal::new("2", "editor");
    let mut record = Record::new("projects", "10");
    record.set("owner_id", json!("7"));
    assert!(!permits_access(&matrix(), &editor, &foreign_key_entity(), &record));
}

#[test]
fn missing_ownership_field_rejects_non_root() {
    let editor = Principal::new("2", "editor");
    let record = Record::new("projects", "10");
    assert!(!permits_access(&matrix(), &editor, &foreign_key_entity(), &record));
}

#[test]
fn association_ownership_admits_members() {
    let editor = Principal::new("2", "editor");
    let mut record = Record::new("boards", "4");
    record.set("members", json!(["2", "5"]));
    assert!(permits_access(&matrix(), &editor, &association_entity(), &record));
}

#[test]
fn association_ownership_rejects_non_members() {
    let editor = Principal::new("2", "editor");
    let mut record = Record::new("boards", "4");
    record.set("members", json!(["5", "9"]));
    assert!(!permits_access(&matrix(), &editor, &association_entity(), &record));
}

#[test]
fn root_bypasses_both_mechanisms() {
    let root = Principal::new("1", "admin");
    let record = Record::new("projects", "10");
    assert!(permits_access(&matrix(), &root, &foreign_key_entity(), &record));
    let record = Record::new("boards", "4");
    assert!(permits_access(&matrix(), &root, &association_entity(), &record));
}

#[test]
fn entity_without_mechanism_admits_everyone() {
    let editor = Principal::new("2", "editor");
    let record = Record::new("notes", "1");
    let descriptor = EntityDescriptor::new("notes");
    assert!(permits_access(&matrix(), &editor, &descriptor, &record));
}

#[test]
fn narrowing_appends_owner_predicate_for_non_root() {
    let editor = Principal::new("2", "editor");
    let mut query = QuerySpec::new();
    narrow_to_owner(&mut query, &matrix(), &editor, &foreign_key_entity());
    let expected = Predicate::equals("owner_id", Value::String("2".to_string()));
    assert_eq!(query.predicates, vec![expected]);
}

#[test]
fn narrowing_skips_root() {
    let root = Principal::new("1", "admin");
    let mut query = QuerySpec::new();
    narrow_to_owner(&mut query, &matrix(), &root, &foreign_key_entity());
    assert!(query.predicates.is_empty());
}

#[test]
fn narrowing_skips_association_ownership() {
    // Association membership gates single records but never narrows
    // collections; members see the unfiltered listing.
    let editor = Principal::new("2", "editor");
    let mut query = QuerySpec::new();
    narrow_to_owner(&mut query, &matrix(), &editor, &association_entity());
    assert!(query.predicates.is_empty());
}
