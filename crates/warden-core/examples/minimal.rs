// crates/warden-core/examples/minimal.rs
// ============================================================================
// Module: Warden Minimal Example
// Description: Minimal end-to-end pipeline run using in-memory collaborators.
// Purpose: Demonstrate registration, authorization, and scoped listing.
// Dependencies: warden-core
// ============================================================================

//! ## Overview
//! Runs a minimal Warden flow: registers an entity, grants permissions,
//! resolves a principal, creates a record, and lists it under the composed
//! scope. Backend-agnostic and suitable for quick verification.

use std::collections::BTreeMap;

use serde_json::json;
use warden_core::ActionName;
use warden_core::AttributeProtectionPolicy;
use warden_core::AuthorizationEngine;
use warden_core::EntityDescriptor;
use warden_core::EntityName;
use warden_core::EntityRegistry;
use warden_core::FieldKind;
use warden_core::FieldName;
use warden_core::FieldSpec;
use warden_core::InMemoryFilterStateStore;
use warden_core::InMemoryPrincipalSource;
use warden_core::InMemoryRecordStore;
use warden_core::Ownership;
use warden_core::PermissionMatrix;
use warden_core::Pipeline;
use warden_core::Principal;
use warden_core::PrincipalId;
use warden_core::RequestDirectives;
use warden_core::SharedFilterStateStore;
use warden_core::Submission;
use warden_core::resolve_principal;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ExampleError {}

/// Builds the project entity descriptor used by the example.
fn build_descriptor() -> EntityDescriptor {
    let mut descriptor = EntityDescriptor::new("projects");
    descriptor.fields.push(FieldSpec::new("title", FieldKind::String));
    descriptor.fields.push(FieldSpec::new("archived", FieldKind::Boolean));
    descriptor.fields.push(FieldSpec::new("owner_id", FieldKind::Reference));
    descriptor.ownership = Some(Ownership::ForeignKey {
        field: FieldName::new("owner_id"),
    });
    descriptor
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut matrix = PermissionMatrix::new();
    matrix.set_root_role("admin");
    matrix.grant(
        "editor",
        "projects",
        [ActionName::new("index"), ActionName::new("show"), ActionName::new("create")],
    );

    let mut registry = EntityRegistry::new();
    registry.register(build_descriptor())?;

    let source = InMemoryPrincipalSource::new();
    source.insert(Principal::new("2", "editor"))?;
    let principal = resolve_principal(&source, &PrincipalId::new("2"), &matrix)?;

    let pipeline = Pipeline::new(
        registry,
        AuthorizationEngine::new(matrix),
        AttributeProtectionPolicy::new(),
        InMemoryRecordStore::new(),
        SharedFilterStateStore::from_store(InMemoryFilterStateStore::new()),
    );

    let entity = EntityName::new("projects");
    let mut attributes = BTreeMap::new();
    attributes.insert(FieldName::new("title"), json!("launch checklist"));
    let created = pipeline.create(&principal, &entity, &Submission::new(attributes))?;

    let mut directives = RequestDirectives::new();
    directives.conditions.insert(FieldName::new("title"), json!("launch"));
    let rows = pipeline.list(&principal, &entity, &directives)?;
    if rows.first().map(|row| row.id.clone()) != Some(created.id) {
        return Err(Box::new(ExampleError("created record should be listed for its owner")));
    }
    Ok(())
}
