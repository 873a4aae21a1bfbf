// warden-core/src/lib.rs
// ============================================================================
// Module: Warden Core Library
// Description: Public API surface for the Warden authorization and query-scope engine.
// Purpose: Expose core types, interfaces, and runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Warden core provides role-based authorization, ownership-based record
//! filtering, dynamic query-scope composition, and attribute-level write
//! protection over an open-ended set of registered entities. It is
//! backend-agnostic and integrates through explicit interfaces rather than
//! embedding into a web or persistence framework.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::FieldError;
pub use interfaces::FilterStateError;
pub use interfaces::FilterStateStore;
pub use interfaces::PrincipalSource;
pub use interfaces::PrincipalSourceError;
pub use interfaces::RecordStore;
pub use interfaces::StickyKey;
pub use interfaces::StoreError;
pub use runtime::AuthorizationEngine;
pub use runtime::AuthorizationError;
pub use runtime::Decision;
pub use runtime::InMemoryFilterStateStore;
pub use runtime::InMemoryPrincipalSource;
pub use runtime::InMemoryRecordStore;
pub use runtime::Pipeline;
pub use runtime::PipelineError;
pub use runtime::QueryError;
pub use runtime::SharedFilterStateStore;
pub use runtime::build_scope;
pub use runtime::narrow_to_owner;
pub use runtime::permits_access;
pub use runtime::resolve_principal;
