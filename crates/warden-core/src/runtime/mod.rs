// warden-core/src/runtime/mod.rs
// ============================================================================
// Module: Warden Runtime
// Description: Authorization engine, ownership policy, scope builder, and pipeline.
// Purpose: Execute authorization and query-scope decisions over the core types.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The runtime evaluates requests: the authorization engine and ownership
//! policy decide access, the scope builder composes collection queries, and
//! the pipeline orchestrates the whole flow over collaborator interfaces.
//! In-memory collaborator implementations back tests and examples.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod authorizer;
pub mod memory;
pub mod ownership;
pub mod pipeline;
pub mod scope;
pub mod sticky;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use authorizer::AuthorizationEngine;
pub use authorizer::AuthorizationError;
pub use authorizer::Decision;
pub use authorizer::resolve_principal;
pub use memory::InMemoryPrincipalSource;
pub use memory::InMemoryRecordStore;
pub use ownership::narrow_to_owner;
pub use ownership::permits_access;
pub use pipeline::ACTION_CREATE;
pub use pipeline::ACTION_DESTROY;
pub use pipeline::ACTION_INDEX;
pub use pipeline::ACTION_SHOW;
pub use pipeline::ACTION_TOGGLE;
pub use pipeline::ACTION_UPDATE;
pub use pipeline::Pipeline;
pub use pipeline::PipelineError;
pub use scope::QueryError;
pub use scope::build_scope;
pub use sticky::InMemoryFilterStateStore;
pub use sticky::SharedFilterStateStore;
