// warden-config/src/lib.rs
// ============================================================================
// Module: Warden Config Library
// Description: Canonical role-configuration model and validation.
// Purpose: Single source of truth for warden.toml semantics.
// Dependencies: warden-core, serde, toml
// ============================================================================

//! ## Overview
//! `warden-config` defines the canonical role-configuration model for
//! Warden. It provides strict, fail-closed validation and builds the
//! permission matrix and attribute protection policy consumed by the engine.
//! Role configuration is loaded once at process start and read-only
//! thereafter.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::RoleConfig;
pub use config::WardenConfig;
