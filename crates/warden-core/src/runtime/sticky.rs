// warden-core/src/runtime/sticky.rs
// ============================================================================
// Module: Warden In-Memory Filter State
// Description: In-memory sticky filter store plus a shared trait-object wrapper.
// Purpose: Provide a deterministic filter state store without external deps.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides the in-memory implementation of [`FilterStateStore`]
//! used by tests, examples, and single-process deployments. Whole condition
//! sets are replaced atomically per key under one mutex; independent keys
//! never observe a partially merged state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::ConditionMap;
use crate::interfaces::FilterStateError;
use crate::interfaces::FilterStateStore;
use crate::interfaces::StickyKey;

// ============================================================================
// SECTION: In-Memory Filter State Store
// ============================================================================

/// In-memory sticky filter state store.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFilterStateStore {
    /// Condition sets keyed by principal and entity, protected by a mutex.
    state: Arc<Mutex<BTreeMap<String, ConditionMap>>>,
}

impl InMemoryFilterStateStore {
    /// Creates an empty filter state store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl FilterStateStore for InMemoryFilterStateStore {
    fn load(&self, key: &StickyKey) -> Result<Option<ConditionMap>, FilterStateError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| FilterStateError::Store("filter state mutex poisoned".to_string()))?;
        Ok(guard.get(&key.to_string()).cloned())
    }

    fn replace(&self, key: &StickyKey, conditions: ConditionMap) -> Result<(), FilterStateError> {
        self.state
            .lock()
            .map_err(|_| FilterStateError::Store("filter state mutex poisoned".to_string()))?
            .insert(key.to_string(), conditions);
        Ok(())
    }
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared filter state store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedFilterStateStore {
    /// Inner store implementation.
    inner: Arc<dyn FilterStateStore + Send + Sync>,
}

impl SharedFilterStateStore {
    /// Wraps a filter state store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl FilterStateStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn FilterStateStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl FilterStateStore for SharedFilterStateStore {
    fn load(&self, key: &StickyKey) -> Result<Option<ConditionMap>, FilterStateError> {
        self.inner.load(key)
    }

    fn replace(&self, key: &StickyKey, conditions: ConditionMap) -> Result<(), FilterStateError> {
        self.inner.replace(key, conditions)
    }
}
