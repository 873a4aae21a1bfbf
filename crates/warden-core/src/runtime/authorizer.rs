// warden-core/src/runtime/authorizer.rs
// ============================================================================
// Module: Warden Authorization Engine
// Description: Permission evaluation and the self-management decision table.
// Purpose: Produce allow/deny decisions per request, revalidating the principal.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The authorization engine combines the permission matrix with the
//! self-management sub-policy applied when the target record belongs to the
//! principal entity. Decisions are computed fresh per request and never
//! persisted. A principal whose role is no longer configured, or whose
//! account is disabled, is rejected as unauthenticated before any decision is
//! made.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ActionName;
use crate::core::EntityDescriptor;
use crate::core::PermissionMatrix;
use crate::core::Principal;
use crate::core::PrincipalId;
use crate::core::Record;
use crate::interfaces::PrincipalSource;
use crate::interfaces::PrincipalSourceError;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Allow/deny outcome for a single request.
///
/// The optional reason is internal diagnostic context only; callers surface a
/// uniform "not allowed" outcome that never leaks why a request was denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request is allowed.
    allowed: bool,
    /// Internal denial reason, when any.
    reason: Option<String>,
}

impl Decision {
    /// Creates an allow decision.
    #[must_use]
    pub const fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    /// Creates a deny decision with an internal reason.
    #[must_use]
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }

    /// Returns whether the request is allowed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Returns the internal denial reason, when any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authorization engine errors.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// Principal's role is not configured or the account is disabled. The
    /// caller must treat this as an authentication failure, not a denial.
    #[error("principal role is not configured or account is disabled")]
    PrincipalInvalid,
    /// Principal store reported an error.
    #[error(transparent)]
    Source(#[from] PrincipalSourceError),
}

// ============================================================================
// SECTION: Authorization Engine
// ============================================================================

/// Authorization engine evaluating matrix and self-management policy.
#[derive(Debug, Clone)]
pub struct AuthorizationEngine {
    /// Permission matrix consulted per request.
    matrix: PermissionMatrix,
}

impl AuthorizationEngine {
    /// Creates an engine over a permission matrix.
    #[must_use]
    pub const fn new(matrix: PermissionMatrix) -> Self {
        Self {
            matrix,
        }
    }

    /// Returns the permission matrix.
    #[must_use]
    pub const fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    /// Rejects principals whose role is unconfigured or whose account is
    /// disabled. Evaluated on every access, never cached across requests.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::PrincipalInvalid`] when the principal
    /// must be treated as unauthenticated.
    pub fn ensure_authenticated(&self, principal: &Principal) -> Result<(), AuthorizationError> {
        if !principal.is_active() || !self.matrix.knows_role(&principal.role) {
            return Err(AuthorizationError::PrincipalInvalid);
        }
        Ok(())
    }

    /// Produces the allow/deny decision for an action on an entity.
    ///
    /// When the target record belongs to the principal entity, the
    /// self-management table decides; otherwise the permission matrix does.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::PrincipalInvalid`] when the principal
    /// must be treated as unauthenticated.
    pub fn authorize(
        &self,
        principal: &Principal,
        entity: &EntityDescriptor,
        action: &ActionName,
        target: Option<&Record>,
    ) -> Result<Decision, AuthorizationError> {
        self.ensure_authenticated(principal)?;
        if entity.principal_entity
            && let Some(record) = target
        {
            return Ok(self.authorize_self_management(principal, action, record));
        }
        Ok(self.matrix_decision(principal, entity.name.as_str(), action))
    }

    /// Produces the allow/deny decision for an action on a special
    /// (non-entity) capability, addressed by name.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::PrincipalInvalid`] when the principal
    /// must be treated as unauthenticated.
    pub fn authorize_special(
        &self,
        principal: &Principal,
        capability: &str,
        action: &ActionName,
    ) -> Result<Decision, AuthorizationError> {
        self.ensure_authenticated(principal)?;
        Ok(self.matrix_decision(principal, capability, action))
    }

    /// Straight matrix lookup wrapped in a decision.
    fn matrix_decision(
        &self,
        principal: &Principal,
        resource: &str,
        action: &ActionName,
    ) -> Decision {
        if self.matrix.allowed(&principal.role, resource, action) {
            Decision::allow()
        } else {
            Decision::deny(format!("matrix denies {action} on {resource}"))
        }
    }

    /// Self-management decision table for actions on principal records.
    ///
    /// | action       | root & self | root & other | non-root & self | non-root & other |
    /// |--------------|-------------|--------------|-----------------|------------------|
    /// | edit/destroy | allow       | allow        | deny            | deny             |
    /// | toggle       | deny        | allow        | deny            | deny             |
    /// | update       | deny        | allow        | allow           | deny             |
    ///
    /// A root principal can never toggle or generically update its own
    /// account, so it cannot lock itself out of its elevated access. Actions
    /// outside the table fall back to the permission matrix.
    fn authorize_self_management(
        &self,
        principal: &Principal,
        action: &ActionName,
        target: &Record,
    ) -> Decision {
        let root = self.matrix.is_root(principal);
        let acting_on_self = target.id.as_str() == principal.id.as_str();
        match action.as_str() {
            "edit" | "destroy" => {
                if root {
                    Decision::allow()
                } else {
                    Decision::deny("only root may edit or destroy principal accounts")
                }
            }
            "toggle" => {
                if root && !acting_on_self {
                    Decision::allow()
                } else {
                    Decision::deny("toggling own account or non-root toggle")
                }
            }
            "update" => {
                if root {
                    if acting_on_self {
                        Decision::deny("root cannot generically update its own account")
                    } else {
                        Decision::allow()
                    }
                } else if acting_on_self {
                    Decision::allow()
                } else {
                    Decision::deny("non-root update of another principal")
                }
            }
            _ => self.matrix_decision(principal, target.entity.as_str(), action),
        }
    }
}

// ============================================================================
// SECTION: Principal Resolution
// ============================================================================

/// Resolves a principal by identifier and revalidates it against the matrix.
///
/// Mirrors the per-request "current user" resolution of the enclosing session
/// layer: a missing principal, an unconfigured role, or a disabled account is
/// an authentication failure that must force de-authentication.
///
/// # Errors
///
/// Returns [`AuthorizationError::PrincipalInvalid`] when the principal must
/// be treated as unauthenticated, or [`AuthorizationError::Source`] when the
/// lookup itself fails.
pub fn resolve_principal<S: PrincipalSource>(
    source: &S,
    id: &PrincipalId,
    matrix: &PermissionMatrix,
) -> Result<Principal, AuthorizationError> {
    let principal = source.find_by_id(id)?.ok_or(AuthorizationError::PrincipalInvalid)?;
    if !principal.is_active() || !matrix.knows_role(&principal.role) {
        return Err(AuthorizationError::PrincipalInvalid);
    }
    Ok(principal)
}
