//! Driving port for identity resolution.
//!
//! The bridge maps an external identity-provider account to a local user
//! record, creating the record on first sight. Workflows receive resolved
//! identities as plain arguments; only inbound adapters talk to the bridge.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Claims delivered by the external identity provider.
///
/// Raw and untrusted: the bridge validates subject and email before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    /// Opaque subject identifier; required.
    pub subject: String,
    /// Display name; optional, defaults to "Anonymous".
    pub name: Option<String>,
    /// Contact email; required.
    pub email: String,
}

/// Driving port for the identity bridge.
///
/// Resolution is idempotent: repeat calls for a known subject return the
/// stored record unchanged and never update name or email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityBridge: Send + Sync {
    /// Resolve claims to the local user, creating one if absent.
    ///
    /// # Errors
    ///
    /// - `AuthenticationRequired` when subject or email is missing.
    /// - `TransientError` when the user store is unreachable.
    async fn resolve(&self, claims: IdentityClaims) -> Result<User, Error>;
}
