//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CardMutation, CardQuery, CardSubmission, IdentityBridge, Moderation, ReferralCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityBridge>,
    pub submissions: Arc<dyn CardSubmission>,
    pub mutations: Arc<dyn CardMutation>,
    pub moderation: Arc<dyn Moderation>,
    pub referrals: Arc<dyn ReferralCommand>,
    pub queries: Arc<dyn CardQuery>,
}
