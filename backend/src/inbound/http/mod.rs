//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod cards;
pub mod error;
pub mod health;
pub mod moderation;
pub mod referrals;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
