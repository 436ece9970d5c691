//! Persistence adapters for the repository ports.
//!
//! Two families: REST adapters speaking the hosted data store's table API,
//! and an in-memory store for local development and integration tests.

mod memory;
mod rest_card_repository;
mod rest_referral_repository;
mod rest_store;
mod rest_user_repository;
mod rows;

pub use memory::InMemoryStore;
pub use rest_card_repository::RestCardRepository;
pub use rest_referral_repository::RestReferralRepository;
pub use rest_store::{RestStore, StoreError};
pub use rest_user_repository::RestUserRepository;
pub use rows::RowDecodeError;
