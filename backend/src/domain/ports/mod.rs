//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod card_mutation;
mod card_query;
mod card_repository;
mod card_submission;
mod identity_bridge;
mod listing_cache;
mod moderation;
mod referral_command;
mod referral_repository;
mod user_repository;

#[cfg(test)]
pub use card_mutation::MockCardMutation;
pub use card_mutation::{CardMutation, DeleteCardRequest, UpdateCardRequest};
#[cfg(test)]
pub use card_query::MockCardQuery;
pub use card_query::{CardListingFilter, CardQuery};
#[cfg(test)]
pub use card_repository::MockCardRepository;
pub use card_repository::{CardPatch, CardPersistenceError, CardRepository};
#[cfg(test)]
pub use card_submission::MockCardSubmission;
pub use card_submission::{CardSubmission, SubmitCardRequest};
#[cfg(test)]
pub use identity_bridge::MockIdentityBridge;
pub use identity_bridge::{IdentityBridge, IdentityClaims};
#[cfg(test)]
pub use listing_cache::MockListingCache;
pub use listing_cache::{ListingCache, ListingCacheError, ListingView, NoOpListingCache};
#[cfg(test)]
pub use moderation::MockModeration;
pub use moderation::{Moderation, ModerationRequest};
#[cfg(test)]
pub use referral_command::MockReferralCommand;
pub use referral_command::{AddReferralRequest, RecordClickRequest, ReferralCommand};
#[cfg(test)]
pub use referral_repository::MockReferralRepository;
pub use referral_repository::{ReferralPersistenceError, ReferralRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
