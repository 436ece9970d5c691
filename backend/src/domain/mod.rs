//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: define the strongly typed card-marketplace model used by the
//! API and persistence layers, plus the services that drive it. Types stay
//! immutable where they carry invariants; each type documents its own
//! serialisation contract (serde) in its Rustdoc.

pub mod card;
pub mod error;
pub mod ports;
pub mod referral;
pub mod slug;
pub mod user;
pub mod validation;

mod card_mutation_service;
mod card_query_service;
mod identity_service;
mod moderation_service;
mod referral_service;
mod submission_service;

pub use self::card::{Card, CardFields, CardStatus, PLACEHOLDER_IMAGE, Slug};
pub use self::card_mutation_service::CardMutationService;
pub use self::card_query_service::CardQueryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity_service::IdentityBridgeService;
pub use self::moderation_service::ModerationService;
pub use self::referral::{Click, Referral, ReferralWithClicks};
pub use self::referral_service::ReferralService;
pub use self::submission_service::CardSubmissionService;
pub use self::user::{DEFAULT_DISPLAY_NAME, SubjectId, User};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
