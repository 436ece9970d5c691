//! Server assembly: state construction and route registration.

pub mod config;

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{CardRepository, ListingCache, ReferralRepository, UserRepository};
use crate::domain::{
    CardMutationService, CardQueryService, CardSubmissionService, IdentityBridgeService,
    ModerationService, ReferralService,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{cards, moderation, referrals, session};
use crate::outbound::cache::InProcessListingCache;
use crate::outbound::persistence::{
    InMemoryStore, RestCardRepository, RestReferralRepository, RestStore, RestUserRepository,
};

use self::config::DataStoreConfig;

/// Wire the domain services over a concrete set of adapters.
pub fn assemble_state<U, C, R, L>(
    users: Arc<U>,
    cards: Arc<C>,
    referrals: Arc<R>,
    cache: Arc<L>,
) -> HttpState
where
    U: UserRepository + 'static,
    C: CardRepository + 'static,
    R: ReferralRepository + 'static,
    L: ListingCache + 'static,
{
    HttpState {
        identity: Arc::new(IdentityBridgeService::new(users.clone())),
        submissions: Arc::new(CardSubmissionService::new(
            users.clone(),
            cards.clone(),
            cache.clone(),
        )),
        mutations: Arc::new(CardMutationService::new(
            users.clone(),
            cards.clone(),
            cache.clone(),
        )),
        moderation: Arc::new(ModerationService::new(users.clone(), cards.clone(), cache)),
        referrals: Arc::new(ReferralService::new(users.clone(), cards.clone(), referrals)),
        queries: Arc::new(CardQueryService::new(users, cards)),
    }
}

/// State over the in-memory store, for local development and tests. The
/// returned store handle allows seeding fixtures behind the services.
pub fn memory_state() -> (HttpState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let cache = Arc::new(InProcessListingCache::new());
    let state = assemble_state(store.clone(), store.clone(), store.clone(), cache);
    (state, store)
}

/// State over the hosted data store's REST API.
///
/// # Errors
///
/// Returns an error when the HTTP client cannot be constructed.
pub fn rest_state(config: &DataStoreConfig) -> Result<HttpState, reqwest::Error> {
    let store = RestStore::new(
        config.base_url.clone(),
        config.service_key.clone(),
        config.timeout,
    )?;
    let users = Arc::new(RestUserRepository::new(store.clone()));
    let cards = Arc::new(RestCardRepository::new(store.clone()));
    let referrals = Arc::new(RestReferralRepository::new(store));
    let cache = Arc::new(InProcessListingCache::new());
    Ok(assemble_state(users, cards, referrals, cache))
}

/// Register the versioned API surface on an Actix app.
pub fn configure_api(cfg: &mut web::ServiceConfig, state: HttpState) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::Data::new(state))
            .service(session::sync_session)
            .service(cards::list_cards)
            .service(cards::own_submissions)
            .service(cards::submit_card)
            .service(cards::update_card)
            .service(cards::delete_card)
            .service(referrals::list_referrals)
            .service(referrals::add_referral)
            .service(referrals::delete_referral)
            .service(referrals::record_click)
            .service(moderation::pending_cards)
            .service(moderation::approve_card)
            .service(moderation::reject_card)
            .service(moderation::remove_seed_cards)
            .service(cards::card_detail),
    );
}
