//! In-memory store implementing every repository port.
//!
//! Backs local development and the integration tests. One lock guards all
//! tables so cross-table operations (cascade deletes, uniqueness checks)
//! stay consistent without ordering concerns.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::card::{Card, CardStatus, Slug};
use crate::domain::ports::{
    CardPatch, CardPersistenceError, CardRepository, ReferralPersistenceError,
    ReferralRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{Click, Referral, ReferralWithClicks, SubjectId, User};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    cards: HashMap<Uuid, Card>,
    referrals: HashMap<Uuid, Referral>,
    clicks: Vec<Click>,
}

/// Shared in-memory store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed a user directly, bypassing the identity bridge. Used by tests
    /// and local fixtures to install administrators.
    pub fn seed_user(&self, user: User) {
        self.write().users.insert(user.id(), user);
    }

    /// Seed a card directly, bypassing the submission workflow.
    pub fn seed_card(&self, card: Card) {
        self.write().cards.insert(card.id, card);
    }

    fn sorted_newest_first(mut cards: Vec<Card>) -> Vec<Card> {
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        cards
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_subject(
        &self,
        subject: &SubjectId,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.read();
        Ok(tables
            .users
            .values()
            .find(|user| user.subject_id() == subject)
            .cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.read().users.get(id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut tables = self.write();
        if tables
            .users
            .values()
            .any(|existing| existing.subject_id() == user.subject_id())
        {
            return Err(UserPersistenceError::duplicate_subject(
                user.subject_id().as_str(),
            ));
        }
        tables.users.insert(user.id(), user.clone());
        Ok(user.clone())
    }
}

#[async_trait]
impl CardRepository for InMemoryStore {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Card>, CardPersistenceError> {
        Ok(self.read().cards.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Card>, CardPersistenceError> {
        let tables = self.read();
        Ok(tables
            .cards
            .values()
            .find(|card| &card.slug == slug)
            .cloned())
    }

    async fn insert(&self, card: &Card) -> Result<Card, CardPersistenceError> {
        let mut tables = self.write();
        if tables
            .cards
            .values()
            .any(|existing| existing.slug == card.slug)
        {
            return Err(CardPersistenceError::duplicate_slug(card.slug.as_str()));
        }
        tables.cards.insert(card.id, card.clone());
        Ok(card.clone())
    }

    async fn update_owned(
        &self,
        id: &Uuid,
        owner: &Uuid,
        patch: &CardPatch,
    ) -> Result<Option<Card>, CardPersistenceError> {
        let mut tables = self.write();
        let Some(card) = tables.cards.get_mut(id) else {
            return Ok(None);
        };
        if !card.is_owned_by(*owner) {
            return Ok(None);
        }
        card.name = patch.name.clone();
        card.bank = patch.bank.clone();
        card.category = patch.category.clone();
        card.eligibility = patch.eligibility.clone();
        card.benefits = patch.benefits.clone();
        card.referral_url = patch.referral_url.clone();
        card.joining_fee = patch.joining_fee;
        card.annual_fee = patch.annual_fee;
        card.description = patch.description.clone();
        Ok(Some(card.clone()))
    }

    async fn delete_owned(&self, id: &Uuid, owner: &Uuid) -> Result<u64, CardPersistenceError> {
        let mut tables = self.write();
        let owned = tables
            .cards
            .get(id)
            .is_some_and(|card| card.is_owned_by(*owner));
        if !owned {
            return Ok(0);
        }
        tables.cards.remove(id);
        // Cascade: a card takes its referrals and their clicks with it.
        let orphaned: Vec<Uuid> = tables
            .referrals
            .values()
            .filter(|referral| referral.card_id == *id)
            .map(|referral| referral.id)
            .collect();
        for referral_id in &orphaned {
            tables.referrals.remove(referral_id);
        }
        tables
            .clicks
            .retain(|click| !orphaned.contains(&click.referral_id));
        Ok(1)
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: CardStatus,
    ) -> Result<Option<Card>, CardPersistenceError> {
        let mut tables = self.write();
        let Some(card) = tables.cards.get_mut(id) else {
            return Ok(None);
        };
        card.status = status;
        Ok(Some(card.clone()))
    }

    async fn list_by_status(
        &self,
        status: CardStatus,
    ) -> Result<Vec<Card>, CardPersistenceError> {
        let tables = self.read();
        let cards = tables
            .cards
            .values()
            .filter(|card| card.status == status)
            .cloned()
            .collect();
        Ok(Self::sorted_newest_first(cards))
    }

    async fn list_by_owner(&self, owner: &Uuid) -> Result<Vec<Card>, CardPersistenceError> {
        let tables = self.read();
        let cards = tables
            .cards
            .values()
            .filter(|card| card.is_owned_by(*owner))
            .cloned()
            .collect();
        Ok(Self::sorted_newest_first(cards))
    }

    async fn delete_unowned_with_status(
        &self,
        status: CardStatus,
    ) -> Result<u64, CardPersistenceError> {
        let mut tables = self.write();
        let doomed: Vec<Uuid> = tables
            .cards
            .values()
            .filter(|card| card.submitted_by.is_none() && card.status == status)
            .map(|card| card.id)
            .collect();
        for card_id in &doomed {
            tables.cards.remove(card_id);
            let orphaned: Vec<Uuid> = tables
                .referrals
                .values()
                .filter(|referral| referral.card_id == *card_id)
                .map(|referral| referral.id)
                .collect();
            for referral_id in &orphaned {
                tables.referrals.remove(referral_id);
            }
            tables
                .clicks
                .retain(|click| !orphaned.contains(&click.referral_id));
        }
        Ok(doomed.len() as u64)
    }
}

#[async_trait]
impl ReferralRepository for InMemoryStore {
    async fn insert(&self, referral: &Referral) -> Result<Referral, ReferralPersistenceError> {
        let mut tables = self.write();
        tables.referrals.insert(referral.id, referral.clone());
        Ok(referral.clone())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Referral>, ReferralPersistenceError> {
        Ok(self.read().referrals.get(id).cloned())
    }

    async fn list_for_card(
        &self,
        card_id: &Uuid,
    ) -> Result<Vec<ReferralWithClicks>, ReferralPersistenceError> {
        let tables = self.read();
        let mut listed: Vec<ReferralWithClicks> = tables
            .referrals
            .values()
            .filter(|referral| referral.card_id == *card_id)
            .map(|referral| {
                let click_count = tables
                    .clicks
                    .iter()
                    .filter(|click| click.referral_id == referral.id)
                    .count() as u64;
                ReferralWithClicks {
                    referral: referral.clone(),
                    click_count,
                }
            })
            .collect();
        listed.sort_by(|a, b| b.referral.created_at.cmp(&a.referral.created_at));
        Ok(listed)
    }

    async fn delete_owned(
        &self,
        id: &Uuid,
        owner: &Uuid,
    ) -> Result<u64, ReferralPersistenceError> {
        let mut tables = self.write();
        let owned = tables
            .referrals
            .get(id)
            .is_some_and(|referral| referral.user_id == *owner);
        if !owned {
            return Ok(0);
        }
        tables.referrals.remove(id);
        tables.clicks.retain(|click| click.referral_id != *id);
        Ok(1)
    }

    async fn record_click(&self, click: &Click) -> Result<(), ReferralPersistenceError> {
        self.write().clicks.push(click.clone());
        Ok(())
    }
}
