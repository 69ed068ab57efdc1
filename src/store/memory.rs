use super::{CardRecord, CardStore, CatalogCard, StoreError, User};
use crate::import::ImportEntry;
use crate::predicate::{OwnerId, Predicate};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;
use uuid::Uuid;

/// A [`CardStore`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<User>,
    catalog: BTreeMap<Uuid, CatalogCard>,
    owned: HashMap<(OwnerId, Uuid), u32>,
}

impl Inner {
    fn require_user(&self, owner: OwnerId) -> Result<(), StoreError> {
        if self.users.iter().any(|user| user.id == owner) {
            Ok(())
        } else {
            Err(StoreError::UnknownUser(owner.to_string()))
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn find_cards(
        &self,
        predicate: &Predicate,
        owner: OwnerId,
        limit: Option<u64>,
    ) -> Result<Vec<CardRecord>, StoreError> {
        if predicate.scope() != owner {
            return Ok(vec![]);
        }

        let inner = self.inner.lock().await;
        let mut result: Vec<CardRecord> = inner
            .owned
            .iter()
            .filter(|((id, _), _)| *id == owner)
            .filter_map(|((_, uuid), quantity)| {
                let card = inner.catalog.get(uuid)?;
                Some(card.clone().with_quantity(*quantity))
            })
            .filter(|card| predicate.matches(card))
            .collect();

        result.sort_by(|a, b| {
            (&a.name, &a.set_code, a.uuid).cmp(&(&b.name, &b.set_code, b.uuid))
        });
        if let Some(limit) = limit {
            result.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }

        Ok(result)
    }

    async fn create_user(&self, name: &str) -> Result<User, StoreError> {
        let name = name.trim().to_lowercase();
        let mut inner = self.inner.lock().await;
        if inner.users.iter().any(|user| user.name == name) {
            return Err(StoreError::DuplicateUser(name));
        }

        let id = inner.users.iter().map(|user| user.id.0).max().unwrap_or(0) + 1;
        let user = User {
            id: OwnerId(id),
            name,
        };
        inner.users.push(user.clone());
        log::info!("Created user '{}' ({})", user.name, user.id);

        Ok(user)
    }

    async fn user(&self, name: &str) -> Result<Option<User>, StoreError> {
        let name = name.trim().to_lowercase();
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|user| user.name == name).cloned())
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        let mut users = self.inner.lock().await.users.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn resolve(&self, entry: &ImportEntry) -> Result<Option<Uuid>, StoreError> {
        let inner = self.inner.lock().await;

        if let Some(product_id) = entry.product_id {
            if let Some(card) = inner
                .catalog
                .values()
                .find(|card| card.tcgplayer_product_id == Some(product_id))
            {
                return Ok(Some(card.uuid));
            }
        }

        let mut candidates: Vec<&CatalogCard> = inner
            .catalog
            .values()
            .filter(|card| card.is_named_by(entry))
            .collect();
        candidates.sort_by(|a, b| (a.variant, a.uuid).cmp(&(b.variant, b.uuid)));

        Ok(candidates.first().map(|card| card.uuid))
    }

    async fn add_cards(&self, owner: OwnerId, cards: &[(Uuid, u32)]) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.require_user(owner)?;
        if let Some((uuid, _)) = cards
            .iter()
            .find(|(uuid, _)| !inner.catalog.contains_key(uuid))
        {
            return Err(StoreError::UnknownCard(*uuid));
        }

        for (uuid, amount) in cards {
            let owned = inner.owned.entry((owner, *uuid)).or_default();
            *owned = owned.saturating_add(*amount);
        }
        log::debug!("Added {} card rows for {owner}", cards.len());

        Ok(cards.len() as u64)
    }

    async fn remove_cards(
        &self,
        owner: OwnerId,
        cards: &[(Uuid, u32)],
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.require_user(owner)?;

        let mut affected = 0;
        for (uuid, amount) in cards {
            let key = (owner, *uuid);
            let Some(owned) = inner.owned.get_mut(&key) else {
                continue;
            };
            *owned = owned.saturating_sub(*amount);
            if *owned == 0 {
                inner.owned.remove(&key);
            }
            affected += 1;
        }
        log::debug!("Removed {affected} card rows for {owner}");

        Ok(affected)
    }

    async fn upsert_catalog(&self, cards: &[CatalogCard]) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        for card in cards {
            inner.catalog.insert(card.uuid, card.clone());
        }
        Ok(cards.len() as u64)
    }
}
