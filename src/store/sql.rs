use super::entity::{card, user, user_card};
use super::{CardRecord, CardStore, CatalogCard, StoreError, User};
use crate::import::ImportEntry;
use crate::predicate::{OwnerId, Predicate};
use crate::sea_orm::translate_predicate;
use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func, OnConflict},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Schema, Set, TransactionTrait,
};
use uuid::Uuid;

/// A [`CardStore`] backed by a SQL database through SeaORM.
#[derive(Debug, Clone)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    /// Connect to a database and create missing tables.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let db = Database::connect(url).await?;
        Self::with_connection(db).await
    }

    pub async fn with_connection(db: DatabaseConnection) -> Result<Self, StoreError> {
        let store = Self { db };
        store.bootstrap().await?;
        Ok(store)
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn bootstrap(&self) -> Result<(), StoreError> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        for mut table in [
            schema.create_table_from_entity(user::Entity),
            schema.create_table_from_entity(card::Entity),
            schema.create_table_from_entity(user_card::Entity),
        ] {
            table.if_not_exists();
            self.db.execute(backend.build(&table)).await?;
        }
        log::debug!("Database schema ready");

        Ok(())
    }
}

async fn require_user<C: ConnectionTrait>(db: &C, owner: OwnerId) -> Result<(), StoreError> {
    match user::Entity::find_by_id(owner.0).one(db).await? {
        Some(_) => Ok(()),
        None => Err(StoreError::UnknownUser(owner.to_string())),
    }
}

fn record(card: card::Model, amount: i32) -> CardRecord {
    CardRecord {
        uuid: card.uuid,
        name: card.name,
        type_line: card.type_line,
        oracle_text: card.oracle_text,
        mana_cost: card.mana_cost,
        colors: card.colors,
        rarity: card.rarity,
        set_code: card.set_code,
        scryfall_id: card.scryfall_id,
        quantity: u32::try_from(amount).unwrap_or_default(),
    }
}

fn active_card(card: &CatalogCard) -> card::ActiveModel {
    card::ActiveModel {
        uuid: Set(card.uuid),
        name: Set(card.name.clone()),
        type_line: Set(card.type_line.clone()),
        oracle_text: Set(card.oracle_text.clone()),
        mana_cost: Set(card.mana_cost.clone()),
        colors: Set(card.colors.clone()),
        rarity: Set(card.rarity.clone()),
        set_code: Set(card.set_code.clone()),
        scryfall_id: Set(card.scryfall_id),
        tcgplayer_product_id: Set(card
            .tcgplayer_product_id
            .and_then(|id| i64::try_from(id).ok())),
        variant: Set(card.variant.map(|v| v.as_str().to_string())),
    }
}

fn amount(amount: u32) -> i32 {
    i32::try_from(amount).unwrap_or(i32::MAX)
}

#[async_trait]
impl CardStore for SqlStore {
    async fn find_cards(
        &self,
        predicate: &Predicate,
        owner: OwnerId,
        limit: Option<u64>,
    ) -> Result<Vec<CardRecord>, StoreError> {
        if predicate.scope() != owner {
            return Ok(vec![]);
        }

        let mut query = user_card::Entity::find()
            .find_also_related(card::Entity)
            .filter(user_card::Column::UserId.eq(owner.0))
            .filter(translate_predicate(predicate))
            .order_by_asc(card::Column::Name)
            .order_by_asc(card::Column::SetCode)
            .order_by_asc(card::Column::Uuid);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        let rows = query.all(&self.db).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(owned, card)| card.map(|card| record(card, owned.amount)))
            .collect())
    }

    async fn create_user(&self, name: &str) -> Result<User, StoreError> {
        let name = name.trim().to_lowercase();
        if self.user(&name).await?.is_some() {
            return Err(StoreError::DuplicateUser(name));
        }

        let model = user::ActiveModel {
            name: Set(name),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        log::info!("Created user '{}' ({})", model.name, model.id);

        Ok(User {
            id: OwnerId(model.id),
            name: model.name,
        })
    }

    async fn user(&self, name: &str) -> Result<Option<User>, StoreError> {
        let model = user::Entity::find()
            .filter(user::Column::Name.eq(name.trim().to_lowercase()))
            .one(&self.db)
            .await?;

        Ok(model.map(|model| User {
            id: OwnerId(model.id),
            name: model.name,
        }))
    }

    async fn users(&self) -> Result<Vec<User>, StoreError> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models
            .into_iter()
            .map(|model| User {
                id: OwnerId(model.id),
                name: model.name,
            })
            .collect())
    }

    async fn resolve(&self, entry: &ImportEntry) -> Result<Option<Uuid>, StoreError> {
        if let Some(product_id) = entry.product_id.and_then(|id| i64::try_from(id).ok()) {
            let card = card::Entity::find()
                .filter(card::Column::TcgplayerProductId.eq(product_id))
                .one(&self.db)
                .await?;
            if let Some(card) = card {
                return Ok(Some(card.uuid));
            }
        }

        let mut query = card::Entity::find().filter(
            Expr::expr(Func::lower(Expr::col(card::Column::Name)))
                .eq(entry.name.trim().to_ascii_lowercase()),
        );
        if let Some(set_code) = &entry.set_code {
            query = query.filter(
                Expr::expr(Func::upper(Expr::col(card::Column::SetCode)))
                    .eq(set_code.trim().to_uppercase()),
            );
        }
        if let Some(variant) = entry.variant {
            query = query.filter(card::Column::Variant.eq(variant.as_str()));
        }

        // NULL sorts first, regular printings win
        let card = query
            .order_by_asc(card::Column::Variant)
            .order_by_asc(card::Column::Uuid)
            .one(&self.db)
            .await?;

        Ok(card.map(|card| card.uuid))
    }

    async fn add_cards(&self, owner: OwnerId, cards: &[(Uuid, u32)]) -> Result<u64, StoreError> {
        let txn = self.db.begin().await?;
        require_user(&txn, owner).await?;

        for (uuid, added) in cards {
            if card::Entity::find_by_id(*uuid).one(&txn).await?.is_none() {
                return Err(StoreError::UnknownCard(*uuid));
            }

            match user_card::Entity::find_by_id((owner.0, *uuid))
                .one(&txn)
                .await?
            {
                Some(row) => {
                    let total = row.amount.saturating_add(amount(*added));
                    let mut row: user_card::ActiveModel = row.into();
                    row.amount = Set(total);
                    row.update(&txn).await?;
                }
                None => {
                    user_card::ActiveModel {
                        user_id: Set(owner.0),
                        card_uuid: Set(*uuid),
                        amount: Set(amount(*added)),
                    }
                    .insert(&txn)
                    .await?;
                }
            }
        }

        txn.commit().await?;
        log::debug!("Added {} card rows for {owner}", cards.len());

        Ok(cards.len() as u64)
    }

    async fn remove_cards(
        &self,
        owner: OwnerId,
        cards: &[(Uuid, u32)],
    ) -> Result<u64, StoreError> {
        let txn = self.db.begin().await?;
        require_user(&txn, owner).await?;

        let mut affected = 0;
        for (uuid, removed) in cards {
            let Some(row) = user_card::Entity::find_by_id((owner.0, *uuid))
                .one(&txn)
                .await?
            else {
                continue;
            };

            let total = row.amount.saturating_sub(amount(*removed));
            if total <= 0 {
                user_card::Entity::delete_by_id((owner.0, *uuid))
                    .exec(&txn)
                    .await?;
            } else {
                let mut row: user_card::ActiveModel = row.into();
                row.amount = Set(total);
                row.update(&txn).await?;
            }
            affected += 1;
        }

        txn.commit().await?;
        log::debug!("Removed {affected} card rows for {owner}");

        Ok(affected)
    }

    async fn upsert_catalog(&self, cards: &[CatalogCard]) -> Result<u64, StoreError> {
        let txn = self.db.begin().await?;

        for card in cards {
            card::Entity::insert(active_card(card))
                .on_conflict(
                    OnConflict::column(card::Column::Uuid)
                        .update_columns([
                            card::Column::Name,
                            card::Column::TypeLine,
                            card::Column::OracleText,
                            card::Column::ManaCost,
                            card::Column::Colors,
                            card::Column::Rarity,
                            card::Column::SetCode,
                            card::Column::ScryfallId,
                            card::Column::TcgplayerProductId,
                            card::Column::Variant,
                        ])
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        log::info!("Loaded {} printings into the catalogue", cards.len());

        Ok(cards.len() as u64)
    }
}

