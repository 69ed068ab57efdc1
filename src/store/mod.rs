//! The card store: the card catalogue, users and which cards they own.
//!
//! [`CardStore`] is the seam between the search core and storage. [`MemoryStore`] keeps
//! everything in memory, [`SqlStore`] persists it using SeaORM.

#[cfg(feature = "sea-orm")]
pub mod entity;
mod memory;
#[cfg(feature = "sea-orm")]
mod sql;

pub use memory::MemoryStore;
#[cfg(feature = "sea-orm")]
pub use sql::SqlStore;

use crate::import::ImportEntry;
use crate::predicate::{Column, Columns, OwnerId, Predicate};
use async_trait::async_trait;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "sea-orm")]
    #[error(transparent)]
    Database(#[from] ::sea_orm::DbErr),
    #[error("Unknown user: {0}")]
    UnknownUser(String),
    #[error("User '{0}' already exists")]
    DuplicateUser(String),
    #[error("Card {0} is not in the catalogue")]
    UnknownCard(Uuid),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct User {
    pub id: OwnerId,
    pub name: String,
}

/// A special printing of a card.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    Borderless,
    Showcase,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Borderless => "borderless",
            Variant::Showcase => "showcase",
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "borderless" => Ok(Variant::Borderless),
            "showcase" => Ok(Variant::Showcase),
            _ => Err(()),
        }
    }
}

/// A printing in the card catalogue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogCard {
    pub uuid: Uuid,
    pub name: String,
    pub type_line: String,
    pub oracle_text: String,
    pub mana_cost: String,
    /// Color symbols as stored, e.g. `W,U`.
    pub colors: String,
    pub rarity: String,
    pub set_code: String,
    pub scryfall_id: Option<Uuid>,
    pub tcgplayer_product_id: Option<u64>,
    pub variant: Option<Variant>,
}

impl CatalogCard {
    pub fn with_quantity(self, quantity: u32) -> CardRecord {
        CardRecord {
            uuid: self.uuid,
            name: self.name,
            type_line: self.type_line,
            oracle_text: self.oracle_text,
            mana_cost: self.mana_cost,
            colors: self.colors,
            rarity: self.rarity,
            set_code: self.set_code,
            scryfall_id: self.scryfall_id,
            quantity,
        }
    }

    /// Check if this printing is what an import entry names.
    ///
    /// The product id is not considered here, it is an exact lookup of its own.
    pub fn is_named_by(&self, entry: &ImportEntry) -> bool {
        self.name.eq_ignore_ascii_case(entry.name.trim())
            && entry
                .set_code
                .as_deref()
                .map_or(true, |set| self.set_code.eq_ignore_ascii_case(set))
            && entry.variant.map_or(true, |v| self.variant == Some(v))
    }
}

/// A card owned by a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardRecord {
    pub uuid: Uuid,
    pub name: String,
    pub type_line: String,
    pub oracle_text: String,
    pub mana_cost: String,
    pub colors: String,
    pub rarity: String,
    pub set_code: String,
    pub scryfall_id: Option<Uuid>,
    pub quantity: u32,
}

impl Columns for CardRecord {
    fn column(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.name,
            Column::TypeLine => &self.type_line,
            Column::OracleText => &self.oracle_text,
            Column::Colors => &self.colors,
            Column::SetCode => &self.set_code,
            Column::ManaCost => &self.mana_cost,
        }
    }
}

#[async_trait]
pub trait CardStore: Send + Sync {
    /// Find the owner's cards matching the predicate, ordered by name and set.
    ///
    /// A predicate scoped to a different owner matches nothing.
    async fn find_cards(
        &self,
        predicate: &Predicate,
        owner: OwnerId,
        limit: Option<u64>,
    ) -> Result<Vec<CardRecord>, StoreError>;

    /// Create a user. Names are case-insensitive and unique.
    async fn create_user(&self, name: &str) -> Result<User, StoreError>;

    async fn user(&self, name: &str) -> Result<Option<User>, StoreError>;

    async fn users(&self) -> Result<Vec<User>, StoreError>;

    /// Find the catalogue printing an import entry refers to.
    ///
    /// The TCGplayer product id wins if present and known, otherwise name, set and variant are
    /// used. Among equal candidates, regular printings come first.
    async fn resolve(&self, entry: &ImportEntry) -> Result<Option<Uuid>, StoreError>;

    /// Add quantities to the owner's collection, returns the number of rows touched.
    async fn add_cards(&self, owner: OwnerId, cards: &[(Uuid, u32)]) -> Result<u64, StoreError>;

    /// Remove quantities from the owner's collection, dropping cards which reach zero.
    async fn remove_cards(&self, owner: OwnerId, cards: &[(Uuid, u32)])
        -> Result<u64, StoreError>;

    /// Insert or replace catalogue printings.
    async fn upsert_catalog(&self, cards: &[CatalogCard]) -> Result<u64, StoreError>;

    /// List the owner's collection.
    async fn list_cards(
        &self,
        owner: OwnerId,
        limit: Option<u64>,
    ) -> Result<Vec<CardRecord>, StoreError> {
        self.find_cards(&Predicate::all(owner), owner, limit).await
    }
}
