//! Reading card lists into the collection.
//!
//! * [`deck`]: deck-list text, `4 Lightning Bolt [M10]`
//! * [`tcgplayer`]: the CSV export of the TCGplayer app
//! * [`catalog`]: MTGJSON `cards.csv`, to fill the card catalogue

pub mod catalog;
pub mod deck;
pub mod tcgplayer;

use crate::predicate::OwnerId;
use crate::store::{CardStore, StoreError, Variant};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Download failed: {0}")]
    Status(reqwest::StatusCode),
    #[error("Line {line}: can't read '{content}'")]
    Line { line: usize, content: String },
}

/// One line of a card list: which card and how many copies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportEntry {
    pub name: String,
    pub quantity: u32,
    pub set_code: Option<String>,
    /// TCGplayer product id, identifies the exact printing.
    pub product_id: Option<u64>,
    pub variant: Option<Variant>,
}

impl ImportEntry {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            set_code: None,
            product_id: None,
            variant: None,
        }
    }

    pub fn with_set(mut self, set_code: impl Into<String>) -> Self {
        self.set_code = Some(set_code.into());
        self
    }
}

impl Display for ImportEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.quantity, self.name)?;
        if let Some(variant) = self.variant {
            write!(f, " ({variant})")?;
        }
        if let Some(set_code) = &self.set_code {
            write!(f, " [{set_code}]")?;
        }
        Ok(())
    }
}

/// Split a trailing `(Borderless)` or `(Showcase)` off a card name.
pub fn split_variant(name: &str) -> (&str, Option<Variant>) {
    let name = name.trim();
    if let Some(rest) = name.strip_suffix(')') {
        if let Some((base, variant)) = rest.rsplit_once('(') {
            if let Ok(variant) = variant.parse() {
                return (base.trim(), Some(variant));
            }
        }
    }
    (name, None)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Collection rows touched.
    pub added: u64,
    /// Copies added over all rows.
    pub copies: u64,
    /// Entries which matched no catalogue printing.
    pub unresolved: Vec<ImportEntry>,
}

/// Resolve entries against the catalogue and add the resolved ones to the owner's collection.
pub async fn import<S>(
    store: &S,
    owner: OwnerId,
    entries: Vec<ImportEntry>,
) -> Result<ImportSummary, StoreError>
where
    S: CardStore + ?Sized,
{
    let mut resolved: Vec<(Uuid, u32)> = Vec::new();
    let mut summary = ImportSummary::default();

    for entry in entries {
        match store.resolve(&entry).await? {
            Some(uuid) => resolved.push((uuid, entry.quantity)),
            None => {
                log::warn!("No printing found for '{entry}'");
                summary.unresolved.push(entry);
            }
        }
    }

    if !resolved.is_empty() {
        summary.added = store.add_cards(owner, &resolved).await?;
        summary.copies = resolved.iter().map(|(_, quantity)| u64::from(*quantity)).sum();
    }
    log::info!(
        "Imported {} copies, {} entries unresolved",
        summary.copies,
        summary.unresolved.len()
    );

    Ok(summary)
}
