//! MTGJSON `cards.csv`, one printing per row.

use super::ImportError;
use crate::store::{CatalogCard, Variant};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

/// Where MTGJSON publishes the current `cards.csv`.
pub const DEFAULT_URL: &str = "https://mtgjson.com/api/v5/csv/cards.csv";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Row {
    uuid: Uuid,
    name: String,
    #[serde(rename = "type", default)]
    type_line: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    mana_cost: String,
    #[serde(default)]
    colors: String,
    #[serde(default)]
    rarity: String,
    set_code: String,
    #[serde(default)]
    scryfall_id: Option<Uuid>,
    #[serde(default)]
    tcgplayer_product_id: Option<u64>,
    #[serde(default)]
    border_color: String,
    #[serde(default)]
    frame_effects: String,
}

impl From<Row> for CatalogCard {
    fn from(row: Row) -> Self {
        let variant = if row.border_color == "borderless" {
            Some(Variant::Borderless)
        } else if row.frame_effects.contains("showcase") {
            Some(Variant::Showcase)
        } else {
            None
        };

        CatalogCard {
            uuid: row.uuid,
            name: row.name,
            type_line: row.type_line,
            oracle_text: row.text,
            mana_cost: row.mana_cost,
            colors: row.colors,
            rarity: row.rarity,
            set_code: row.set_code,
            scryfall_id: row.scryfall_id,
            tcgplayer_product_id: row.tcgplayer_product_id,
            variant,
        }
    }
}

pub fn read<R: Read>(reader: R) -> Result<Vec<CatalogCard>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let mut cards = Vec::new();
    for row in reader.deserialize::<Row>() {
        cards.push(row?.into());
    }

    Ok(cards)
}

pub fn read_path(path: &Path) -> Result<Vec<CatalogCard>, ImportError> {
    read(std::fs::File::open(path)?)
}

/// Fetch a `cards.csv` over HTTP and read it.
pub async fn download(
    http: &reqwest::Client,
    url: &str,
) -> Result<Vec<CatalogCard>, ImportError> {
    log::info!("Downloading {url}");

    let response = http.get(url).send().await?;
    if !response.status().is_success() {
        return Err(ImportError::Status(response.status()));
    }
    let body = response.bytes().await?;
    log::info!("Downloaded {} bytes", body.len());

    read(&body[..])
}
