//! Card prices from Scryfall.

use crate::store::CardRecord;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use time::macros::format_description;
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_URL: &str = "https://api.scryfall.com";

/// Maximum number of identifiers `/cards/collection` accepts per request.
pub const CHUNK_SIZE: usize = 75;

#[derive(Debug, thiserror::Error)]
pub enum PriceError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Scryfall responded with {0}")]
    Status(StatusCode),
}

/// Prices of a printing in USD.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Prices {
    pub usd: Option<f64>,
    pub usd_foil: Option<f64>,
}

impl Prices {
    /// The regular price, or the foil price when there is no regular one.
    pub fn unit(&self) -> Option<f64> {
        match self.usd {
            Some(usd) if usd > 0.0 => Some(usd),
            _ => self.usd_foil,
        }
    }
}

#[derive(Serialize)]
struct CollectionRequest {
    identifiers: Vec<Identifier>,
}

#[derive(Serialize)]
struct Identifier {
    id: Uuid,
}

#[derive(Deserialize)]
struct CollectionResponse {
    #[serde(default)]
    not_found: Vec<serde_json::Value>,
    #[serde(default)]
    data: Vec<ScryfallCard>,
}

#[derive(Deserialize)]
struct ScryfallCard {
    id: Uuid,
    #[serde(default)]
    prices: ScryfallPrices,
}

#[derive(Default, Deserialize)]
struct ScryfallPrices {
    usd: Option<String>,
    usd_foil: Option<String>,
}

impl From<ScryfallPrices> for Prices {
    fn from(prices: ScryfallPrices) -> Self {
        fn parse(value: Option<String>) -> Option<f64> {
            value.and_then(|value| value.parse().ok())
        }

        Prices {
            usd: parse(prices.usd),
            usd_foil: parse(prices.usd_foil),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ScryfallClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScryfallClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, PriceError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The HTTP client, shared with other downloads.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Look up prices by Scryfall id.
    ///
    /// Ids Scryfall does not know are missing from the result.
    pub async fn fetch_prices(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Prices>, PriceError> {
        let ids: Vec<Uuid> = ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let url = format!("{}/cards/collection", self.base_url);
        let mut result = HashMap::with_capacity(ids.len());

        for chunk in ids.chunks(CHUNK_SIZE) {
            log::info!("Fetching prices for {} cards", chunk.len());

            let request = CollectionRequest {
                identifiers: chunk.iter().map(|&id| Identifier { id }).collect(),
            };
            let response = self.http.post(&url).json(&request).send().await?;
            if !response.status().is_success() {
                return Err(PriceError::Status(response.status()));
            }

            let response: CollectionResponse = response.json().await?;
            if !response.not_found.is_empty() {
                log::warn!("Unable to locate: {:?}", response.not_found);
            }
            for card in response.data {
                result.insert(card.id, card.prices.into());
            }
        }

        Ok(result)
    }

    /// Fetch the prices of some cards and pair them up.
    pub async fn report(&self, cards: Vec<CardRecord>) -> Result<PriceReport, PriceError> {
        let ids: Vec<Uuid> = cards.iter().filter_map(|card| card.scryfall_id).collect();
        let prices = self.fetch_prices(&ids).await?;
        Ok(PriceReport::new(cards, &prices))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceLine {
    pub card: CardRecord,
    pub prices: Option<Prices>,
}

impl PriceLine {
    pub fn unit(&self) -> Option<f64> {
        self.prices.as_ref().and_then(Prices::unit)
    }

    pub fn total(&self) -> f64 {
        self.unit().unwrap_or_default() * f64::from(self.card.quantity)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PriceReport {
    pub lines: Vec<PriceLine>,
    pub fetched_at: OffsetDateTime,
}

impl PriceReport {
    pub fn new(cards: Vec<CardRecord>, prices: &HashMap<Uuid, Prices>) -> Self {
        let lines = cards
            .into_iter()
            .map(|card| {
                let prices = card.scryfall_id.and_then(|id| prices.get(&id)).copied();
                PriceLine { card, prices }
            })
            .collect();

        Self {
            lines,
            fetched_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn total(&self) -> f64 {
        self.lines.iter().map(PriceLine::total).sum()
    }

    pub fn timestamp(&self) -> String {
        self.fetched_at
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second]"
            ))
            .unwrap_or_else(|_| self.fetched_at.to_string())
    }
}
