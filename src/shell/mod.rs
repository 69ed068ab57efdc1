//! The interactive shell: one command per line, see [`Command`].

mod command;
pub mod render;

pub use command::{Command, Format, HandCommand, Line};

use crate::import::{self, ImportEntry, ImportError, ImportSummary};
use crate::predicate::{Clause, Column, Predicate};
use crate::prices::{PriceError, ScryfallClient};
use crate::store::{CardRecord, CardStore, StoreError, User};
use std::io::{BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Search(#[from] crate::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Price(#[from] PriceError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

/// Whether the shell keeps reading commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A card picked into the hand, with the owned copies in `card.quantity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandCard {
    pub card: CardRecord,
    pub amount: u32,
}

pub struct Shell<S: CardStore> {
    store: S,
    user: User,
    limit: u64,
    prices: ScryfallClient,
    catalog_url: String,
    results: Vec<CardRecord>,
    hand: Vec<HandCard>,
}

impl<S: CardStore> Shell<S> {
    pub fn new(store: S, user: User, prices: ScryfallClient, limit: u64) -> Self {
        Self {
            store,
            user,
            limit,
            prices,
            catalog_url: import::catalog::DEFAULT_URL.to_string(),
            results: Vec::new(),
            hand: Vec::new(),
        }
    }

    /// Set where `catalog --download` fetches from.
    pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
        self.catalog_url = url.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn results(&self) -> &[CardRecord] {
        &self.results
    }

    pub fn hand(&self) -> &[HandCard] {
        &self.hand
    }

    /// Read commands until the input ends or the user quits. Failed commands are reported and
    /// the shell carries on.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
    ) -> Result<(), ShellError> {
        prompt(out)?;
        for line in input.lines() {
            let line = line?;
            match self.execute(&line, out).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    log::debug!("Command '{line}' failed: {err:?}");
                    writeln!(out, "{err}")?;
                }
            }
            prompt(out)?;
        }

        Ok(())
    }

    /// Execute a single command line.
    pub async fn execute<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
    ) -> Result<Flow, ShellError> {
        if line.trim().is_empty() {
            return Ok(Flow::Continue);
        }

        let command = match Line::parse_line(line) {
            Ok(line) => line.command,
            Err(err) => {
                use clap::error::ErrorKind;
                return match err.kind() {
                    ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                        write!(out, "{err}")?;
                        Ok(Flow::Continue)
                    }
                    _ => Err(ShellError::Usage(err.to_string().trim_end().to_string())),
                };
            }
        };

        match command {
            Command::Search { query } => self.search(&query, out).await?,
            Command::Explain { query } => {
                let tokens = crate::parse(&query)?;
                let predicate = crate::compile(&tokens, self.user.id);
                render::explain(out, &tokens, &predicate)?;
            }
            Command::Print { limit } => {
                let cards = self
                    .store
                    .list_cards(self.user.id, Some(limit.unwrap_or(self.limit)))
                    .await?;
                render::cards(out, &cards)?;
            }
            Command::Prices { limit } => {
                let cards = self
                    .store
                    .list_cards(self.user.id, Some(limit.unwrap_or(self.limit)))
                    .await?;
                let report = self.prices.report(cards).await?;
                render::prices(out, &report)?;
            }
            Command::Add { format, file } => {
                let entries = match format {
                    Format::Csv => import::tcgplayer::read_path(&file)?,
                    Format::Txt => import::deck::read(&file)?,
                };
                let summary = import::import(&self.store, self.user.id, entries).await?;
                report_import(out, &summary)?;
            }
            Command::Catalog { file, download } => {
                let cards = match file {
                    Some(file) if !download => import::catalog::read_path(&file)?,
                    _ => import::catalog::download(self.prices.http(), &self.catalog_url).await?,
                };
                let loaded = self.store.upsert_catalog(&cards).await?;
                writeln!(out, "Loaded {loaded} printings")?;
            }
            Command::Hand { command } => self.hand_command(command, out).await?,
            Command::Users => {
                let users = self.store.users().await?;
                render::users(out, &users, &self.user)?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    async fn search<W: Write>(&mut self, query: &str, out: &mut W) -> Result<(), ShellError> {
        let predicate = crate::search(query, self.user.id)?;
        log::debug!("Searching: {predicate}");

        self.results = self
            .store
            .find_cards(&predicate, self.user.id, Some(self.limit))
            .await?;
        render::cards(out, &self.results)?;

        Ok(())
    }

    async fn hand_command<W: Write>(
        &mut self,
        command: Option<HandCommand>,
        out: &mut W,
    ) -> Result<(), ShellError> {
        match command.unwrap_or(HandCommand::Print) {
            HandCommand::Add { index, amount } => {
                let card = index
                    .checked_sub(1)
                    .and_then(|index| self.results.get(index))
                    .cloned()
                    .ok_or_else(|| {
                        ShellError::Usage(format!(
                            "No card #{index} in the last search ({} results)",
                            self.results.len()
                        ))
                    })?;
                let added = self.take(card, amount.unwrap_or(1));
                writeln!(out, "{added} in hand")?;
            }
            HandCommand::List { file } => {
                let mut missing = Vec::new();
                for entry in import::deck::read(&file)? {
                    let Some(card) = self.find_owned(&entry).await? else {
                        missing.push(entry);
                        continue;
                    };
                    let (name, set_code) = (card.name.clone(), card.set_code.clone());
                    let amount = self.take(card, entry.quantity);
                    if amount < entry.quantity {
                        writeln!(
                            out,
                            "Only {amount} of {} {name} [{set_code}] owned",
                            entry.quantity
                        )?;
                    }
                }
                if !missing.is_empty() {
                    writeln!(out, "Not in the collection:")?;
                    for entry in &missing {
                        writeln!(out, "  {entry}")?;
                    }
                }
                render::hand(out, &self.hand)?;
            }
            HandCommand::Print => render::hand(out, &self.hand)?,
            HandCommand::Prices => {
                let cards = self
                    .hand
                    .iter()
                    .map(|entry| CardRecord {
                        quantity: entry.amount,
                        ..entry.card.clone()
                    })
                    .collect();
                let report = self.prices.report(cards).await?;
                render::prices(out, &report)?;
            }
            HandCommand::Clear => {
                self.hand.clear();
                writeln!(out, "Hand cleared")?;
            }
            HandCommand::Remove => {
                let cards: Vec<_> = self
                    .hand
                    .iter()
                    .map(|entry| (entry.card.uuid, entry.amount))
                    .collect();
                let removed = self.store.remove_cards(self.user.id, &cards).await?;
                self.hand.clear();
                writeln!(out, "Removed {removed} cards from the collection")?;
            }
        }

        Ok(())
    }

    /// Move copies of an owned card into the hand, never more than are owned.
    /// Returns the number of copies in hand afterwards.
    fn take(&mut self, card: CardRecord, amount: u32) -> u32 {
        match self.hand.iter_mut().find(|entry| entry.card.uuid == card.uuid) {
            Some(entry) => {
                entry.amount = entry.amount.saturating_add(amount).min(card.quantity);
                entry.amount
            }
            None => {
                let amount = amount.min(card.quantity);
                self.hand.push(HandCard { card, amount });
                amount
            }
        }
    }

    /// The owned card a deck-list line names. An exact name wins over a single partial match.
    async fn find_owned(&self, entry: &ImportEntry) -> Result<Option<CardRecord>, ShellError> {
        let mut predicate =
            Predicate::all(self.user.id).and(Clause::contains(Column::Name, entry.name.as_str()));
        if let Some(set_code) = &entry.set_code {
            predicate = predicate.and(Clause::contains(Column::SetCode, set_code.as_str()));
        }

        let mut candidates = self.store.find_cards(&predicate, self.user.id, None).await?;
        let exact = candidates
            .iter()
            .position(|card| card.name.eq_ignore_ascii_case(&entry.name));
        Ok(match exact {
            Some(index) => Some(candidates.swap_remove(index)),
            None if candidates.len() == 1 => candidates.pop(),
            None => {
                log::debug!("{} candidates for '{}'", candidates.len(), entry.name);
                None
            }
        })
    }
}

fn prompt<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "> ")?;
    out.flush()
}

fn report_import<W: Write>(out: &mut W, summary: &ImportSummary) -> std::io::Result<()> {
    writeln!(
        out,
        "Added {} copies of {} cards",
        summary.copies, summary.added
    )?;
    if !summary.unresolved.is_empty() {
        writeln!(out, "Not found in the catalogue:")?;
        for entry in &summary.unresolved {
            writeln!(out, "  {entry}")?;
        }
    }
    Ok(())
}
