//! Deck-list text: one `<quantity> <name> [<set>]` per line.
//!
//! ```text
//! Deck
//! 4 Lightning Bolt [M10]
//! 2 Shock (Showcase) [M21]
//! 1 Island
//! ```

use super::{split_variant, ImportEntry, ImportError};
use chumsky::prelude::*;
use std::path::Path;

type Extra<'a> = extra::Err<Simple<'a, char>>;

/// A parsed line, borrowing from the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckLine<'a> {
    pub quantity: &'a str,
    pub name: &'a str,
    pub set_code: Option<&'a str>,
}

pub fn quantity<'a>() -> impl Parser<'a, &'a str, &'a str, Extra<'a>> {
    any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .to_slice()
}

pub fn name<'a>() -> impl Parser<'a, &'a str, &'a str, Extra<'a>> {
    none_of('[')
        .repeated()
        .at_least(1)
        .to_slice()
        .map(str::trim)
}

pub fn set_code<'a>() -> impl Parser<'a, &'a str, &'a str, Extra<'a>> {
    just('[')
        .ignore_then(none_of(']').repeated().at_least(1).to_slice())
        .then_ignore(just(']'))
        .map(str::trim)
}

pub fn line<'a>() -> impl Parser<'a, &'a str, DeckLine<'a>, Extra<'a>> {
    quantity()
        .then_ignore(
            any()
                .filter(|c: &char| c.is_whitespace())
                .repeated()
                .at_least(1),
        )
        .then(name())
        .then(set_code().or_not())
        .padded()
        .then_ignore(end())
        .map(|((quantity, name), set_code)| DeckLine {
            quantity,
            name,
            set_code,
        })
}

fn entry(line: DeckLine) -> Option<ImportEntry> {
    let quantity = line.quantity.parse().ok()?;
    let (name, variant) = split_variant(line.name);
    if name.is_empty() {
        return None;
    }

    Some(ImportEntry {
        name: name.to_string(),
        quantity,
        set_code: line.set_code.map(ToString::to_string),
        product_id: None,
        variant,
    })
}

/// Parse a deck list. A first line which is not a card line is taken as a header and skipped.
pub fn parse(text: &str) -> Result<Vec<ImportEntry>, ImportError> {
    let mut result = Vec::new();

    for (index, content) in text.lines().enumerate() {
        if content.trim().is_empty() {
            continue;
        }

        match line().parse(content).into_result().ok().and_then(entry) {
            Some(entry) => result.push(entry),
            None if index == 0 => {
                log::debug!("Skipping header: {content}");
            }
            None => {
                return Err(ImportError::Line {
                    line: index + 1,
                    content: content.to_string(),
                })
            }
        }
    }

    Ok(result)
}

pub fn read(path: &Path) -> Result<Vec<ImportEntry>, ImportError> {
    parse(&std::fs::read_to_string(path)?)
}
