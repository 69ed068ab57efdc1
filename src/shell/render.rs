//! Tables printed by the shell.

use super::HandCard;
use crate::predicate::Predicate;
use crate::prices::PriceReport;
use crate::store::{CardRecord, User};
use crate::validate::ValidatedToken;
use std::io::{self, Write};
use tabular::{Row, Table};

fn card_row(index: usize, card: &CardRecord, amount: u32) -> Row {
    Row::new()
        .with_cell(index)
        .with_cell(&card.name)
        .with_cell(&card.colors)
        .with_cell(&card.set_code)
        .with_cell(&card.type_line)
        .with_cell(&card.rarity)
        .with_cell(amount)
}

fn money(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => "-".to_string(),
    }
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn cards<W: Write>(out: &mut W, cards: &[CardRecord]) -> io::Result<()> {
    if cards.is_empty() {
        return writeln!(out, "No cards found");
    }

    let mut table = Table::new("{:>}  {:<}  {:<}  {:<}  {:<}  {:<}  {:>}").with_row(
        Row::from_cells(
            ["#", "Name", "Colors", "Set", "Type", "Rarity", "Amount"]
                .iter()
                .cloned(),
        ),
    );
    for (index, card) in cards.iter().enumerate() {
        table.add_row(card_row(index + 1, card, card.quantity));
    }
    write!(out, "{table}")
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn hand<W: Write>(out: &mut W, hand: &[HandCard]) -> io::Result<()> {
    if hand.is_empty() {
        return writeln!(out, "No cards in hand");
    }

    let mut table = Table::new("{:>}  {:<}  {:<}  {:<}  {:<}  {:<}  {:>}").with_row(
        Row::from_cells(
            ["#", "Name", "Colors", "Set", "Type", "Rarity", "In hand"]
                .iter()
                .cloned(),
        ),
    );
    for (index, entry) in hand.iter().enumerate() {
        table.add_row(card_row(index + 1, &entry.card, entry.amount));
    }
    write!(out, "{table}")
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn prices<W: Write>(out: &mut W, report: &PriceReport) -> io::Result<()> {
    let mut table = Table::new("{:>}  {:<}  {:<}  {:>}  {:>}  {:>}  {:>}").with_row(
        Row::from_cells(
            ["#", "Name", "Set", "Amount", "USD", "Foil", "Total"]
                .iter()
                .cloned(),
        ),
    );
    for (index, line) in report.lines.iter().enumerate() {
        let prices = line.prices.unwrap_or_default();
        table.add_row(
            Row::new()
                .with_cell(index + 1)
                .with_cell(&line.card.name)
                .with_cell(&line.card.set_code)
                .with_cell(line.card.quantity)
                .with_cell(money(prices.usd))
                .with_cell(money(prices.usd_foil))
                .with_cell(money(Some(line.total()))),
        );
    }
    write!(out, "{table}")?;
    writeln!(
        out,
        "Total: ${:.2} (prices of {} UTC)",
        report.total(),
        report.timestamp()
    )
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn users<W: Write>(out: &mut W, users: &[User], current: &User) -> io::Result<()> {
    let mut table = Table::new("{:>}  {:<}  {:<}")
        .with_row(Row::from_cells(["Id", "Name", ""].iter().cloned()));
    for user in users {
        let marker = if user.id == current.id { "*" } else { "" };
        table.add_row(
            Row::new()
                .with_cell(user.id)
                .with_cell(&user.name)
                .with_cell(marker),
        );
    }
    write!(out, "{table}")
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn explain<W: Write>(
    out: &mut W,
    tokens: &[ValidatedToken],
    predicate: &Predicate,
) -> io::Result<()> {
    let mut table = Table::new("{:<}  {:<}  {:<}")
        .with_row(Row::from_cells(["Field", "Operator", "Value"].iter().cloned()));
    for token in tokens {
        table.add_row(
            Row::new()
                .with_cell(token.field)
                .with_cell(token.operator)
                .with_cell(format!("{:?}", token.value)),
        );
    }
    write!(out, "{table}")?;
    writeln!(out, "Where: {predicate}")
}
