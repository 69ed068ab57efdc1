//! The compiled form of a search: a flat conjunction of clauses over card columns.
//!
//! A [`Predicate`] is storage agnostic. Stores either translate it (see the `sea_orm` module) or
//! evaluate it directly with [`Predicate::matches`].

use crate::field::{Color, Operator};
use crate::lexer::Token;
use crate::validate::ValidatedToken;
use std::fmt::{Display, Formatter};

/// The collection owner a search is scoped to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub i32);

impl Display for OwnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A card column a clause can test.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    TypeLine,
    OracleText,
    Colors,
    SetCode,
    ManaCost,
}

impl Column {
    /// The column name of the card catalogue.
    pub fn name(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::TypeLine => "type",
            Column::OracleText => "text",
            Column::Colors => "colors",
            Column::SetCode => "setCode",
            Column::ManaCost => "manaCost",
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Access to the column values of a card, for in-memory evaluation.
pub trait Columns {
    fn column(&self, column: Column) -> &str;
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Clause {
    /// The column contains the value, ignoring case.
    Contains { column: Column, value: String },
    /// The column does not contain the value, ignoring case.
    Lacks { column: Column, value: String },
    /// The card has more than one color.
    MultiColor,
}

impl Clause {
    pub fn contains(column: Column, value: impl Into<String>) -> Self {
        Self::Contains {
            column,
            value: value.into(),
        }
    }

    pub fn lacks(column: Column, value: impl Into<String>) -> Self {
        Self::Lacks {
            column,
            value: value.into(),
        }
    }

    pub fn matches<C: Columns + ?Sized>(&self, card: &C) -> bool {
        match self {
            Clause::Contains { column, value } => contains_ignore_case(card.column(*column), value),
            Clause::Lacks { column, value } => !contains_ignore_case(card.column(*column), value),
            Clause::MultiColor => {
                card.column(Column::Colors)
                    .chars()
                    .filter(|c| Color::from_symbol(*c).is_some())
                    .count()
                    > 1
            }
        }
    }
}

/// Substring test ignoring ASCII case only, like SQLite's `LIKE`. No wildcards.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

impl Display for Clause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Clause::Contains { column, value } => write!(f, "{column} CONTAINS '{value}'"),
            Clause::Lacks { column, value } => write!(f, "{column} LACKS '{value}'"),
            Clause::MultiColor => write!(f, "{} MULTICOLOR", Column::Colors),
        }
    }
}

/// All clauses must hold. An empty predicate matches every card of the owner.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Predicate {
    scope: OwnerId,
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn all(scope: OwnerId) -> Self {
        Self {
            scope,
            clauses: vec![],
        }
    }

    pub fn scope(&self) -> OwnerId {
        self.scope
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Add one more clause that must hold.
    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn matches<C: Columns + ?Sized>(&self, card: &C) -> bool {
        self.clauses.iter().all(|clause| clause.matches(card))
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.clauses.is_empty() {
            return f.write_str("*");
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" AND ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

/// Compile validated tokens into a predicate, keeping token order.
pub fn compile(tokens: &[ValidatedToken], scope: OwnerId) -> Predicate {
    let mut clauses = Vec::new();
    for token in tokens {
        compile_token(token, &mut clauses);
    }
    Predicate { scope, clauses }
}

fn compile_token(token: &Token, clauses: &mut Vec<Clause>) {
    let column = token.field.column();

    match token.operator {
        Operator::Equals | Operator::Contains => {
            clauses.push(Clause::contains(column, &token.value));
        }
        Operator::Less | Operator::LessEqual => {
            for color in token.value.chars().filter_map(Color::from_symbol) {
                clauses.push(Clause::lacks(Column::ManaCost, color.mana_symbol()));
            }
        }
        Operator::Greater | Operator::GreaterEqual => {
            for symbol in token.value.chars() {
                clauses.push(Clause::contains(column, symbol));
            }
            // TODO: `>` and `>=` share one meaning until "exactly these colors" is defined
            if token.value.chars().count() > 1 {
                clauses.push(Clause::MultiColor);
            }
        }
    }
}
