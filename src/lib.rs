//! Track a trading card collection and search it.
//!
//! The heart of the crate is a small search language, compiled in three steps:
//!
//! * [`lexer`]: split `c>wu t:creature n:"lightning bolt"` into tokens
//! * [`validate`]: check every token against the rules of its field
//! * [`predicate`]: compile the tokens into a storage agnostic [`Predicate`]
//!
//! ```
//! use binder::{search, OwnerId};
//!
//! let predicate = search(r#"t:creature c:gw s:"znr""#, OwnerId(1)).unwrap();
//! assert_eq!(predicate.clauses().len(), 3);
//! ```
//!
//! The collaborators around it keep the collection in a [`store`], [`import`] card lists and
//! look up [`prices`]. The [`shell`] ties everything together.

pub mod config;
pub mod error;
pub mod field;
pub mod import;
pub mod lexer;
pub mod predicate;
pub mod prices;
pub mod shell;
pub mod store;
pub mod validate;

#[cfg(feature = "sea-orm")]
pub mod sea_orm;

pub use error::{Error, LexError, ValidationError};
pub use predicate::{compile, OwnerId, Predicate};

pub mod prelude {
    pub use crate::error::*;
    pub use crate::field::{Color, Field, Operator};
    pub use crate::lexer::{tokenize, Token};
    pub use crate::predicate::{compile, Clause, Column, Columns, OwnerId, Predicate};
    pub use crate::store::{CardRecord, CardStore, User};
    pub use crate::validate::{validate, ValidatedToken};
    pub use crate::{parse, search};
}

pub use ::chumsky;

/// Tokenize and validate a search string.
pub fn parse(input: &str) -> Result<Vec<validate::ValidatedToken>, Error> {
    let tokens = lexer::tokenize(input)?;
    Ok(validate::validate_all(tokens)?)
}

/// Compile a search string into a predicate for the given owner.
pub fn search(input: &str, owner: OwnerId) -> Result<Predicate, Error> {
    Ok(compile(&parse(input)?, owner))
}
