use crate::field::{Field, Operator};

/// A search string that could not be split into tokens.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("Unterminated quote starting at position {position}")]
    UnterminatedQuote { position: usize },
    #[error("Missing value for '{field}{operator}' at position {position}")]
    MissingValue {
        field: char,
        operator: String,
        position: usize,
    },
    #[error("Invalid operator '{operator}' at position {position}")]
    InvalidOperator { operator: String, position: usize },
}

/// A token which does not follow the rules of its field.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("'{0}' is not a valid search code")]
    UnknownField(String),
    #[error("'{0}' is not a valid operation")]
    UnknownOperator(String),
    #[error("Field {field} can't be compared with '{operator}'")]
    FieldNotComparable { field: Field, operator: Operator },
    #[error("'{0}' is not a color that is searchable")]
    InvalidColorValue(String),
}

/// Any failure of turning a search string into a predicate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("Field {0} can only be used once")]
    DuplicateField(Field),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
