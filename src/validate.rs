use crate::error::ValidationError;
use crate::lexer::Token;
use std::ops::Deref;

/// A [`Token`] which passed [`validate`]. Only these can be compiled.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValidatedToken(Token);

impl ValidatedToken {
    pub fn into_inner(self) -> Token {
        self.0
    }
}

impl Deref for ValidatedToken {
    type Target = Token;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Token> for ValidatedToken {
    type Error = ValidationError;

    fn try_from(token: Token) -> Result<Self, Self::Error> {
        validate(&token)?;
        Ok(Self(token))
    }
}

/// Check a token against the rules of its field.
///
/// Field and operator are closed enums, so unknown codes are rejected when a token is built
/// (see [`Token::from_parts`]). What is left to check is whether the field accepts the operator,
/// and whether the value is acceptable for the field.
pub fn validate(token: &Token) -> Result<(), ValidationError> {
    let spec = token.field.spec();

    if !spec.operators.contains(&token.operator) {
        return Err(ValidationError::FieldNotComparable {
            field: token.field,
            operator: token.operator,
        });
    }

    if !(spec.check_value)(&token.value) {
        return Err(ValidationError::InvalidColorValue(token.value.clone()));
    }

    Ok(())
}

/// Validate a token given by its textual parts, applying all rules in order.
pub fn validate_parts(
    field: &str,
    operator: &str,
    value: &str,
) -> Result<ValidatedToken, ValidationError> {
    Token::from_parts(field, operator, value)?.try_into()
}

/// Validate all tokens. The first failure aborts.
pub fn validate_all(tokens: Vec<Token>) -> Result<Vec<ValidatedToken>, ValidationError> {
    tokens.into_iter().map(ValidatedToken::try_from).collect()
}
