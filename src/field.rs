//! The closed vocabulary of the search language: fields, operators and colors.
//!
//! Every field-specific rule lives in one table, [`FieldSpec`], reached through [`Field::spec`].
//! Adding a field means adding an enum variant and one table entry.

use crate::error::ValidationError;
use crate::predicate::Column;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A card attribute a search term can target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// `n`: the card name
    Name,
    /// `t`: the type line
    Type,
    /// `o`: the oracle (rules) text
    OracleText,
    /// `c`: the color identity
    Color,
    /// `s`: the set code
    SetCode,
}

/// The rules attached to a single [`Field`].
pub struct FieldSpec {
    pub field: Field,
    /// Single-letter code used in search expressions.
    pub code: char,
    /// Human readable name, used in error messages.
    pub name: &'static str,
    /// Store column the field is matched against.
    pub column: Column,
    /// Operators the field accepts.
    pub operators: &'static [Operator],
    /// Check for values used with a relational operator.
    pub check_value: fn(&str) -> bool,
}

const TEXT_OPERATORS: &[Operator] = &[Operator::Equals, Operator::Contains];

const COLOR_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::Contains,
    Operator::Greater,
    Operator::GreaterEqual,
    Operator::Less,
    Operator::LessEqual,
];

fn any_value(_: &str) -> bool {
    true
}

fn color_value(value: &str) -> bool {
    value.chars().all(|c| Color::from_symbol(c).is_some())
}

static NAME: FieldSpec = FieldSpec {
    field: Field::Name,
    code: 'n',
    name: "name",
    column: Column::Name,
    operators: TEXT_OPERATORS,
    check_value: any_value,
};

static TYPE: FieldSpec = FieldSpec {
    field: Field::Type,
    code: 't',
    name: "type",
    column: Column::TypeLine,
    operators: TEXT_OPERATORS,
    check_value: any_value,
};

static ORACLE_TEXT: FieldSpec = FieldSpec {
    field: Field::OracleText,
    code: 'o',
    name: "oracle text",
    column: Column::OracleText,
    operators: TEXT_OPERATORS,
    check_value: any_value,
};

static COLOR: FieldSpec = FieldSpec {
    field: Field::Color,
    code: 'c',
    name: "color",
    column: Column::Colors,
    operators: COLOR_OPERATORS,
    check_value: color_value,
};

static SET_CODE: FieldSpec = FieldSpec {
    field: Field::SetCode,
    code: 's',
    name: "set code",
    column: Column::SetCode,
    operators: TEXT_OPERATORS,
    check_value: any_value,
};

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Type,
        Field::OracleText,
        Field::Color,
        Field::SetCode,
    ];

    pub fn spec(self) -> &'static FieldSpec {
        match self {
            Field::Name => &NAME,
            Field::Type => &TYPE,
            Field::OracleText => &ORACLE_TEXT,
            Field::Color => &COLOR,
            Field::SetCode => &SET_CODE,
        }
    }

    /// Look up a field by its single-letter code. Codes are case-insensitive.
    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.into_iter().find(|field| field.spec().code == code)
    }

    pub fn code(self) -> char {
        self.spec().code
    }

    pub fn column(self) -> Column {
        self.spec().column
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.spec().code, self.spec().name)
    }
}

impl FromStr for Field {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => {
                Self::from_code(code).ok_or_else(|| ValidationError::UnknownField(s.to_string()))
            }
            _ => Err(ValidationError::UnknownField(s.to_string())),
        }
    }
}

/// A comparison operator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Equals,
    /// `:`
    Contains,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Equals,
        Operator::Contains,
        Operator::Greater,
        Operator::GreaterEqual,
        Operator::Less,
        Operator::LessEqual,
    ];

    /// Characters an operator is spelled with.
    pub const SYMBOLS: [char; 4] = ['=', ':', '>', '<'];

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equals => "=",
            Operator::Contains => ":",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
        }
    }

    /// Match a complete run of operator characters. Only the six spellings are legal.
    pub fn from_symbols(symbols: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbols)
    }

    pub fn is_symbol(c: char) -> bool {
        Self::SYMBOLS.contains(&c)
    }

    /// `<`, `<=`, `>` and `>=`.
    pub fn is_relational(self) -> bool {
        !matches!(self, Operator::Equals | Operator::Contains)
    }

    /// `>` and `>=`: the card has (at least) these colors.
    pub fn is_greater(self) -> bool {
        matches!(self, Operator::Greater | Operator::GreaterEqual)
    }

    /// `<` and `<=`: the card lacks these colors.
    pub fn is_less(self) -> bool {
        matches!(self, Operator::Less | Operator::LessEqual)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbols(s).ok_or_else(|| ValidationError::UnknownOperator(s.to_string()))
    }
}

/// One of the five colors of the game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// The lower-case letter used in search expressions.
    pub fn symbol(self) -> char {
        match self {
            Color::White => 'w',
            Color::Blue => 'u',
            Color::Black => 'b',
            Color::Red => 'r',
            Color::Green => 'g',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        let symbol = symbol.to_ascii_lowercase();
        Self::ALL.into_iter().find(|color| color.symbol() == symbol)
    }

    /// The mana symbol as printed in a mana cost, e.g. `{R}`.
    pub fn mana_symbol(self) -> &'static str {
        match self {
            Color::White => "{W}",
            Color::Blue => "{U}",
            Color::Black => "{B}",
            Color::Red => "{R}",
            Color::Green => "{G}",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
