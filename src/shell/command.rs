use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// A line typed into the shell, the first word names the command.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(multicall = true)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Search the collection, e.g. `search t:creature c>gw`
    Search {
        #[arg(required = true, allow_hyphen_values = true)]
        query: String,
    },
    /// Show how a search is understood
    Explain {
        #[arg(required = true, allow_hyphen_values = true)]
        query: String,
    },
    /// List the collection
    Print {
        #[arg(short, long)]
        limit: Option<u64>,
    },
    /// List the collection with current prices
    Prices {
        #[arg(short, long)]
        limit: Option<u64>,
    },
    /// Add the cards of a TCGplayer CSV export or a deck list to the collection
    Add { format: Format, file: PathBuf },
    /// Load an MTGJSON cards.csv into the card catalogue
    Catalog {
        #[arg(required_unless_present = "download", conflicts_with = "download")]
        file: Option<PathBuf>,
        /// Download the current cards.csv from MTGJSON instead
        #[arg(long)]
        download: bool,
    },
    /// Work with the cards in hand, picked from the last search
    Hand {
        #[command(subcommand)]
        command: Option<HandCommand>,
    },
    /// List users
    Users,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum HandCommand {
    /// Take a card of the last search into the hand
    Add {
        /// Row number of the last search
        index: usize,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        amount: Option<u32>,
    },
    /// Take the cards of a deck list from the collection into the hand
    List { file: PathBuf },
    /// List the cards in hand
    Print,
    /// Price the cards in hand
    Prices,
    /// Put all cards back
    Clear,
    /// Remove the cards in hand from the collection
    Remove,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    /// TCGplayer CSV export
    Csv,
    /// Deck list, `<quantity> <name> [<set>]` per line
    Txt,
}

impl Line {
    /// Parse a line.
    ///
    /// Words are split the way a POSIX shell does, so quoted paths may contain spaces. The
    /// expression of `search` and `explain` is passed on as typed, quotes included.
    pub fn parse_line(line: &str) -> Result<Self, clap::Error> {
        let line = line.trim();
        let (name, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        let rest = rest.trim_start();

        if matches!(name, "search" | "explain")
            && !rest.is_empty()
            && !matches!(rest, "-h" | "--help")
        {
            return Self::try_parse_from([name, rest]);
        }

        let words = shell_words::split(line)
            .map_err(|err| clap::Error::raw(ErrorKind::InvalidValue, format!("{err}\n")))?;
        Self::try_parse_from(words)
    }
}

impl Command {
    /// The search expression of a `search` or `explain` command.
    pub fn query(&self) -> Option<&str> {
        match self {
            Command::Search { query } | Command::Explain { query } => Some(query),
            _ => None,
        }
    }
}
