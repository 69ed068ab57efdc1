use clap::Parser;
use std::path::PathBuf;

/// Keep track of a card collection and search it
#[derive(Parser, Clone, Debug, PartialEq, Eq)]
#[command(name = "binder")]
#[command(version, about, long_about = None)]
pub struct Options {
    /// Path to the SQLite database file
    #[arg(short, long, env = "BINDER_DATABASE", default_value_os_t = default_db_path())]
    pub database: PathBuf,

    /// Name of the collection owner
    #[arg(short, long, env = "BINDER_USER")]
    pub user: String,

    /// Create the user if it does not exist yet
    #[arg(long, default_value_t = false)]
    pub create_user: bool,

    /// Base URL of the Scryfall API
    #[arg(long, env = "BINDER_SCRYFALL_URL", default_value = crate::prices::DEFAULT_URL)]
    pub scryfall_url: String,

    /// Where `catalog --download` fetches the MTGJSON cards.csv from
    #[arg(long, env = "BINDER_CATALOG_URL", default_value = crate::import::catalog::DEFAULT_URL)]
    pub catalog_url: String,

    /// Default number of rows listed by commands
    #[arg(short, long, env = "BINDER_LIMIT", default_value_t = 10)]
    pub limit: u64,
}

/// Returns the default database path: ~/.local/share/binder/collection.sqlite
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("binder")
        .join("collection.sqlite")
}

impl Options {
    /// The SeaORM connection string, creating the file if missing.
    pub fn database_url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.database.display())
    }
}
