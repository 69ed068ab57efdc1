//! binder - MTG collection manager
//!
//! Logs in as a user and reads shell commands from stdin.

use binder::config::Options;
use binder::prices::ScryfallClient;
use binder::shell::Shell;
use binder::store::{CardStore, SqlStore, StoreError, User};
use clap::Parser;

async fn login(store: &SqlStore, options: &Options) -> Result<User, StoreError> {
    match store.user(&options.user).await? {
        Some(user) => Ok(user),
        None if options.create_user => store.create_user(&options.user).await,
        None => Err(StoreError::UnknownUser(options.user.clone())),
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = Options::parse();
    log::info!("Database path: {}", options.database.display());

    if let Some(parent) = options.database.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::error!("Failed to create database directory: {}", e);
                std::process::exit(1);
            }
            log::info!("Created directory: {}", parent.display());
        }
    }

    let store = match SqlStore::connect(&options.database_url()).await {
        Ok(store) => store,
        Err(e) => {
            log::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let user = match login(&store, &options).await {
        Ok(user) => user,
        Err(e) => {
            log::error!("Failed to log in: {}", e);
            std::process::exit(1);
        }
    };

    let prices = match ScryfallClient::new(options.scryfall_url.as_str()) {
        Ok(prices) => prices,
        Err(e) => {
            log::error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Logged in as {}", user.name);
    let mut shell =
        Shell::new(store, user, prices, options.limit).with_catalog_url(options.catalog_url);
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    if let Err(e) = shell.run(stdin.lock(), &mut stdout).await {
        log::error!("Shell failed: {}", e);
        std::process::exit(1);
    }
}
