//! SeaORM entities of the collection database.
//!
//! The `cards` table follows the column names of MTGJSON printings.

pub mod card;
pub mod user;
pub mod user_card;
