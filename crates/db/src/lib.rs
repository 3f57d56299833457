pub mod connection;
pub mod fixtures;
pub mod lookup;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{SeedDataset, SeedResult, VerificationResult};
pub use lookup::StoreRateLookup;
