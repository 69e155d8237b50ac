pub mod store;
pub mod sled_store;
pub mod factory;
pub mod ledger;

pub use store::*;
pub use sled_store::SledStore;
pub use factory::{create_store, create_in_memory_store};
pub use ledger::{FavoriteLedger, PersistenceWarning, ToggleOutcome};
