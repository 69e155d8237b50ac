//! Property listing browser: an immutable catalog of listings, a persisted
//! favorites ledger, and a query engine exposed through [`service::PropertyService`].

pub mod advisor;
pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod query;
pub mod service;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use service::{FavoriteUpdate, PropertyService};
