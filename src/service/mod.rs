mod property_service;

pub use property_service::{FavoriteUpdate, PropertyService};
