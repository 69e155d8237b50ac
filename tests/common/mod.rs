//! Shared fixtures for the integration suites

#![allow(dead_code)]

use property_browser::{
    catalog::CatalogStore,
    config::ServiceConfig,
    models::{ListingType, Property, PropertyId},
    state::{FavoriteLedger, PreferenceStore},
    PropertyService,
};
use std::sync::Arc;

pub const FAVORITES_KEY: &str = "propertyFavorites";

pub fn property(
    id: PropertyId,
    property_type: &str,
    price: f64,
    bedrooms: u32,
    amenities: &[&str],
) -> Property {
    Property {
        id,
        title: format!("Listing {}", id),
        description: String::new(),
        address: format!("{} Elm Street", id),
        city: "Denver".to_string(),
        state: "CO".to_string(),
        zip_code: "80202".to_string(),
        price,
        listing_type: ListingType::ForSale,
        property_type: property_type.to_string(),
        bedrooms,
        bathrooms: 1.5,
        square_feet: 1200,
        year_built: Some(2001),
        hoa_fees: None,
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        property_features: vec![],
        images: vec![format!("https://images.example.com/{}.jpg", id)],
    }
}

/// A 2-bed condo with a pool and a 4-bed house with a garage
pub fn condo_and_house() -> Vec<Property> {
    let mut condo = property(1, "Condo", 300_000.0, 2, &["Pool"]);
    condo.title = "Sunny Two Bedroom".to_string();
    let mut house = property(2, "House", 600_000.0, 4, &["Garage"]);
    house.title = "Spacious Family Home".to_string();
    vec![condo, house]
}

pub async fn service_over(records: Vec<Property>, store: Arc<dyn PreferenceStore>) -> PropertyService {
    let catalog = CatalogStore::new(records).expect("valid catalog");
    let ledger = FavoriteLedger::load(store, FAVORITES_KEY).await;
    PropertyService::new(catalog, Arc::new(ledger), ServiceConfig::immediate())
}
