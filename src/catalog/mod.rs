//! Read-only property catalog.
//!
//! The catalog is loaded once at startup and never mutated afterwards.
//! Records keep their source order, which every query result preserves.

use crate::config::CatalogConfig;
use crate::error::{AppError, Result};
use crate::models::{Property, PropertyId};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use validator::Validate;

/// Immutable, cheaply clonable collection of listings
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    records: Arc<[Property]>,
    index: Arc<HashMap<PropertyId, usize>>,
}

impl CatalogStore {
    /// Build a catalog from already-parsed records, validating each one
    pub fn new(records: Vec<Property>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());

        for (position, property) in records.iter().enumerate() {
            property.validate().map_err(|e| {
                AppError::Validation(format!("Property {} is invalid: {}", property.id, e))
            })?;

            if index.insert(property.id, position).is_some() {
                return Err(AppError::Validation(format!(
                    "Duplicate property id {} in catalog",
                    property.id
                )));
            }
        }

        tracing::debug!(records = records.len(), "Catalog built");

        Ok(Self {
            records: records.into(),
            index: Arc::new(index),
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON array of property records
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<Property> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Load a JSON array of property records from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;

        tracing::info!(path = ?path, records = catalog.len(), "Loaded property catalog");
        Ok(catalog)
    }

    /// Load the catalog named by configuration; no path yields an empty catalog
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        match config.path {
            Some(ref path) => Self::from_path(path),
            None => {
                tracing::warn!("No catalog path configured, starting with an empty catalog");
                Ok(Self::empty())
            }
        }
    }

    /// All records in source order
    pub fn all(&self) -> &[Property] {
        &self.records
    }

    pub fn get(&self, id: PropertyId) -> Option<&Property> {
        self.index.get(&id).map(|&position| &self.records[position])
    }

    pub fn contains(&self, id: PropertyId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingType;
    use tempfile::TempDir;

    fn property(id: PropertyId) -> Property {
        Property {
            id,
            title: format!("Listing {}", id),
            description: String::new(),
            address: "1 Main St".to_string(),
            city: "Denver".to_string(),
            state: "CO".to_string(),
            zip_code: "80202".to_string(),
            price: 100_000.0 * id as f64,
            listing_type: ListingType::ForSale,
            property_type: "House".to_string(),
            bedrooms: 2,
            bathrooms: 1.0,
            square_feet: 1200,
            year_built: Some(2001),
            hoa_fees: None,
            amenities: vec![],
            property_features: vec![],
            images: vec!["a.jpg".to_string()],
        }
    }

    #[test]
    fn test_order_and_lookup() {
        let catalog = CatalogStore::new(vec![property(3), property(1), property(2)]).unwrap();

        let ids: Vec<PropertyId> = catalog.all().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(catalog.get(1).unwrap().title, "Listing 1");
        assert!(catalog.get(42).is_none());
        assert!(catalog.contains(2));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let result = CatalogStore::new(vec![property(1), property(1)]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_invalid_record() {
        let mut bad = property(1);
        bad.square_feet = 0;
        assert!(CatalogStore::new(vec![bad]).is_err());
    }

    #[test]
    fn test_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("properties.json");
        std::fs::write(&path, serde_json::to_string(&vec![property(5)]).unwrap()).unwrap();

        let catalog = CatalogStore::from_path(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(5).unwrap().city, "Denver");
    }

    #[test]
    fn test_missing_path_config_is_empty() {
        let catalog = CatalogStore::from_config(&CatalogConfig { path: None }).unwrap();
        assert!(catalog.is_empty());
    }
}
