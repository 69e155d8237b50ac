//! Data access facade over the catalog, the favorite ledger and the query engine

use crate::advisor::{merge_recommendations, AdvisorClient};
use crate::catalog::CatalogStore;
use crate::config::{Config, ServiceConfig};
use crate::error::{AppError, Result};
use crate::metrics::{measure_operation, record_toggle};
use crate::models::{Advice, AdvisorRequest, PropertyFilter, PropertyId, PropertyView, ValueRange};
use crate::query::{self, Facets};
use crate::state::{create_store, FavoriteLedger, PersistenceWarning};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Result of [`PropertyService::toggle_favorite`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteUpdate {
    /// The record with its refreshed favorite flag
    pub property: PropertyView,
    /// Set when the change could not be persisted
    pub warning: Option<PersistenceWarning>,
}

/// The single entry point callers use to read listings and manage favorites.
///
/// Every call waits for the configured artificial latency before answering.
/// Returned records are always copies.
pub struct PropertyService {
    catalog: CatalogStore,
    ledger: Arc<FavoriteLedger>,
    facets: Facets,
    config: ServiceConfig,
    collection_reads: AtomicU64,
}

impl PropertyService {
    /// Create a new property service
    pub fn new(catalog: CatalogStore, ledger: Arc<FavoriteLedger>, config: ServiceConfig) -> Self {
        let facets = Facets::compute(catalog.all());

        tracing::info!(
            properties = catalog.len(),
            favorites = ledger.len(),
            "Property service initialized"
        );

        Self {
            catalog,
            ledger,
            facets,
            config,
            collection_reads: AtomicU64::new(0),
        }
    }

    /// Build catalog, preference store and ledger from configuration
    pub async fn from_config(config: &Config) -> Result<Self> {
        let catalog = CatalogStore::from_config(&config.catalog)?;
        let store = create_store(&config.state)?;
        let ledger = FavoriteLedger::load(store, config.state.favorites_key.clone()).await;

        Ok(Self::new(catalog, Arc::new(ledger), config.service.clone()))
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn ledger(&self) -> &FavoriteLedger {
        &self.ledger
    }

    /// All listings passing `filter`; the default filter returns the whole catalog
    pub async fn get_all(&self, filter: &PropertyFilter) -> Result<Vec<PropertyView>> {
        measure_operation("get_all", async {
            self.delay(self.config.read_latency_ms).await;
            self.check_injected_fault("get_all")?;

            let result = query::filter_properties(self.catalog.all(), &self.ledger.all(), filter);
            tracing::debug!(results = result.len(), active = filter.has_active_filters(), "Filtered properties");
            Ok::<_, AppError>(result)
        })
        .await
    }

    /// Look up a single listing; an unknown id yields `None`
    pub async fn get_by_id(&self, id: PropertyId) -> Option<PropertyView> {
        let result = measure_operation("get_by_id", async {
            self.delay(self.config.read_latency_ms).await;
            Ok::<_, AppError>(self.view(id))
        })
        .await;

        match result {
            Ok(view) => {
                if view.is_none() {
                    tracing::debug!(property_id = id, "Property not found");
                }
                view
            }
            Err(_) => None,
        }
    }

    /// Favorited listings in catalog order
    pub async fn get_favorites(&self) -> Result<Vec<PropertyView>> {
        measure_operation("get_favorites", async {
            self.delay(self.config.read_latency_ms).await;
            self.check_injected_fault("get_favorites")?;

            let favorites = self.ledger.all();
            let result: Vec<PropertyView> =
                query::filter_properties(self.catalog.all(), &favorites, &PropertyFilter::default())
                    .into_iter()
                    .filter(|view| view.is_favorite)
                    .collect();
            Ok::<_, AppError>(result)
        })
        .await
    }

    /// Flip the favorite flag of a listing.
    ///
    /// Ids unknown to the catalog are left out of the ledger and yield `None`.
    pub async fn toggle_favorite(&self, id: PropertyId) -> Option<FavoriteUpdate> {
        let result = measure_operation("toggle_favorite", async {
            self.delay(self.config.toggle_latency_ms).await;

            let Some(property) = self.catalog.get(id) else {
                tracing::debug!(property_id = id, "Ignoring favorite toggle for unknown property");
                return Ok::<_, AppError>(None);
            };

            let outcome = self.ledger.toggle(id).await;
            record_toggle(outcome.is_favorite, outcome.warning.is_none());

            tracing::info!(
                property_id = id,
                is_favorite = outcome.is_favorite,
                persisted = outcome.warning.is_none(),
                "Favorite updated"
            );

            Ok(Some(FavoriteUpdate {
                property: PropertyView::new(property.clone(), outcome.is_favorite),
                warning: outcome.warning,
            }))
        })
        .await;

        result.ok().flatten()
    }

    /// Free-text search; a blank query returns the whole catalog
    pub async fn search(&self, text: &str) -> Result<Vec<PropertyView>> {
        measure_operation("search", async {
            self.delay(self.config.read_latency_ms).await;
            self.check_injected_fault("search")?;

            let result = query::search_properties(self.catalog.all(), &self.ledger.all(), text);
            tracing::debug!(query = text, results = result.len(), "Searched properties");
            Ok::<_, AppError>(result)
        })
        .await
    }

    /// Route to search when a non-blank query is given, otherwise to the structured filter
    pub async fn load(
        &self,
        search_query: Option<&str>,
        filter: &PropertyFilter,
    ) -> Result<Vec<PropertyView>> {
        match search_query.filter(|q| !q.trim().is_empty()) {
            Some(text) => self.search(text).await,
            None => self.get_all(filter).await,
        }
    }

    /// Ask the recommendation function for listings matching a free-text brief
    pub async fn advise(&self, client: &dyn AdvisorClient, brief: &str) -> Result<Advice> {
        if brief.trim().is_empty() {
            return Err(AppError::Validation(
                "Please enter your property requirements".to_string(),
            ));
        }

        let properties = self.get_all(&PropertyFilter::default()).await?;

        measure_operation("advise", async {
            let request = AdvisorRequest {
                query: brief.to_string(),
                properties: properties.clone(),
            };

            let data = client.recommend(&request).await?.into_result()?;
            let advice = merge_recommendations(&properties, data);

            tracing::info!(recommendations = advice.recommendations.len(), "Advisor recommendations merged");
            Ok::<_, AppError>(advice)
        })
        .await
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub async fn get_property_types(&self) -> Vec<String> {
        self.delay(self.config.read_latency_ms).await;
        self.facets.property_types.clone()
    }

    /// Distinct amenities, sorted
    pub async fn get_all_amenities(&self) -> Vec<String> {
        self.delay(self.config.read_latency_ms).await;
        self.facets.amenities.clone()
    }

    pub async fn get_property_features(&self) -> Vec<String> {
        self.delay(self.config.read_latency_ms).await;
        self.facets.property_features.clone()
    }

    pub async fn get_price_range(&self) -> ValueRange {
        self.delay(self.config.read_latency_ms).await;
        self.facets.price_range
    }

    /// Construction year range over listings with a known year
    pub async fn get_year_range(&self) -> ValueRange {
        self.delay(self.config.read_latency_ms).await;
        self.facets.year_range
    }

    pub async fn get_hoa_range(&self) -> ValueRange {
        self.delay(self.config.read_latency_ms).await;
        self.facets.hoa_range
    }

    fn view(&self, id: PropertyId) -> Option<PropertyView> {
        self.catalog
            .get(id)
            .map(|property| PropertyView::new(property.clone(), self.ledger.is_favorite(id)))
    }

    async fn delay(&self, ms: u64) {
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn check_injected_fault(&self, operation: &str) -> Result<()> {
        let Some(every) = self.config.fault_injection_every.filter(|&n| n > 0) else {
            return Ok(());
        };

        let reads = self.collection_reads.fetch_add(1, Ordering::Relaxed) + 1;
        if reads % u64::from(every) == 0 {
            tracing::warn!(operation = operation, reads, "Injected transient load failure");
            return Err(AppError::TransientLoad(format!(
                "{} failed, please try again",
                operation
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ListingType, Property};
    use crate::state::InMemoryStore;

    fn property(id: PropertyId, price: f64, property_type: &str, amenity: &str) -> Property {
        Property {
            id,
            title: format!("Listing {}", id),
            description: String::new(),
            address: format!("{} Main St", id),
            city: "Boise".to_string(),
            state: "ID".to_string(),
            zip_code: "83702".to_string(),
            price,
            listing_type: ListingType::ForSale,
            property_type: property_type.to_string(),
            bedrooms: 2,
            bathrooms: 1.0,
            square_feet: 1000,
            year_built: Some(2010),
            hoa_fees: None,
            amenities: vec![amenity.to_string()],
            property_features: vec![],
            images: vec!["img.jpg".to_string()],
        }
    }

    async fn service_with(config: ServiceConfig) -> PropertyService {
        let catalog = CatalogStore::new(vec![
            property(1, 300_000.0, "Condo", "Pool"),
            property(2, 600_000.0, "House", "Garage"),
        ])
        .unwrap();
        let ledger = FavoriteLedger::load(Arc::new(InMemoryStore::new()), "propertyFavorites").await;
        PropertyService::new(catalog, Arc::new(ledger), config)
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_none() {
        let service = service_with(ServiceConfig::immediate()).await;
        assert!(service.get_by_id(99).await.is_none());
        assert_eq!(service.get_by_id(2).await.unwrap().id(), 2);
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_leaves_ledger_untouched() {
        let service = service_with(ServiceConfig::immediate()).await;
        assert!(service.toggle_favorite(42).await.is_none());
        assert!(service.ledger().is_empty());
    }

    #[tokio::test]
    async fn test_get_favorites() {
        let service = service_with(ServiceConfig::immediate()).await;
        service.toggle_favorite(2).await.unwrap();

        let favorites = service.get_favorites().await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id(), 2);
        assert!(favorites[0].is_favorite);
    }

    #[tokio::test]
    async fn test_load_routes_blank_query_to_filter() {
        let service = service_with(ServiceConfig::immediate()).await;
        let filter = PropertyFilter {
            min_price: Some(400_000.0),
            ..Default::default()
        };

        let filtered = service.load(Some("  "), &filter).await.unwrap();
        assert_eq!(filtered.len(), 1);

        // A search ignores the structured filter
        let searched = service.load(Some("listing"), &filter).await.unwrap();
        assert_eq!(searched.len(), 2);
    }

    #[tokio::test]
    async fn test_injected_fault_is_retryable() {
        let config = ServiceConfig {
            fault_injection_every: Some(2),
            ..ServiceConfig::immediate()
        };
        let service = service_with(config).await;

        assert!(service.get_all(&PropertyFilter::default()).await.is_ok());
        let err = service.get_all(&PropertyFilter::default()).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(service.get_all(&PropertyFilter::default()).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_wait_for_simulated_latency() {
        let service = service_with(ServiceConfig::default()).await;

        let start = tokio::time::Instant::now();
        service.get_all(&PropertyFilter::default()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(300));

        let start = tokio::time::Instant::now();
        service.toggle_favorite(1).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_facets() {
        let service = service_with(ServiceConfig::immediate()).await;

        assert_eq!(service.get_property_types().await, vec!["Condo", "House"]);
        assert_eq!(service.get_all_amenities().await, vec!["Garage", "Pool"]);
        assert!(service.get_property_features().await.is_empty());
        assert_eq!(
            service.get_price_range().await,
            ValueRange { min: 300_000.0, max: 600_000.0 }
        );
        assert_eq!(service.get_year_range().await, ValueRange { min: 2010.0, max: 2010.0 });
        assert_eq!(service.get_hoa_range().await, ValueRange::EMPTY);
    }
}
