//! Query engine: structured filtering, free-text search and facets.
//!
//! Every function here is pure. It reads a catalog slice and a snapshot of
//! favorite ids and returns freshly annotated copies in catalog order.

mod facets;
mod filter;
mod search;

pub use facets::{
    distinct_amenities, distinct_property_features, distinct_property_types, hoa_range,
    price_range, year_range, Facets,
};
pub use filter::{filter_properties, matches_filter};
pub use search::search_properties;

use crate::models::{Property, PropertyId, PropertyView};
use std::collections::HashSet;

/// Copy a record and attach its favorite flag
pub fn annotate(property: &Property, favorites: &HashSet<PropertyId>) -> PropertyView {
    PropertyView::new(property.clone(), favorites.contains(&property.id))
}
