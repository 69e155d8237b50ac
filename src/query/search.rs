//! Free-text search

use crate::models::{Property, PropertyId, PropertyView};
use crate::query::annotate;
use std::collections::HashSet;

/// Case-insensitive substring search over title, city, state, address and
/// description. A record matches when any one field contains the query.
/// A blank query returns the whole catalog.
pub fn search_properties(
    records: &[Property],
    favorites: &HashSet<PropertyId>,
    query: &str,
) -> Vec<PropertyView> {
    let term = query.trim().to_lowercase();

    records
        .iter()
        .filter(|property| term.is_empty() || text_matches(property, &term))
        .map(|property| annotate(property, favorites))
        .collect()
}

fn text_matches(property: &Property, term: &str) -> bool {
    [
        &property.title,
        &property.city,
        &property.state,
        &property.address,
        &property.description,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(term))
}
