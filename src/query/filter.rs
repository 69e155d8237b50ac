//! Structured filter evaluation

use crate::models::{Property, PropertyFilter, PropertyId, PropertyView};
use crate::query::annotate;
use std::collections::HashSet;

/// Keep the records that satisfy every active key of `filter`, in catalog order
pub fn filter_properties(
    records: &[Property],
    favorites: &HashSet<PropertyId>,
    filter: &PropertyFilter,
) -> Vec<PropertyView> {
    let location = filter.location_term().map(str::to_lowercase);

    records
        .iter()
        .filter(|property| matches(property, filter, location.as_deref()))
        .map(|property| annotate(property, favorites))
        .collect()
}

/// Whether a single record passes `filter`
pub fn matches_filter(property: &Property, filter: &PropertyFilter) -> bool {
    let location = filter.location_term().map(str::to_lowercase);
    matches(property, filter, location.as_deref())
}

fn matches(property: &Property, filter: &PropertyFilter, location: Option<&str>) -> bool {
    // Location: any of city, state, address
    let location_match = location.map_or(true, |term| {
        property.city.to_lowercase().contains(term)
            || property.state.to_lowercase().contains(term)
            || property.address.to_lowercase().contains(term)
    });

    let price_match = within(property.price, filter.min_price, filter.max_price);

    let beds_match = within(property.bedrooms, filter.min_beds, filter.max_beds);

    // A listing without a construction year cannot satisfy a year bound
    let year_match = match property.year_built {
        Some(year) => within(year, filter.min_year, filter.max_year),
        None => filter.min_year.is_none() && filter.max_year.is_none(),
    };

    let hoa_match = within(
        property.hoa_fees_or_zero(),
        filter.min_hoa_fees,
        filter.max_hoa_fees,
    );

    let type_match = filter.property_type.is_empty()
        || filter.property_type.contains(&property.property_type);

    let amenity_match = any_shared(&filter.amenities, &property.amenities);

    let feature_match = any_shared(&filter.property_features, &property.property_features);

    location_match
        && price_match
        && beds_match
        && year_match
        && hoa_match
        && type_match
        && amenity_match
        && feature_match
}

/// Inclusive bounds; an absent bound does not constrain
fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}

/// Empty `wanted` accepts everything, otherwise at least one value must be shared
fn any_shared(wanted: &[String], present: &[String]) -> bool {
    wanted.is_empty() || wanted.iter().any(|value| present.contains(value))
}
