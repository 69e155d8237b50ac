//! Facet derivation for filter panel options

use crate::models::{Property, ValueRange};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Distinct property types in first-seen catalog order
pub fn distinct_property_types(records: &[Property]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|property| seen.insert(property.property_type.as_str()))
        .map(|property| property.property_type.clone())
        .collect()
}

/// Distinct amenities, sorted
pub fn distinct_amenities(records: &[Property]) -> Vec<String> {
    records
        .iter()
        .flat_map(|property| property.amenities.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct property features, sorted
pub fn distinct_property_features(records: &[Property]) -> Vec<String> {
    records
        .iter()
        .flat_map(|property| property.property_features.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn price_range(records: &[Property]) -> ValueRange {
    ValueRange::from_values(records.iter().map(|property| property.price))
}

/// Range over records with a known construction year
pub fn year_range(records: &[Property]) -> ValueRange {
    ValueRange::from_values(
        records
            .iter()
            .filter_map(|property| property.year_built)
            .map(f64::from),
    )
}

/// Range of HOA fees, reading absent fees as zero
pub fn hoa_range(records: &[Property]) -> ValueRange {
    ValueRange::from_values(records.iter().map(Property::hoa_fees_or_zero))
}

/// All facets of a catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Facets {
    pub property_types: Vec<String>,
    pub amenities: Vec<String>,
    pub property_features: Vec<String>,
    pub price_range: ValueRange,
    pub year_range: ValueRange,
    pub hoa_range: ValueRange,
}

impl Facets {
    pub fn compute(records: &[Property]) -> Self {
        Self {
            property_types: distinct_property_types(records),
            amenities: distinct_amenities(records),
            property_features: distinct_property_features(records),
            price_range: price_range(records),
            year_range: year_range(records),
            hoa_range: hoa_range(records),
        }
    }
}
