use crate::models::format_currency;
use chrono::Datelike;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Structured filter configuration.
///
/// Every key is optional. `None` (or an empty set for the set-valued keys)
/// means no constraint; `Some(0)` is a real bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyFilter {
    /// Substring matched against city, state and address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_beds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_beds: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_hoa_fees: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hoa_fees: Option<f64>,

    /// Accepted property types (any of)
    #[serde(deserialize_with = "nullable_set", skip_serializing_if = "Vec::is_empty")]
    pub property_type: Vec<String>,

    /// Required amenities (at least one of)
    #[serde(deserialize_with = "nullable_set", skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,

    /// Required features (at least one of)
    #[serde(deserialize_with = "nullable_set", skip_serializing_if = "Vec::is_empty")]
    pub property_features: Vec<String>,
}

fn nullable_set<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One field of a [`FilterUpdate`]
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldUpdate<T> {
    /// Leave the current value untouched
    #[default]
    Keep,
    /// Replace the current value
    Set(T),
    /// Remove the constraint
    Clear,
}

impl<T: Clone> FieldUpdate<T> {
    fn resolve(&self, current: &Option<T>) -> Option<T> {
        match self {
            FieldUpdate::Keep => current.clone(),
            FieldUpdate::Set(value) => Some(value.clone()),
            FieldUpdate::Clear => None,
        }
    }
}

impl<T> FieldUpdate<Vec<T>>
where
    T: Clone,
{
    fn resolve_set(&self, current: &[T]) -> Vec<T> {
        match self {
            FieldUpdate::Keep => current.to_vec(),
            FieldUpdate::Set(values) => values.clone(),
            FieldUpdate::Clear => Vec::new(),
        }
    }
}

/// Partial change to a [`PropertyFilter`], applied with [`PropertyFilter::apply`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    pub location: FieldUpdate<String>,
    pub min_price: FieldUpdate<f64>,
    pub max_price: FieldUpdate<f64>,
    pub min_beds: FieldUpdate<u32>,
    pub max_beds: FieldUpdate<u32>,
    pub min_year: FieldUpdate<i32>,
    pub max_year: FieldUpdate<i32>,
    pub min_hoa_fees: FieldUpdate<f64>,
    pub max_hoa_fees: FieldUpdate<f64>,
    pub property_type: FieldUpdate<Vec<String>>,
    pub amenities: FieldUpdate<Vec<String>>,
    pub property_features: FieldUpdate<Vec<String>>,
}

impl PropertyFilter {
    /// Return a new filter with the update merged in; `self` is left unchanged
    pub fn apply(&self, update: &FilterUpdate) -> PropertyFilter {
        PropertyFilter {
            location: update.location.resolve(&self.location),
            min_price: update.min_price.resolve(&self.min_price),
            max_price: update.max_price.resolve(&self.max_price),
            min_beds: update.min_beds.resolve(&self.min_beds),
            max_beds: update.max_beds.resolve(&self.max_beds),
            min_year: update.min_year.resolve(&self.min_year),
            max_year: update.max_year.resolve(&self.max_year),
            min_hoa_fees: update.min_hoa_fees.resolve(&self.min_hoa_fees),
            max_hoa_fees: update.max_hoa_fees.resolve(&self.max_hoa_fees),
            property_type: update.property_type.resolve_set(&self.property_type),
            amenities: update.amenities.resolve_set(&self.amenities),
            property_features: update.property_features.resolve_set(&self.property_features),
        }
    }

    /// Add the type if absent, remove it if present
    pub fn toggle_property_type(&self, property_type: &str) -> PropertyFilter {
        PropertyFilter {
            property_type: toggled(&self.property_type, property_type),
            ..self.clone()
        }
    }

    /// Add the amenity if absent, remove it if present
    pub fn toggle_amenity(&self, amenity: &str) -> PropertyFilter {
        PropertyFilter {
            amenities: toggled(&self.amenities, amenity),
            ..self.clone()
        }
    }

    /// Add the feature if absent, remove it if present
    pub fn toggle_property_feature(&self, feature: &str) -> PropertyFilter {
        PropertyFilter {
            property_features: toggled(&self.property_features, feature),
            ..self.clone()
        }
    }

    /// Trimmed location term, if it constrains anything
    pub fn location_term(&self) -> Option<&str> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    pub fn has_active_filters(&self) -> bool {
        self.location_term().is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.min_beds.is_some()
            || self.max_beds.is_some()
            || self.min_year.is_some()
            || self.max_year.is_some()
            || self.min_hoa_fees.is_some()
            || self.max_hoa_fees.is_some()
            || !self.property_type.is_empty()
            || !self.amenities.is_empty()
            || !self.property_features.is_empty()
    }

    pub fn cleared() -> PropertyFilter {
        PropertyFilter::default()
    }

    /// One chip per active panel constraint, in filter panel order.
    ///
    /// The location term has its own input and gets no chip.
    pub fn summary(&self) -> Vec<FilterChip> {
        let mut chips = Vec::new();

        if self.min_price.is_some() || self.max_price.is_some() {
            chips.push(FilterChip::Price {
                min: self.min_price,
                max: self.max_price,
            });
        }
        if let Some(beds) = self.min_beds {
            chips.push(FilterChip::MinBeds(beds));
        }
        if let Some(beds) = self.max_beds {
            chips.push(FilterChip::MaxBeds(beds));
        }
        if self.min_year.is_some() || self.max_year.is_some() {
            chips.push(FilterChip::YearBuilt {
                min: self.min_year,
                max: self.max_year,
            });
        }
        if self.min_hoa_fees.is_some() || self.max_hoa_fees.is_some() {
            chips.push(FilterChip::HoaFees {
                min: self.min_hoa_fees,
                max: self.max_hoa_fees,
            });
        }
        chips.extend(self.property_type.iter().cloned().map(FilterChip::PropertyType));
        chips.extend(self.amenities.iter().cloned().map(FilterChip::Amenity));
        chips.extend(
            self.property_features
                .iter()
                .cloned()
                .map(FilterChip::PropertyFeature),
        );

        chips
    }

    /// Drop the constraint a chip stands for
    pub fn without(&self, chip: &FilterChip) -> PropertyFilter {
        let mut next = self.clone();
        match chip {
            FilterChip::Price { .. } => {
                next.min_price = None;
                next.max_price = None;
            }
            FilterChip::MinBeds(_) => next.min_beds = None,
            FilterChip::MaxBeds(_) => next.max_beds = None,
            FilterChip::YearBuilt { .. } => {
                next.min_year = None;
                next.max_year = None;
            }
            FilterChip::HoaFees { .. } => {
                next.min_hoa_fees = None;
                next.max_hoa_fees = None;
            }
            FilterChip::PropertyType(value) => next.property_type.retain(|t| t != value),
            FilterChip::Amenity(value) => next.amenities.retain(|a| a != value),
            FilterChip::PropertyFeature(value) => next.property_features.retain(|f| f != value),
        }
        next
    }
}

fn toggled(values: &[String], value: &str) -> Vec<String> {
    if values.iter().any(|v| v == value) {
        values.iter().filter(|v| *v != value).cloned().collect()
    } else {
        let mut next = values.to_vec();
        next.push(value.to_string());
        next
    }
}

/// Human-readable description of one active constraint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FilterChip {
    Price { min: Option<f64>, max: Option<f64> },
    MinBeds(u32),
    MaxBeds(u32),
    YearBuilt { min: Option<i32>, max: Option<i32> },
    HoaFees { min: Option<f64>, max: Option<f64> },
    PropertyType(String),
    Amenity(String),
    PropertyFeature(String),
}

impl fmt::Display for FilterChip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterChip::Price { min, max } => write!(
                f,
                "Price: {} - {}",
                format_currency(min.unwrap_or(0.0)),
                max.map(format_currency).unwrap_or_else(|| "Any".to_string())
            ),
            FilterChip::MinBeds(beds) => write!(f, "{}+ beds", beds),
            FilterChip::MaxBeds(beds) => write!(f, "{} beds max", beds),
            FilterChip::YearBuilt { min, max } => write!(
                f,
                "Built: {} - {}",
                min.map(|y| y.to_string()).unwrap_or_else(|| "Any".to_string()),
                max.unwrap_or_else(|| chrono::Utc::now().year())
            ),
            // HOA amounts are shown without digit grouping
            FilterChip::HoaFees { min, max } => write!(
                f,
                "HOA: ${} - {}",
                min.unwrap_or(0.0),
                max.map(|fee| format!("${}", fee))
                    .unwrap_or_else(|| "Any".to_string())
            ),
            FilterChip::PropertyType(value) => write!(f, "Type: {}", value),
            FilterChip::Amenity(value) => write!(f, "{}", value),
            FilterChip::PropertyFeature(value) => write!(f, "Feature: {}", value),
        }
    }
}
