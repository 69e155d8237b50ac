use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use validator::Validate;

/// Stable identity key of a listing
pub type PropertyId = u64;

/// A real-estate listing as loaded from the catalog source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// Unique identifier
    #[serde(rename = "Id", alias = "id")]
    #[validate(range(min = 1))]
    pub id: PropertyId,

    #[validate(length(min = 1))]
    pub title: String,

    #[serde(default)]
    pub description: String,

    pub address: String,

    pub city: String,

    pub state: String,

    #[serde(default)]
    pub zip_code: String,

    /// Sale price, or monthly rent for rentals
    #[validate(range(min = 0.0))]
    pub price: f64,

    pub listing_type: ListingType,

    /// Open set of values such as "House" or "Condo"
    pub property_type: String,

    pub bedrooms: u32,

    #[validate(range(min = 0.0))]
    pub bathrooms: f64,

    #[validate(range(min = 1))]
    pub square_feet: u32,

    #[serde(default)]
    pub year_built: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub hoa_fees: Option<f64>,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub property_features: Vec<String>,

    #[validate(length(min = 1))]
    pub images: Vec<String>,
}

impl Property {
    /// HOA fees with an absent value read as zero
    pub fn hoa_fees_or_zero(&self) -> f64 {
        self.hoa_fees.unwrap_or(0.0)
    }

    /// Price as shown on a listing card: `$450,000` or `$2,500/mo`
    pub fn display_price(&self) -> String {
        match self.listing_type {
            ListingType::ForRent => format!("{}/mo", format_currency(self.price)),
            ListingType::ForSale => format_currency(self.price),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ListingType {
    #[serde(rename = "For Sale")]
    #[strum(serialize = "For Sale")]
    ForSale,
    #[serde(rename = "For Rent")]
    #[strum(serialize = "For Rent")]
    ForRent,
}

/// A property joined with the caller-visible favorite flag.
///
/// The flag is computed from the favorite ledger each time a view is built
/// and is never written back to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub is_favorite: bool,
}

impl PropertyView {
    pub fn new(property: Property, is_favorite: bool) -> Self {
        Self {
            property,
            is_favorite,
        }
    }

    pub fn id(&self) -> PropertyId {
        self.property.id
    }
}

/// Inclusive numeric bounds of a facet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    /// Sentinel returned for an empty reduction
    pub const EMPTY: ValueRange = ValueRange { min: 0.0, max: 0.0 };

    /// Min and max over the values, or [`ValueRange::EMPTY`] when there are none
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc: Option<ValueRange>, v| {
                Some(match acc {
                    Some(range) => ValueRange {
                        min: range.min.min(v),
                        max: range.max.max(v),
                    },
                    None => ValueRange { min: v, max: v },
                })
            })
            .unwrap_or(Self::EMPTY)
    }
}

/// Format an amount as US dollars with thousands separators
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    if fraction == 0 {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{:02}", sign, grouped, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sample_json() -> &'static str {
        r#"{
            "Id": 7,
            "title": "Sunny Loft",
            "description": "Open plan loft near the park",
            "address": "12 Elm St",
            "city": "Austin",
            "state": "TX",
            "zipCode": "78701",
            "price": 2500,
            "listingType": "For Rent",
            "propertyType": "Loft",
            "bedrooms": 1,
            "bathrooms": 1.5,
            "squareFeet": 900,
            "amenities": ["Gym"],
            "images": ["https://img.example.com/7.jpg"]
        }"#
    }

    #[test]
    fn test_deserialize_defaults_optional_fields() {
        let property: Property = serde_json::from_str(sample_json()).unwrap();

        assert_eq!(property.id, 7);
        assert_eq!(property.listing_type, ListingType::ForRent);
        assert_eq!(property.year_built, None);
        assert_eq!(property.hoa_fees_or_zero(), 0.0);
        assert!(property.property_features.is_empty());
        assert!(property.validate().is_ok());
    }

    #[test]
    fn test_lowercase_id_alias() {
        let json = sample_json().replace("\"Id\"", "\"id\"");
        let property: Property = serde_json::from_str(&json).unwrap();
        assert_eq!(property.id, 7);
    }

    #[test]
    fn test_validation_rejects_missing_images() {
        let mut property: Property = serde_json::from_str(sample_json()).unwrap();
        property.images.clear();
        assert!(property.validate().is_err());
    }

    #[test]
    fn test_display_price() {
        let mut property: Property = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(property.display_price(), "$2,500/mo");

        property.listing_type = ListingType::ForSale;
        property.price = 1_250_000.0;
        assert_eq!(property.display_price(), "$1,250,000");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(350.5), "$350.50");
    }

    #[test]
    fn test_listing_type_strings() {
        assert_eq!(ListingType::ForSale.to_string(), "For Sale");
        assert_eq!(ListingType::from_str("For Rent").unwrap(), ListingType::ForRent);
    }

    #[test]
    fn test_view_serializes_flat() {
        let property: Property = serde_json::from_str(sample_json()).unwrap();
        let view = PropertyView::new(property, true);
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["Id"], 7);
        assert_eq!(value["isFavorite"], true);
        assert_eq!(value["city"], "Austin");
    }

    #[test]
    fn test_value_range_empty() {
        assert_eq!(ValueRange::from_values(Vec::new()), ValueRange::EMPTY);
        let range = ValueRange::from_values(vec![3.0, 1.0, 2.0]);
        assert_eq!(range, ValueRange { min: 1.0, max: 3.0 });
    }
}
