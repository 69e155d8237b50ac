//! Recommendation function contract.
//!
//! The catalog is shipped to an external function together with a free-text
//! brief; the function answers with ids and reasoning that are joined back onto
//! the catalog records here.

mod http;

pub use http::HttpAdvisorClient;

use crate::error::Result;
use crate::models::{Advice, AdvisorData, AdvisorRequest, AdvisorResponse, PropertyView, Recommendation};
use async_trait::async_trait;
use std::collections::HashMap;

/// Transport to the recommendation function
#[async_trait]
pub trait AdvisorClient: Send + Sync {
    async fn recommend(&self, request: &AdvisorRequest) -> Result<AdvisorResponse>;
}

/// Join returned recommendations onto the records that were sent.
///
/// Response order is kept. Entries naming an id that was not sent are dropped.
pub fn merge_recommendations(properties: &[PropertyView], data: AdvisorData) -> Advice {
    let by_id: HashMap<_, _> = properties.iter().map(|view| (view.id(), view)).collect();

    let recommendations = data
        .recommendations
        .into_iter()
        .filter_map(|entry| {
            let matched = entry
                .property_id
                .and_then(|id| by_id.get(&id).map(|view| (id, *view)));
            match matched {
                Some((property_id, view)) => Some(Recommendation {
                    property_id,
                    reasoning: entry.reasoning,
                    property: view.clone(),
                }),
                None => {
                    tracing::warn!(
                        property_id = ?entry.property_id,
                        "Dropping recommendation for unknown property"
                    );
                    None
                }
            }
        })
        .collect();

    Advice {
        recommendations,
        summary: data.summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecommendationEntry;
    use crate::query::test_support::two_listings;

    fn views() -> Vec<PropertyView> {
        two_listings()
            .into_iter()
            .map(|property| PropertyView::new(property, false))
            .collect()
    }

    fn entry(id: u64, reasoning: &str) -> RecommendationEntry {
        RecommendationEntry {
            property_id: Some(id),
            reasoning: reasoning.to_string(),
        }
    }

    #[test]
    fn test_merge_keeps_response_order() {
        let data = AdvisorData {
            recommendations: vec![entry(2, "Room for a family"), entry(1, "Close to the water")],
            summary: Some("Two good fits".to_string()),
        };

        let advice = merge_recommendations(&views(), data);

        let ids: Vec<_> = advice.recommendations.iter().map(|r| r.property_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(advice.recommendations[0].property.property.title, "Pine Road Family Home");
        assert_eq!(advice.summary.as_deref(), Some("Two good fits"));
    }

    #[test]
    fn test_merge_drops_unknown_ids() {
        let data = AdvisorData {
            recommendations: vec![entry(77, "Hallucinated"), entry(1, "Pool")],
            summary: None,
        };

        let advice = merge_recommendations(&views(), data);

        assert_eq!(advice.recommendations.len(), 1);
        assert_eq!(advice.recommendations[0].property_id, 1);
    }

    #[test]
    fn test_merge_drops_entries_without_usable_id() {
        let data = AdvisorData {
            recommendations: vec![
                RecommendationEntry {
                    property_id: None,
                    reasoning: "Id was a string".to_string(),
                },
                entry(2, "Garage"),
            ],
            summary: None,
        };

        let advice = merge_recommendations(&views(), data);

        assert_eq!(advice.recommendations.len(), 1);
        assert_eq!(advice.recommendations[0].property_id, 2);
    }

    #[test]
    fn test_merge_empty_response() {
        let advice = merge_recommendations(&views(), AdvisorData::default());
        assert!(advice.is_empty());
        assert!(advice.summary.is_none());
    }
}
