use crate::error::{AppError, Result};
use crate::models::{PropertyId, PropertyView};
use serde::{Deserialize, Deserializer, Serialize};

/// Body sent to the recommendation function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorRequest {
    pub query: String,
    pub properties: Vec<PropertyView>,
}

/// A single recommendation as returned by the function.
///
/// `property_id` is `None` when the function sent something other than a
/// catalog id; such entries never match a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationEntry {
    #[serde(default, deserialize_with = "lenient_id")]
    pub property_id: Option<PropertyId>,
    #[serde(default)]
    pub reasoning: String,
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<PropertyId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::Value::deserialize(deserializer)?.as_u64())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorData {
    #[serde(default)]
    pub recommendations: Vec<RecommendationEntry>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Parsed response envelope of the recommendation function
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawAdvisorResponse")]
pub enum AdvisorResponse {
    Success(AdvisorData),
    Failure { error: Option<String> },
}

#[derive(Deserialize)]
struct RawAdvisorResponse {
    success: bool,
    #[serde(default)]
    data: Option<AdvisorData>,
    #[serde(default)]
    error: Option<String>,
}

impl From<RawAdvisorResponse> for AdvisorResponse {
    fn from(raw: RawAdvisorResponse) -> Self {
        if raw.success {
            AdvisorResponse::Success(raw.data.unwrap_or_default())
        } else {
            AdvisorResponse::Failure { error: raw.error }
        }
    }
}

impl AdvisorResponse {
    pub fn into_result(self) -> Result<AdvisorData> {
        match self {
            AdvisorResponse::Success(data) => Ok(data),
            AdvisorResponse::Failure { error } => Err(AppError::integration(
                "advisor",
                error.unwrap_or_else(|| "Failed to get AI recommendations".to_string()),
            )),
        }
    }
}

/// A recommendation joined with the catalog record it refers to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub property_id: PropertyId,
    pub reasoning: String,
    pub property: PropertyView,
}

/// Merged advisor output
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Advice {
    pub recommendations: Vec<Recommendation>,
    pub summary: Option<String>,
}

impl Advice {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }
}
