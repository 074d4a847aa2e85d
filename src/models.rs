use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::error::Category;

/// A single GPS sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Milliseconds since the Unix epoch, as reported by the client
    pub timestamp: i64,
}

/// One submitted path and its generated identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LocationGroup {
    /// Random UUID v4, generated on submission
    pub location_id: String,
    pub locations: Vec<Location>,
}

/// The document persisted under a single store key
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LocationDataDocument {
    pub location_groups: Vec<LocationGroup>,
}

/// One point of an incoming path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PathPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(deserialize_with = "whole_number")]
    pub timestamp: i64,
}

/// Accepts `1000`, `1000.0` or `1.7e12`; rejects fractions and values outside i64.
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    if let Some(value) = number.as_i64() {
        return Ok(value);
    }
    match number.as_f64() {
        Some(value)
            if value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64 =>
        {
            Ok(value as i64)
        }
        _ => Err(D::Error::custom(format!(
            "timestamp must be a whole number of milliseconds, got {}",
            number
        ))),
    }
}

impl From<PathPoint> for Location {
    fn from(point: PathPoint) -> Self {
        Location {
            latitude: point.latitude,
            longitude: point.longitude,
            timestamp: point.timestamp,
        }
    }
}

/// Request body for POST /locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PathSubmission {
    #[serde(rename = "pathData")]
    pub path_data: Vec<PathPoint>,
}

/// Rejected request body
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("request body is not valid JSON: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("request body does not match the expected shape: {0}")]
    Shape(#[source] serde_json::Error),
}

impl PathSubmission {
    /// Parse and schema-check a raw request body.
    pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(body).map_err(|err| match err.classify() {
            Category::Data => ValidationError::Shape(err),
            Category::Syntax | Category::Eof | Category::Io => ValidationError::Syntax(err),
        })
    }
}

/// Response type for successful POST /locations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SubmitResponse {
    pub success: bool,
    pub key: String,
    pub data: LocationDataDocument,
}

/// Response type for GET /locations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListResponse {
    pub location_groups: Vec<LocationGroup>,
}

/// Response type for DELETE /locations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

/// Response type for GET /kv-test
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct KvTestResponse {
    pub key: String,
    pub value: Option<String>,
}
