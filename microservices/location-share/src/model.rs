//! Location record model
//!
//! `LocationRecord` is the API/domain form with a structured timestamp.
//! `LocationDocument` is the stored form, whose timestamp is fixed-width
//! RFC 3339 text so that textual order equals chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use liveshare_core::RecordId;
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Maximum number of records returned by a history listing
pub const HISTORY_LIMIT: usize = 100;

/// Field the history listing is ordered by
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Body of `POST /api/location/share`
#[derive(Debug, Clone, Deserialize)]
pub struct ShareLocationRequest {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub latitude: f64,
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "optional_number_or_numeric_string")]
    pub accuracy: Option<f64>,
}

/// Coordinates arrive either as JSON numbers or as strings holding one
#[derive(Deserialize)]
#[serde(untagged)]
enum LaxNumber {
    Number(f64),
    Text(String),
}

impl LaxNumber {
    fn into_f64<E: de::Error>(self) -> std::result::Result<f64, E> {
        match self {
            LaxNumber::Number(n) => Ok(n),
            LaxNumber::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(&s), &"a number")),
        }
    }
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    LaxNumber::deserialize(deserializer)?.into_f64()
}

fn optional_number_or_numeric_string<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<LaxNumber>::deserialize(deserializer)?
        .map(LaxNumber::into_f64)
        .transpose()
}

impl ShareLocationRequest {
    /// Coordinates are not range-checked; only values JSON cannot carry
    /// (NaN, infinities) are refused.
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() {
            return Err(Error::Validation("latitude must be a finite number".to_string()));
        }
        if !self.longitude.is_finite() {
            return Err(Error::Validation("longitude must be a finite number".to_string()));
        }
        if matches!(self.accuracy, Some(a) if !a.is_finite()) {
            return Err(Error::Validation("accuracy must be a finite number".to_string()));
        }
        Ok(())
    }
}

/// Coordinates pushed to the notification sink
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One reported location. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: RecordId,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl LocationRecord {
    /// Build a record with a fresh id, stamped with the current server time
    pub fn new(request: ShareLocationRequest) -> Self {
        Self::stamped(request, RecordId::generate(), Utc::now())
    }

    fn stamped(request: ShareLocationRequest, id: RecordId, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            latitude: request.latitude,
            longitude: request.longitude,
            accuracy: request.accuracy,
            timestamp,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Stored form of a `LocationRecord`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDocument {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy: Option<f64>,
    pub timestamp: String,
}

impl From<&LocationRecord> for LocationDocument {
    fn from(record: &LocationRecord) -> Self {
        Self {
            id: record.id.to_string(),
            latitude: record.latitude,
            longitude: record.longitude,
            accuracy: record.accuracy,
            timestamp: encode_timestamp(&record.timestamp),
        }
    }
}

impl TryFrom<LocationDocument> for LocationRecord {
    type Error = chrono::ParseError;

    fn try_from(doc: LocationDocument) -> std::result::Result<Self, Self::Error> {
        let timestamp = DateTime::parse_from_rfc3339(&doc.timestamp)?.with_timezone(&Utc);
        Ok(Self {
            id: RecordId::from(doc.id),
            latitude: doc.latitude,
            longitude: doc.longitude,
            accuracy: doc.accuracy,
            timestamp,
        })
    }
}

pub fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Body of `GET /api/`
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
}

/// Body of `DELETE /api/locations`
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub deleted_count: u64,
}
