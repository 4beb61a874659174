use bson::{Bson, Document};
use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::models::location::Location;

/// A marker document as stored by the backend. Every field is optional and
/// absent fields are omitted on encode, so decode(encode(pin)) == pin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<Location>,
    #[serde(
        rename = "_id",
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    id: Option<String>,
    #[serde(rename = "pinId", default, skip_serializing_if = "Option::is_none")]
    pin_id: Option<String>,
    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "deserialize_created_at",
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<String>,
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    version: Option<i64>,
}

// The backend store writes `_id` as an ObjectId; JSON responses carry its hex form.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::String(id)) => Ok(Some(id)),
        Some(Bson::ObjectId(oid)) => Ok(Some(oid.to_hex())),
        Some(other) => Err(D::Error::custom(format!(
            "invalid type for _id: {:?}, expected a string or ObjectId",
            other.element_type()
        ))),
    }
}

// Stored timestamps are BSON datetimes; they are kept as RFC 3339 text.
fn deserialize_created_at<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        None | Some(Bson::Null) => Ok(None),
        Some(Bson::String(created_at)) => Ok(Some(created_at)),
        Some(Bson::DateTime(dt)) => dt
            .try_to_rfc3339_string()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("createdAt out of range: {}", e))),
        Some(other) => Err(D::Error::custom(format!(
            "invalid type for createdAt: {:?}, expected a string or datetime",
            other.element_type()
        ))),
    }
}

impl Pin {
    pub fn builder() -> PinBuilder {
        PinBuilder::default()
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn pin_id(&self) -> Option<&str> {
        self.pin_id.as_deref()
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn version(&self) -> Option<i64> {
        self.version
    }

    /// `createdAt` as an RFC 3339 instant, if present and parseable.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn from_json(input: &str) -> Result<Self, DecodeError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, DecodeError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Decodes a response body holding an array of pins.
    pub fn list_from_json(input: &str) -> Result<Vec<Self>, DecodeError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json(&self) -> Result<String, EncodeError> {
        self.ensure_json_encodable()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, EncodeError> {
        self.ensure_json_encodable()?;
        Ok(serde_json::to_value(self)?)
    }

    // serde_json writes NaN and infinities as null, which would not decode back.
    fn ensure_json_encodable(&self) -> Result<(), EncodeError> {
        match self.location {
            Some(location) if !location.is_finite() => Err(EncodeError::Json(format!(
                "non-finite coordinate ({}, {}) cannot be written as JSON",
                location.lat, location.lng
            ))),
            _ => Ok(()),
        }
    }

    pub fn from_document(document: Document) -> Result<Self, DecodeError> {
        Ok(bson::from_document(document)?)
    }

    pub fn to_document(&self) -> Result<Document, EncodeError> {
        Ok(bson::to_document(self)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PinBuilder {
    pin: Pin,
}

impl PinBuilder {
    pub fn location(mut self, location: Location) -> Self {
        self.pin.location = Some(location);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.pin.id = Some(id.into());
        self
    }

    pub fn pin_id(mut self, pin_id: impl Into<String>) -> Self {
        self.pin.pin_id = Some(pin_id.into());
        self
    }

    pub fn created_at(mut self, created_at: impl Into<String>) -> Self {
        self.pin.created_at = Some(created_at.into());
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.pin.version = Some(version);
        self
    }

    pub fn build(self) -> Pin {
        self.pin
    }
}
