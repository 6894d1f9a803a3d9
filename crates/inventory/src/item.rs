use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Backend-assigned item identifier.
///
/// Opaque to the client: the backend may send a number or a string, and the
/// client only ever echoes it back in a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self(n.to_string()),
            Raw::Str(s) => Self(s),
        })
    }
}

/// An inventory record as served by the backend.
///
/// Never mutated client-side; a fresh copy arrives with every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Taken as served; only codes the client submits are validated.
    pub code: String,
    pub name: String,
    pub quantity: i64,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Lenient timestamp parsing for backend payloads.
pub mod timestamp {
    use super::*;

    /// Parse RFC 3339, or a naive ISO 8601 timestamp taken as UTC.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn item_id_accepts_number_or_string() {
        let a: ItemId = serde_json::from_value(json!(42)).unwrap();
        let b: ItemId = serde_json::from_value(json!("42")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "42");
        assert_eq!(serde_json::to_value(&a).unwrap(), json!("42"));
    }

    #[test]
    fn item_parses_backend_payload_with_naive_timestamp() {
        let item: Item = serde_json::from_value(json!({
            "id": 7,
            "code": "AB1234",
            "name": "Widget",
            "quantity": 3,
            "created_at": "2024-01-05T14:30:00.123456",
            "updated_at": "2024-01-05T14:30:00.123456"
        }))
        .unwrap();

        assert_eq!(item.id, ItemId::from(7));
        assert_eq!(item.code, "AB1234");
        assert_eq!(item.quantity, 3);
        assert_eq!(
            item.created_at.timestamp(),
            Utc.with_ymd_and_hms(2024, 1, 5, 14, 30, 0).unwrap().timestamp()
        );
    }

    #[test]
    fn timestamp_accepts_rfc3339_with_offset() {
        let dt = timestamp::parse("2024-01-05T16:30:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 5, 14, 30, 0).unwrap());
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!(timestamp::parse("yesterday").is_none());
        let err = serde_json::from_value::<Item>(json!({
            "id": 1, "code": "AB1234", "name": "W", "quantity": 1, "created_at": "nope"
        }));
        assert!(err.is_err());
    }
}
