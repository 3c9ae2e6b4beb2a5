//! Serde helpers shared by the database models
//!
//! Record references cross two boundaries with different shapes: the
//! API serves them as `"table:id"` strings, while SurrealDB hands back
//! its native form. The helpers here serialize references as strings
//! and accept either shape when deserializing, so one model struct
//! works for both.

use serde::{Deserialize, Deserializer, Serializer};
use surrealdb::RecordId;

/// Deserialize a bool where a missing or null value means `true`.
/// Used for flags like `is_active` that default to on.
pub fn bool_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(true))
}

/// Deserialize a bool where a missing or null value means `false`
pub fn bool_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(|opt| opt.unwrap_or(false))
}

/// A RecordId read from either a `"table:id"` string or the native
/// SurrealDB representation.
#[derive(Debug, Clone)]
struct AnyRecordId(RecordId);

impl<'de> Deserialize<'de> for AnyRecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct AnyRecordIdVisitor;

        impl<'de> Visitor<'de> for AnyRecordIdVisitor {
            type Value = AnyRecordId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 'table:id' string or a record id")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value
                    .parse::<RecordId>()
                    .map(AnyRecordId)
                    .map_err(|_| de::Error::custom(format!("invalid record id: {}", value)))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: de::MapAccess<'de>,
            {
                RecordId::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(AnyRecordId)
            }
        }

        deserializer.deserialize_any(AnyRecordIdVisitor)
    }
}

/// `RecordId` as a `"table:id"` string
pub mod record_id {
    use super::*;

    pub fn serialize<S>(id: &RecordId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&id.to_string())
    }

    pub fn deserialize<'de, D>(d: D) -> Result<RecordId, D::Error>
    where
        D: Deserializer<'de>,
    {
        AnyRecordId::deserialize(d).map(|id| id.0)
    }
}

/// `Option<RecordId>` as an optional `"table:id"` string
pub mod option_record_id {
    use super::*;

    pub fn serialize<S>(id: &Option<RecordId>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<RecordId>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<AnyRecordId>::deserialize(d).map(|opt| opt.map(|id| id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize)]
    struct Doc {
        #[serde(with = "record_id")]
        owner: RecordId,
        #[serde(default, with = "option_record_id")]
        parent: Option<RecordId>,
        #[serde(default = "default_on", deserialize_with = "bool_true")]
        active: bool,
    }

    fn default_on() -> bool {
        true
    }

    #[test]
    fn record_ids_round_trip_as_strings() {
        let json = r#"{"owner":"user:alice","parent":"employee:bob","active":false}"#;
        let doc: Doc = serde_json::from_str(json).unwrap();
        assert_eq!(doc.owner.to_string(), "user:alice");
        assert_eq!(doc.parent.as_ref().unwrap().to_string(), "employee:bob");

        let out = serde_json::to_string(&doc).unwrap();
        assert_eq!(out, json);
    }

    #[test]
    fn missing_optionals_and_flags_take_defaults() {
        let doc: Doc = serde_json::from_str(r#"{"owner":"user:alice"}"#).unwrap();
        assert!(doc.parent.is_none());
        assert!(doc.active);
    }

    #[test]
    fn null_bool_reads_as_default() {
        let doc: Doc =
            serde_json::from_str(r#"{"owner":"user:alice","active":null}"#).unwrap();
        assert!(doc.active);
    }

    #[test]
    fn garbage_record_id_is_rejected() {
        assert!(serde_json::from_str::<Doc>(r#"{"owner":"not a record"}"#).is_err());
    }
}
