//! Serde helpers for cross-collection reference fields.
//!
//! References are hex ObjectId strings in the public shapes. In storage they
//! are written as real ObjectIds so `$lookup` can join them against `_id`,
//! but lifecycle sentinels ("desactivado") and legacy plain-string refs must
//! survive a round trip, so non-parseable values stay strings.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::Bson;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    match ObjectId::parse_str(value) {
        Ok(oid) => oid.serialize(serializer),
        Err(_) => serializer.serialize_str(value),
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Bson::deserialize(deserializer)? {
        Bson::ObjectId(oid) => Ok(oid.to_hex()),
        Bson::String(s) => Ok(s),
        other => Err(serde::de::Error::custom(format!(
            "expected an id reference, found {}",
            other
        ))),
    }
}
