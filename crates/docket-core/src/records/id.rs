use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::records::errors::DraftError;

const LOCAL_PREFIX: &str = "local-";

/// Largest local id accepted from text, leaving the allocator headroom.
pub const MAX_LOCAL_ID: u64 = i64::MAX as u64;

/// Identity key of a replicated record.
///
/// Server ids are plain integers on the wire. Local ids are strings of the
/// form `local-<n>`, so a draft can be saved and reloaded without losing the
/// distinction and the backend can tell which records are new.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordId {
    Server(i64),
    Local(u64),
}

impl RecordId {
    pub fn is_local(&self) -> bool {
        matches!(self, RecordId::Local(_))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Server(id) => write!(f, "{}", id),
            RecordId::Local(n) => write!(f, "{}{}", LOCAL_PREFIX, n),
        }
    }
}

impl FromStr for RecordId {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(n) = s.strip_prefix(LOCAL_PREFIX) {
            return n
                .parse::<u64>()
                .ok()
                .filter(|n| *n <= MAX_LOCAL_ID)
                .map(RecordId::Local)
                .ok_or_else(|| DraftError::InvalidId {
                    value: s.to_string(),
                });
        }
        s.parse::<i64>()
            .map(RecordId::Server)
            .map_err(|_| DraftError::InvalidId {
                value: s.to_string(),
            })
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RecordId::Server(id) => serializer.serialize_i64(*id),
            RecordId::Local(_) => serializer.collect_str(self),
        }
    }
}

struct RecordIdVisitor;

impl Visitor<'_> for RecordIdVisitor {
    type Value = RecordId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer id or a 'local-<n>' string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<RecordId, E> {
        Ok(RecordId::Server(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<RecordId, E> {
        i64::try_from(v)
            .map(RecordId::Server)
            .map_err(|_| E::custom(format!("id {} out of range", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<RecordId, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(RecordIdVisitor)
    }
}
