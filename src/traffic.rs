//! Traffic records decoded from JSON source files

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Protocol tag counted by every aggregation strategy
pub const TCP_PROTOCOL: &str = "TCP";

/// One traffic entry as stored in a source file.
///
/// Missing or `null` keys decode to empty values, so a record without a
/// `proto` never matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Traffic {
    #[serde(rename = "time", default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "proto", default, deserialize_with = "null_as_empty")]
    pub protocol: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Traffic {
    /// Check if this record is TCP traffic (exact, case-sensitive match)
    pub fn is_tcp(&self) -> bool {
        self.protocol == TCP_PROTOCOL
    }
}
