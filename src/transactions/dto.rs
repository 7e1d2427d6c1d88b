use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::TransactionKind;

/// Request body for `POST /transactions/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransactionRequest {
    pub amount: f64,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(deserialize_with = "client_datetime::deserialize")]
    pub date: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Timestamps from clients: RFC 3339, or ISO 8601 without an offset (read as UTC).
mod client_datetime {
    use serde::{de, Deserialize, Deserializer};
    use time::{
        format_description::well_known::{Iso8601, Rfc3339},
        OffsetDateTime, PrimitiveDateTime,
    };

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid datetime {raw:?}")))
    }

    pub(super) fn parse(raw: &str) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(raw, &Rfc3339)
            .or_else(|_| OffsetDateTime::parse(raw, &Iso8601::DEFAULT))
            .or_else(|_| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(|dt| dt.assume_utc()))
            .ok()
    }
}
