use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Direction of a transaction. Stored as the lowercase tag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction type {other:?}")),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub owner_id: i64,
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub kind: String,
    pub date: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub owner_id: i64,
    pub amount: f64,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = String;

    fn try_from(r: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            owner_id: r.owner_id,
            amount: r.amount,
            description: r.description,
            category: r.category,
            kind: r.kind.parse()?,
            date: r.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn kind_parses_only_known_tags() {
        assert_eq!("income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("expense".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("Expense".parse::<TransactionKind>().is_err());
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn transaction_serializes_type_and_owner() {
        let tx = Transaction {
            id: 1,
            owner_id: 42,
            amount: 100.0,
            description: "lunch".into(),
            category: "food".into(),
            kind: TransactionKind::Expense,
            date: datetime!(2024-05-01 12:30 UTC),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["owner_id"], 42);
        assert_eq!(json["amount"], 100.0);
        assert_eq!(json["date"], "2024-05-01T12:30:00Z");
    }

    #[test]
    fn row_with_bad_kind_is_rejected() {
        let row = TransactionRow {
            id: 1,
            owner_id: 1,
            amount: 1.0,
            description: String::new(),
            category: String::new(),
            kind: "gift".into(),
            date: datetime!(2024-05-01 0:00 UTC),
        };
        assert!(Transaction::try_from(row).is_err());
    }
}
