use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, error};

use super::{
    dto::CreateTransactionRequest,
    repo,
    repo_types::{Transaction, TransactionRow},
};

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Missing and foreign-owned ids are reported the same way.
    #[error("Transaction not found")]
    NotFound,
    #[error("{0}")]
    Invalid(String),
    #[error("storage error: {0}")]
    Storage(String),
}

fn storage(e: sqlx::Error) -> LedgerError {
    error!(error = %e, "ledger storage error");
    LedgerError::Storage(e.to_string())
}

fn to_model(row: TransactionRow) -> Result<Transaction, LedgerError> {
    Transaction::try_from(row).map_err(|e| {
        error!(error = %e, "corrupt transaction row");
        LedgerError::Storage(e)
    })
}

pub async fn create(
    db: &SqlitePool,
    owner_id: i64,
    new: CreateTransactionRequest,
) -> Result<Transaction, LedgerError> {
    if !new.amount.is_finite() {
        return Err(LedgerError::Invalid("amount must be a finite number".into()));
    }

    let row = repo::insert(db, owner_id, &new).await.map_err(storage)?;
    debug!(owner_id, transaction_id = row.id, "transaction created");
    to_model(row)
}

pub async fn list(db: &SqlitePool, owner_id: i64) -> Result<Vec<Transaction>, LedgerError> {
    repo::list_by_owner(db, owner_id)
        .await
        .map_err(storage)?
        .into_iter()
        .map(to_model)
        .collect()
}

pub async fn delete(db: &SqlitePool, owner_id: i64, id: i64) -> Result<(), LedgerError> {
    let mut tx = db.begin().await.map_err(storage)?;
    // An early return drops `tx`, which rolls it back.
    let removed = repo::delete_owned_tx(&mut tx, owner_id, id)
        .await
        .map_err(storage)?;

    if removed == 0 {
        tx.rollback().await.map_err(storage)?;
        return Err(LedgerError::NotFound);
    }

    tx.commit().await.map_err(storage)?;
    debug!(owner_id, transaction_id = id, "transaction deleted");
    Ok(())
}
