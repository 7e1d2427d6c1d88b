use sqlx::{Sqlite, SqlitePool};

use super::{dto::CreateTransactionRequest, repo_types::TransactionRow};

pub async fn insert(
    db: &SqlitePool,
    owner_id: i64,
    new: &CreateTransactionRequest,
) -> sqlx::Result<TransactionRow> {
    sqlx::query_as::<_, TransactionRow>(
        r#"
        INSERT INTO transactions (owner_id, amount, description, category, type, date)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, owner_id, amount, description, category, type AS kind, date
        "#,
    )
    .bind(owner_id)
    .bind(new.amount)
    .bind(&new.description)
    .bind(&new.category)
    .bind(new.kind.as_str())
    .bind(new.date)
    .fetch_one(db)
    .await
}

/// All transactions of one owner, oldest id first.
pub async fn list_by_owner(db: &SqlitePool, owner_id: i64) -> sqlx::Result<Vec<TransactionRow>> {
    sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT id, owner_id, amount, description, category, type AS kind, date
        FROM transactions
        WHERE owner_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(db)
    .await
}

/// Deletes the row only if `owner_id` owns it. Returns rows removed (0 or 1).
pub async fn delete_owned_tx(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    owner_id: i64,
    id: i64,
) -> sqlx::Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM transactions
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .execute(&mut **tx)
    .await?;
    Ok(result.rows_affected())
}
