use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{CreateTransactionRequest, MessageResponse},
    repo_types::Transaction,
    services,
};
use crate::{auth::extractors::AuthUser, error::ApiError, state::AppState};

pub fn transactions_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/:id", delete(delete_transaction))
}

#[instrument(skip(state, identity), fields(user_id = identity.id))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let items = services::list(&state.db, identity.id).await?;
    Ok(Json(items))
}

#[instrument(skip(state, identity, payload), fields(user_id = identity.id))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<Json<Transaction>, ApiError> {
    let Json(payload) = payload?;
    let created = services::create(&state.db, identity.id, payload).await?;
    info!(transaction_id = created.id, kind = %created.kind, "transaction created");
    Ok(Json(created))
}

#[instrument(skip(state, identity, id), fields(user_id = identity.id))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    info!(transaction_id = id, "deleting transaction");
    services::delete(&state.db, identity.id, id).await?;
    Ok(Json(MessageResponse {
        message: "Transaction deleted successfully",
    }))
}
