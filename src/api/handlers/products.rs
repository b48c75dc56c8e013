/*
 * Responsibility
 * - /api/products 系 CRUD handler
 * - 認証は routes 側の gate (Authenticated) で済んでいる前提
 * - body は JsonBody で受け、DTO validation + sku 重複チェック → repo
 */
use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
};

use crate::{
    api::dto::field_message,
    api::dto::products::{ProductRequest, ProductResponse},
    api::extractors::{Identity, JsonBody},
    error::AppError,
    repos::error::RepoError,
    state::AppState,
};

const SKU_TAKEN: &str = "ya existe en la base de datos!";

// Ids that do not parse cannot name a product.
fn product_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

fn sku_taken() -> AppError {
    let mut errors = BTreeMap::new();
    errors.insert("sku".to_string(), field_message("sku", SKU_TAKEN));
    AppError::Validation(errors)
}

async fn validated(
    state: &AppState,
    req: &ProductRequest,
    except: Option<i64>,
) -> Result<(), AppError> {
    let mut errors = req.validate();
    if !errors.contains_key("sku") && state.products.exists_by_sku(req.sku.trim(), except).await {
        errors.insert("sku".to_string(), field_message("sku", SKU_TAKEN));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<ProductResponse>> {
    let products = state.products.list().await;
    Json(products.into_iter().map(ProductResponse::from).collect())
}

pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = product_id(path)?;
    let row = state.products.get(id).await.ok_or(AppError::NotFound)?;
    Ok(Json(row.into()))
}

pub async fn create_product(
    State(state): State<AppState>,
    Identity(caller): Identity,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    validated(&state, &req, None).await?;

    let row = state
        .products
        .create(req.into_fields())
        .await
        .map_err(|e| match e {
            RepoError::Conflict => sku_taken(),
            other => AppError::from(other),
        })?;

    tracing::info!(by = %caller.username, id = row.id, sku = %row.sku, "product created");
    Ok((StatusCode::CREATED, Json(row.into())))
}

pub async fn update_product(
    State(state): State<AppState>,
    Identity(caller): Identity,
    path: Result<Path<i64>, PathRejection>,
    JsonBody(req): JsonBody<ProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = product_id(path)?;
    validated(&state, &req, Some(id)).await?;

    let row = state
        .products
        .update(id, req.into_fields())
        .await
        .map_err(|e| match e {
            RepoError::Conflict => sku_taken(),
            other => AppError::from(other),
        })?
        .ok_or(AppError::NotFound)?;

    tracing::info!(by = %caller.username, id, "product updated");
    Ok(Json(row.into()))
}

/// Responds with the removed product.
pub async fn delete_product(
    State(state): State<AppState>,
    Identity(caller): Identity,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let id = product_id(path)?;
    let row = state.products.delete(id).await.ok_or(AppError::NotFound)?;

    tracing::info!(by = %caller.username, id, "product deleted");
    Ok(Json(row.into()))
}
