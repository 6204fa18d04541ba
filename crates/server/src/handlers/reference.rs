//! # Reference Data Handlers
//!
//! CRUD endpoints for the four reference-record kinds. Every handler runs
//! under the authenticated account and delegates to the owner-scoped
//! accessors, so one account can never see or delete another's records.

use super::{wrap_response, ApiResponse, AppError, AppState};
use crate::auth::middleware::AuthenticatedAccount;
use axum::{
    extract::{Path, State},
    Json,
};
use replykit::reference;
use replykit::types::{ManualEntry, PrecedentEntry, ProductEntry, ScenarioEntry};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

// --- API Payloads ---

#[derive(Deserialize)]
pub struct ContentPayload {
    pub content: String,
}

#[derive(Deserialize)]
pub struct ScenarioPayload {
    pub title: String,
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct PrecedentPayload {
    pub inquiry: String,
    pub response: String,
}

fn deleted(removed: bool, id: &str) -> Result<Json<ApiResponse<Value>>, AppError> {
    if removed {
        Ok(wrap_response(json!({ "deleted": id })))
    } else {
        Err(AppError::NotFound(format!("No record found with id '{id}'")))
    }
}

// --- Manuals ---

pub async fn list_manuals_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Result<Json<ApiResponse<Vec<ManualEntry>>>, AppError> {
    let manuals = reference::list_manuals(&app_state.sqlite_provider.db, &account.id).await?;
    Ok(wrap_response(manuals))
}

pub async fn create_manual_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(payload): Json<ContentPayload>,
) -> Result<Json<ApiResponse<ManualEntry>>, AppError> {
    let manual =
        reference::add_manual(&app_state.sqlite_provider.db, &account.id, &payload.content).await?;
    info!(owner_id = %account.id, manual_id = %manual.id, "Created manual");
    Ok(wrap_response(manual))
}

pub async fn delete_manual_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let removed = reference::delete_manual(&app_state.sqlite_provider.db, &account.id, &id).await?;
    deleted(removed, &id)
}

// --- Products ---

pub async fn list_products_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Result<Json<ApiResponse<Vec<ProductEntry>>>, AppError> {
    let products = reference::list_products(&app_state.sqlite_provider.db, &account.id).await?;
    Ok(wrap_response(products))
}

pub async fn create_product_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(payload): Json<ContentPayload>,
) -> Result<Json<ApiResponse<ProductEntry>>, AppError> {
    let product =
        reference::add_product(&app_state.sqlite_provider.db, &account.id, &payload.content)
            .await?;
    info!(owner_id = %account.id, product_id = %product.id, "Created product");
    Ok(wrap_response(product))
}

pub async fn delete_product_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let removed =
        reference::delete_product(&app_state.sqlite_provider.db, &account.id, &id).await?;
    deleted(removed, &id)
}

// --- Scenarios ---

pub async fn list_scenarios_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Result<Json<ApiResponse<Vec<ScenarioEntry>>>, AppError> {
    let scenarios = reference::list_scenarios(&app_state.sqlite_provider.db, &account.id).await?;
    Ok(wrap_response(scenarios))
}

pub async fn create_scenario_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(payload): Json<ScenarioPayload>,
) -> Result<Json<ApiResponse<ScenarioEntry>>, AppError> {
    let scenario = reference::add_scenario(
        &app_state.sqlite_provider.db,
        &account.id,
        &payload.title,
        &payload.prompt,
    )
    .await?;
    info!(owner_id = %account.id, scenario_id = %scenario.id, "Created scenario");
    Ok(wrap_response(scenario))
}

pub async fn delete_scenario_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let removed =
        reference::delete_scenario(&app_state.sqlite_provider.db, &account.id, &id).await?;
    deleted(removed, &id)
}

// --- Precedents ---

pub async fn list_precedents_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
) -> Result<Json<ApiResponse<Vec<PrecedentEntry>>>, AppError> {
    let precedents = reference::list_precedents(&app_state.sqlite_provider.db, &account.id).await?;
    Ok(wrap_response(precedents))
}

pub async fn create_precedent_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Json(payload): Json<PrecedentPayload>,
) -> Result<Json<ApiResponse<PrecedentEntry>>, AppError> {
    let precedent = reference::add_precedent(
        &app_state.sqlite_provider.db,
        &account.id,
        &payload.inquiry,
        &payload.response,
    )
    .await?;
    info!(owner_id = %account.id, precedent_id = %precedent.id, "Created precedent");
    Ok(wrap_response(precedent))
}

pub async fn delete_precedent_handler(
    State(app_state): State<AppState>,
    AuthenticatedAccount(account): AuthenticatedAccount,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let removed =
        reference::delete_precedent(&app_state.sqlite_provider.db, &account.id, &id).await?;
    deleted(removed, &id)
}
