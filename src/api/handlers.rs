// HTTP handlers - one per route
//
// Method checks live in the router; a handler only runs for its own method.

use super::error::ApiError;
use super::state::AppState;
use crate::db::StorageError;
use crate::expense::{Expense, ExpenseRequest};
use crate::{export, web};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, Uri},
    response::{Html, IntoResponse, Json, Response},
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `{ "categories": [...], "currency": "..." }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub categories: Vec<String>,
    pub currency: String,
}

/// `{ "status": "success" }`
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl StatusResponse {
    fn success() -> Self {
        Self {
            status: "success".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// Decode a JSON body without requiring a Content-Type header
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Failed to decode request body");
        ApiError::BadRequest("Invalid request body".to_string())
    })
}

fn fetch_expenses(state: &AppState) -> Result<Vec<Expense>, ApiError> {
    state.storage.get_all_expenses().map_err(|e| {
        tracing::error!(error = %e, "Failed to retrieve expenses");
        ApiError::Internal("Failed to retrieve expenses")
    })
}

// ============================================================================
// Config Handlers
// ============================================================================

/// GET /categories - Categories and currency
pub async fn get_categories(State(state): State<AppState>) -> Json<ConfigResponse> {
    let settings = state.config.snapshot();

    Json(ConfigResponse {
        categories: settings.categories,
        currency: settings.currency,
    })
}

/// PUT /categories/edit - Replace the category list
pub async fn edit_categories(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let categories: Vec<String> = decode_body(&body)?;
    let count = categories.len();

    state.config.update_categories(categories).map_err(|e| {
        tracing::error!(error = %e, "Failed to save configuration");
        ApiError::Internal("Failed to save configuration")
    })?;

    tracing::info!(count, "Updated categories");
    Ok(Json(StatusResponse::success()))
}

/// PUT /currency/edit - Replace the currency code
pub async fn edit_currency(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let currency: String = decode_body(&body)?;

    state.config.update_currency(currency.clone()).map_err(|e| {
        tracing::error!(error = %e, "Failed to save configuration");
        ApiError::Internal("Failed to save configuration")
    })?;

    tracing::info!(%currency, "Updated currency");
    Ok(Json(StatusResponse::success()))
}

// ============================================================================
// Expense Handlers
// ============================================================================

/// PUT /expense - Validate and store a new expense
pub async fn add_expense(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Expense>, ApiError> {
    let request: ExpenseRequest = decode_body(&body)?;
    let new_expense = request.into_new_expense();

    if let Err(e) = state.config.validate(&new_expense) {
        tracing::warn!(error = %e, "Failed to validate expense");
        return Err(e.into());
    }

    let expense = state.storage.save_expense(new_expense).map_err(|e| {
        tracing::error!(error = %e, "Failed to save expense");
        ApiError::Internal("Failed to save expense")
    })?;

    tracing::info!(id = %expense.id, "Added expense");
    Ok(Json(expense))
}

/// GET /expenses - All expenses as stored
pub async fn get_expenses(State(state): State<AppState>) -> Result<Json<Vec<Expense>>, ApiError> {
    fetch_expenses(&state).map(Json)
}

/// DELETE /expense/delete?id= - Remove one expense
pub async fn delete_expense(
    State(state): State<AppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = match params.id {
        Some(id) if !id.is_empty() => id,
        _ => {
            tracing::warn!("ID parameter is required");
            return Err(ApiError::BadRequest("ID parameter is required".to_string()));
        }
    };

    match state.storage.delete_expense(&id) {
        Ok(()) => {
            tracing::info!(%id, "Deleted expense");
            Ok(Json(StatusResponse::success()))
        }
        Err(StorageError::NotFound(_)) => {
            tracing::warn!(%id, "Expense not found");
            Err(ApiError::NotFound("Expense not found".to_string()))
        }
        Err(e) => {
            tracing::error!(%id, error = %e, "Failed to delete expense");
            Err(ApiError::Internal("Failed to delete expense"))
        }
    }
}

// ============================================================================
// Export Handlers
// ============================================================================

/// GET /export/csv - Download all expenses as CSV
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let expenses = fetch_expenses(&state)?;

    let csv = export::to_csv(&expenses).map_err(|e| {
        tracing::error!(error = %e, "Failed to write CSV data");
        ApiError::PlainText("Failed to write CSV data")
    })?;

    tracing::info!(rows = expenses.len(), "Exported expenses to CSV");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=expenses.csv"),
        ],
        csv,
    )
        .into_response())
}

/// GET /export/json - Download all expenses as indented JSON
pub async fn export_json(State(state): State<AppState>) -> Result<Response, ApiError> {
    let expenses = fetch_expenses(&state)?;

    let json = export::to_json(&expenses).map_err(|e| {
        tracing::error!(error = %e, "Failed to marshal JSON data");
        ApiError::PlainText("Failed to marshal JSON data")
    })?;

    tracing::info!(rows = expenses.len(), "Exported expenses to JSON");
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CONTENT_DISPOSITION, "attachment; filename=expenses.json"),
        ],
        json,
    )
        .into_response())
}

// ============================================================================
// Views & Static Files
// ============================================================================

fn render(name: &str) -> Result<Html<&'static str>, ApiError> {
    web::render_template(name).map(Html).map_err(|e| {
        tracing::error!(error = %e, "Failed to serve template");
        ApiError::PlainText("Failed to serve template")
    })
}

/// GET / and GET /table - Expense table
pub async fn serve_table_view() -> Result<Html<&'static str>, ApiError> {
    render("table.html")
}

/// GET /settings - Categories, currency, and exports
pub async fn serve_settings_page() -> Result<Html<&'static str>, ApiError> {
    render("settings.html")
}

/// GET /api-setup - Notes for API clients
pub async fn serve_api_setup_view() -> Result<Html<&'static str>, ApiError> {
    render("api-setup.html")
}

/// GET /static/*path - Embedded CSS, JS, and icons
pub async fn serve_static_file(uri: Uri) -> Result<Response, ApiError> {
    let asset = web::resolve_static(uri.path()).map_err(|e| {
        tracing::error!(path = %uri.path(), error = %e, "Failed to serve static file");
        ApiError::PlainText("Failed to serve static file")
    })?;

    Ok(([(header::CONTENT_TYPE, asset.content_type)], asset.bytes).into_response())
}

/// GET /health - Liveness check with the running crate version
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}
