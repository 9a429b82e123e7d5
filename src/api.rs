// 🌐 REST API with Axum
// Thin boundary: wire translation + status codes. All rules live in the tracker.

use crate::dashboard::{CategorySummary, DashboardStats};
use crate::db::{Page, DEFAULT_PAGE_LIMIT};
use crate::entities::{Expense, ExpenseUpdate, NewExpense};
use crate::error::ExpenseError;
use crate::tracker::ExpenseTracker;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    tracker: Arc<ExpenseTracker>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(MessageResponse {
            message: message.to_string(),
        })
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

/// GET /api/expenses query string
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

pub enum ApiError {
    Expense(ExpenseError),
    /// Body that is not JSON or does not fit the payload type
    Body(JsonRejection),
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        ApiError::Expense(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::Expense(ExpenseError::Persistence(msg)) => {
                tracing::error!("storage failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal storage error".to_string(),
                )
            }
            ApiError::Expense(err) => {
                let status = if err.is_not_found() {
                    StatusCode::NOT_FOUND
                } else {
                    StatusCode::BAD_REQUEST
                };
                (status, err.to_string())
            }
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - Banner
async fn root() -> impl IntoResponse {
    MessageResponse::new("Expense Tracker API - personal expense control")
}

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

/// GET /api/categories - Registry labels in order
async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.tracker.categories().to_vec())
}

/// POST /api/expenses
async fn create_expense(
    State(state): State<AppState>,
    payload: Result<Json<NewExpense>, JsonRejection>,
) -> ApiResult<Expense> {
    let Json(payload) = payload?;
    let expense = state.tracker.create_expense(&payload)?;
    tracing::info!(id = %expense.id, category = %expense.category, "expense created");
    Ok(Json(expense))
}

/// GET /api/expenses?limit=&offset=
async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Expense>> {
    let page = Page::new(
        query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
        query.offset.unwrap_or(0),
    );
    Ok(Json(state.tracker.list_expenses(page)?))
}

/// GET /api/expenses/:id
async fn get_expense(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Expense> {
    Ok(Json(state.tracker.get_expense(&id)?))
}

/// PUT /api/expenses/:id
async fn update_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseUpdate>, JsonRejection>,
) -> ApiResult<Expense> {
    let Json(payload) = payload?;
    let expense = state.tracker.update_expense(&id, &payload)?;
    tracing::info!(id = %expense.id, "expense updated");
    Ok(Json(expense))
}

/// DELETE /api/expenses/:id
async fn delete_expense(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.tracker.delete_expense(&id)?;
    tracing::info!(id = %id, "expense deleted");
    Ok(MessageResponse::new("Expense deleted"))
}

/// GET /api/dashboard/stats
async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    Ok(Json(state.tracker.dashboard_stats()?))
}

/// GET /api/dashboard/categories - current month only
async fn category_summaries(State(state): State<AppState>) -> ApiResult<Vec<CategorySummary>> {
    Ok(Json(state.tracker.category_summaries()?))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(tracker: Arc<ExpenseTracker>) -> Router {
    let state = AppState { tracker };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/categories", get(list_categories))
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/dashboard/stats", get(dashboard_stats))
        .route("/dashboard/categories", get(category_summaries))
        .with_state(state);

    Router::new()
        .route("/", get(root))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
