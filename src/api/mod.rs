// 🔌 HTTP API - router, shared state, handlers, and error mapping
//
// Each route is bound to exactly one method. Any other method gets
// 405 Method Not Allowed from the router before a handler runs.

pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ErrorResponse};
pub use handlers::{ConfigResponse, HealthResponse, StatusResponse};
pub use state::AppState;

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let api_routes: Router<AppState> = Router::new()
        .route("/categories", get(handlers::get_categories))
        .route("/categories/edit", put(handlers::edit_categories))
        .route("/currency/edit", put(handlers::edit_currency))
        .route("/expense", put(handlers::add_expense))
        .route("/expenses", get(handlers::get_expenses))
        .route("/expense/delete", delete(handlers::delete_expense))
        .route("/export/csv", get(handlers::export_csv))
        .route("/export/json", get(handlers::export_json));

    let page_routes: Router<AppState> = Router::new()
        .route("/", get(handlers::serve_table_view))
        .route("/table", get(handlers::serve_table_view))
        .route("/settings", get(handlers::serve_settings_page))
        .route("/api-setup", get(handlers::serve_api_setup_view))
        .route("/static/*path", get(handlers::serve_static_file))
        .route("/health", get(handlers::health_check));

    Router::new()
        .merge(api_routes)
        .merge(page_routes)
        .layer(middleware::from_fn(log_method_not_allowed))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn log_method_not_allowed(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    if response.status() == StatusCode::METHOD_NOT_ALLOWED {
        tracing::warn!(%method, %path, "Method not allowed");
    }

    response
}
