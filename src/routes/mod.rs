//! HTTP routes.
//!
//! Student routes live under [`API_PREFIX`] and sit behind the basic-auth
//! layer. `/health` and the fallbacks are public. Every request is wrapped in
//! a request-id span, and handler panics become a generic 500 JSON body.

pub mod health;
pub mod students;

use std::any::Any;

use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::config::API_PREFIX;
use crate::error::AppError;
use crate::middleware::{basic_auth_layer, request_id_layer};
use crate::state::AppState;

/// Unmatched paths.
async fn not_found() -> AppError {
    AppError::NotFound("Not found".to_string())
}

/// Known paths hit with an unsupported method.
async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Creates the Axum router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Student API - basic auth required on every route
    let student_routes = Router::new()
        .route("/get_student_ages", get(students::list_ages))
        .route("/get_student_ages/{student_name}", get(students::consume_age))
        .route("/students", post(students::create).get(students::list))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            basic_auth_layer,
        ));

    // Health check - unauthenticated, for liveness probes
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .nest(API_PREFIX, student_routes)
        .merge(health_routes)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
