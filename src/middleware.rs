//! Request middleware: request-id spans and the basic-auth gate.
//!
//! `request_id_layer` generates a UUID v4 for each incoming request and wraps
//! the request lifecycle in a tracing span, so every log line emitted while
//! handling it carries the request_id. `basic_auth_layer` guards protected
//! routes with the single configured credential pair.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// Extension type for accessing the request ID in handlers if needed.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that generates a request ID and creates a request span.
///
/// This should be the outermost middleware layer so the span wraps
/// all request processing, including other middleware and handlers.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    request.extensions_mut().insert(RequestId(request_id));

    async move {
        let response = next.run(request).await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

/// Middleware that rejects requests without the configured basic-auth pair.
///
/// Missing, malformed and mismatched credentials all produce the same 401;
/// the wrapped handler never runs for them.
pub async fn basic_auth_layer(
    State(state): State<AppState>,
    credentials: Result<TypedHeader<Authorization<Basic>>, TypedHeaderRejection>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(basic) = credentials.map_err(|_| {
        tracing::debug!("Missing or malformed Authorization header");
        AppError::Unauthorized
    })?;

    if !state
        .config
        .credentials
        .matches(basic.username(), basic.password())
    {
        tracing::warn!(username = %basic.username(), "Rejected API credentials");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
