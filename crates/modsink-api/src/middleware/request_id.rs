//! Request ID injection for correlating callbacks across services.

use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

/// Middleware to inject request ID into all responses.
///
/// Adds an `X-Request-Id` header so a callback delivery can be matched
/// against provider-side logs, and stores the ID in request extensions
/// for handlers.
pub async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-Id", header_value);
    }

    response
}
