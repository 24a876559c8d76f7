//! Authentication Routes

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /api/auth/signup, /api/auth/login: public (on the auth middleware's
///   exemption list, everything else under /api requires a token)
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/auth/signup", post(handler::signup))
        .route("/api/auth/login", post(handler::login))
}
