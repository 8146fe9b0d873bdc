use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::account::models::AccountId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity attached to request extensions for protected handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub username: String,
}

/// Middleware that runs the bearer gate before protected handlers.
///
/// Rejections short-circuit with 401 and the rejection reason as message.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let authorization = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            unauthorized(auth::GateRejection::InvalidScheme.to_string())
        })?),
        None => None,
    };

    let identity = state.gate.authorize(authorization).map_err(|rejection| {
        tracing::warn!(reason = %rejection, "Bearer gate rejected request");
        unauthorized(rejection.to_string())
    })?;

    let account_id = AccountId::from_string(&identity.subject).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not an account id");
        unauthorized(auth::TokenRejection::Malformed.to_string())
    })?;

    req.extensions_mut().insert(AuthenticatedAccount {
        account_id,
        username: identity.display_name,
    });

    Ok(next.run(req).await)
}

fn unauthorized(message: String) -> Response {
    ApiError::Unauthorized(message).into_response()
}
