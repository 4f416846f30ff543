use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::state::AppState;

#[derive(Deserialize)]
pub struct AdminLogin {
    password: Option<String>,
}

/// POST /api/auth/admin
///
/// Compares the submitted password with `ADMIN_PASSWORD`. Nothing is issued
/// on success; the client keeps its own flag.
pub async fn login(State(state): State<AppState>, Json(body): Json<AdminLogin>) -> Response {
    let Some(expected) = state.admin_password.as_deref() else {
        error!("ADMIN_PASSWORD is not set");
        return failure(StatusCode::INTERNAL_SERVER_ERROR, "Server configuration error");
    };

    let Some(password) = body.password.filter(|p| !p.is_empty()) else {
        return failure(StatusCode::BAD_REQUEST, "Password is required");
    };

    if password == expected {
        info!("Admin login succeeded");
        Json(json!({ "success": true })).into_response()
    } else {
        info!("Admin login rejected");
        failure(StatusCode::UNAUTHORIZED, "Incorrect password")
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}
