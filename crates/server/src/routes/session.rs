//! Customer registration and cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use cafebot_core::{CartLine, DEFAULT_CUSTOMER_NAME, SessionId};

use crate::sessions::SessionError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub session_id: SessionId,
}

/// Outcome of a session operation.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub cart: Vec<CartLine>,
    pub customer_name: String,
}

/// Create or update a session with customer details.
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Json<SuccessResponse> {
    state
        .sessions()
        .upsert_customer(
            &request.session_id,
            &request.customer_name,
            &request.customer_phone,
        )
        .await;

    info!("Customer registered");
    Json(SuccessResponse {
        success: true,
        message: format!(
            "Welcome, {}! How can I help you today?",
            request.customer_name
        ),
    })
}

/// Current cart and customer name. Unknown sessions read as an empty guest cart.
#[instrument(skip(state), fields(session_id = %session_id))]
pub async fn cart(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Json<CartResponse> {
    let response = match state.sessions().get(&session_id).await {
        Some(shared) => {
            let session = shared.lock().await;
            CartResponse {
                cart: session.cart.lines().to_vec(),
                customer_name: session.customer_name.clone(),
            }
        }
        None => CartResponse {
            cart: Vec::new(),
            customer_name: DEFAULT_CUSTOMER_NAME.to_string(),
        },
    };
    Json(response)
}

/// Empty a session's cart.
#[instrument(skip(state), fields(session_id = %session_id))]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Json<SuccessResponse> {
    let response = match state.sessions().clear_cart(&session_id).await {
        Ok(()) => SuccessResponse {
            success: true,
            message: "Cart cleared successfully".to_string(),
        },
        Err(SessionError::NotFound(_)) => SuccessResponse {
            success: false,
            message: "Session not found".to_string(),
        },
    };
    Json(response)
}
