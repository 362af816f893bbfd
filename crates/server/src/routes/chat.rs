//! Chat route handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use cafebot_core::{CartLine, SessionId};

use crate::services::ChatService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: SessionId,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub cart_items: Vec<CartLine>,
    pub has_receipt: bool,
}

/// Handle one customer message.
///
/// Creates a guest session for unknown IDs. Always answers 200; failures of
/// the store or the language model surface as reply text.
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let menu = state.menu();
    let shared = state.sessions().get_or_create(&request.session_id).await;
    let mut session = shared.lock().await;

    let reply = ChatService::new(&menu, state.documents(), state.generator())
        .respond(&mut session, &request.message)
        .await;

    info!(
        intent = %reply.intent,
        has_receipt = reply.has_receipt,
        cart_lines = session.cart.len(),
        "Chat turn complete"
    );

    Json(ChatResponse {
        response: reply.response,
        cart_items: session.cart.lines().to_vec(),
        has_receipt: reply.has_receipt,
    })
}
