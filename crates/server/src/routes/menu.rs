//! Catalog route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::{info, instrument};

use cafebot_core::{Menu, MenuCategory};

use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadMenuResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub menu: Vec<MenuCategory>,
}

/// Replace the stored catalog with the built-in one and start ordering from it.
#[instrument(skip(state))]
pub async fn upload(State(state): State<AppState>) -> Result<Json<UploadMenuResponse>> {
    let menu = Menu::builtin();
    menu.validate()?;
    state.documents().replace_menu(&menu).await?;
    state.replace_menu(menu);

    info!("Menu uploaded");
    Ok(Json(UploadMenuResponse {
        status: "Menu uploaded",
    }))
}

/// The stored catalog.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<MenuResponse>> {
    let menu = state.documents().find_menu().await?;
    Ok(Json(MenuResponse {
        menu: menu.categories().to_vec(),
    }))
}
