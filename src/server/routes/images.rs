//! Image generation endpoint

use crate::core::backend::AdapterKind;
use crate::server::state::AppState;
use actix_web::{web, HttpResponse, Result as ActixResult};
use tracing::info;

/// Image generations endpoint, relayed to the configured image backend
pub async fn images_generations(
    state: web::Data<AppState>,
    request: web::Json<serde_json::Value>,
) -> ActixResult<HttpResponse> {
    let adapter = state.adapters.require(AdapterKind::Image)?;
    info!(backend = adapter.name(), "image generation request");

    let response = adapter.images_generations(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
