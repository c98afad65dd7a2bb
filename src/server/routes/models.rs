//! Models listing endpoint
//!
//! Aggregates the model lists of every configured backend, tags each entry
//! with the backend that serves it, and returns a sorted, deduplicated
//! list.

use crate::server::state::AppState;
use actix_web::{web, HttpResponse, Result as ActixResult};
use tracing::warn;

/// Aggregated models endpoint
pub async fn models(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let mut all_models: Vec<serde_json::Value> = Vec::new();

    for (kind, adapter) in state.adapters.iter() {
        match adapter.models().await {
            Ok(models) => {
                for mut model in models {
                    if let Some(object) = model.as_object_mut() {
                        object.insert(
                            "backend_name".to_string(),
                            serde_json::Value::String(adapter.name().to_string()),
                        );
                        object.insert(
                            "backend_type".to_string(),
                            serde_json::Value::String(kind.to_string()),
                        );
                    }
                    all_models.push(model);
                }
            }
            Err(e) => {
                // One unreachable backend must not empty the whole list.
                warn!(backend = adapter.name(), error = %e, "failed to list models");
            }
        }
    }

    all_models.sort_by_key(|model| model.to_string());
    all_models.dedup_by_key(|model| model.to_string());

    Ok(HttpResponse::Ok().json(serde_json::json!({ "data": all_models })))
}
