//! HTTP surface for the aggregation service
//!
//! One POST endpoint; the body is parsed by hand so a malformed payload maps
//! to the documented 400 shape instead of the framework's rejection body.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::post,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

use crate::config::AggregatorConfig;
use crate::error::{INTERNAL_ERROR_MESSAGE, INVALID_INPUT_MESSAGE};
use crate::models::{AdventureRequest, AdventureResponse, RequestKind};
use crate::{Aggregator, AggregatorError};

/// Header carrying a caller-supplied credential for the chat provider
pub const MODEL_KEY_HEADER: &str = "x-model-api-key";

#[derive(Debug, Deserialize)]
struct KindQuery {
    #[serde(default)]
    kind: Option<String>,
}

/// Build the API router around a shared aggregator
pub fn router(aggregator: Arc<Aggregator>) -> Router {
    Router::new()
        .route("/adventure", post(post_adventure))
        .with_state(aggregator)
}

async fn post_adventure(
    State(aggregator): State<Arc<Aggregator>>,
    Query(query): Query<KindQuery>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<AdventureResponse>) {
    let Ok(request) = serde_json::from_str::<AdventureRequest>(&body) else {
        debug!("rejected unparseable request body");
        return invalid_input();
    };

    let kind = match query.kind.as_deref() {
        None => RequestKind::default(),
        Some(raw) => match raw.parse::<RequestKind>() {
            Ok(kind) => kind,
            Err(error) => {
                debug!(%error, "rejected request kind");
                return invalid_input();
            }
        },
    };

    let api_key = headers
        .get(MODEL_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|key| !key.is_empty());

    match aggregator.handle(kind, &request, api_key).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(error @ AggregatorError::Validation { .. }) => {
            debug!(%error, "rejected invalid request");
            invalid_input()
        }
        Err(error) => {
            // internal detail goes to the log, never to the caller
            error!(%error, "aggregation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AdventureResponse::from_error(INTERNAL_ERROR_MESSAGE)),
            )
        }
    }
}

fn invalid_input() -> (StatusCode, Json<AdventureResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(AdventureResponse::from_error(INVALID_INPUT_MESSAGE)),
    )
}

/// Run the web server until shutdown
pub async fn run(config: &AggregatorConfig) -> anyhow::Result<()> {
    let aggregator = Arc::new(Aggregator::new(config)?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new().nest("/api", router(aggregator)).layer(cors);

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(
        "Aggregation endpoint listening at http://localhost:{}/api/adventure",
        config.server.port
    );
    axum::serve(listener, app).await?;
    Ok(())
}
