use crate::blockchain::contracts::ContentData;
use crate::blockchain::transactions::RelayReceipt;
use crate::utils::errors::RelayError;
use crate::utils::validation::{
    validate_content_uri, validate_ether_amount, validate_ethereum_address, validate_signature_hex,
};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateContentRequest {
    #[validate(custom(function = validate_content_uri))]
    pub uri: String,
    #[validate(custom(function = validate_ether_amount))]
    pub price: String,
    #[validate(custom(function = validate_signature_hex))]
    pub signature: String,
    #[validate(custom(function = validate_ethereum_address))]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PurchaseContentRequest {
    pub id: u64,
    #[validate(custom(function = validate_ether_amount))]
    pub value: String,
    #[validate(custom(function = validate_signature_hex))]
    pub signature: String,
    #[validate(custom(function = validate_ethereum_address))]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VoteRequest {
    pub id: u64,
    #[validate(custom(function = validate_signature_hex))]
    pub signature: String,
    #[validate(custom(function = validate_ethereum_address))]
    pub address: String,
}

/// Handler-level error. Every relay failure flattens to a 500 with the
/// exception message; callers get no structured error codes.
pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

pub fn relay_routes() -> Router<AppState> {
    Router::new()
        .route("/createContent", post(create_content))
        .route("/purchaseContent", post(purchase_content))
        .route("/vote", post(vote))
        .route("/getActiveContent", get(active_content))
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/", get(metrics))
}

async fn create_content(
    State(state): State<AppState>,
    Json(request): Json<CreateContentRequest>,
) -> Result<Json<RelayReceipt>, ApiError> {
    request.validate().map_err(RelayError::from)?;

    let receipt = state
        .engine
        .create_content(
            &request.uri,
            &request.price,
            &request.signature,
            &request.address,
        )
        .await?;

    Ok(Json(receipt))
}

async fn purchase_content(
    State(state): State<AppState>,
    Json(request): Json<PurchaseContentRequest>,
) -> Result<Json<RelayReceipt>, ApiError> {
    request.validate().map_err(RelayError::from)?;

    let receipt = state
        .engine
        .purchase_content(
            request.id,
            &request.value,
            &request.signature,
            &request.address,
        )
        .await?;

    Ok(Json(receipt))
}

async fn vote(
    State(state): State<AppState>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<RelayReceipt>, ApiError> {
    request.validate().map_err(RelayError::from)?;

    let receipt = state
        .engine
        .vote(request.id, &request.signature, &request.address)
        .await?;

    Ok(Json(receipt))
}

async fn active_content(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContentData>>, ApiError> {
    let contents = state.engine.active_content().await?;
    Ok(Json(contents))
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    Ok(state.metrics.render()?)
}
