//! JSON API for the rate calculator.
//!
//! Endpoints:
//! - `GET  /api/v1/catalog`    — roles, regions, seniority levels, options, currencies
//! - `POST /api/v1/price`      — one pricing computation (team or custom mode)
//! - `POST /api/v1/quote/send` — email the configured quote to a contact
//! - `POST /api/v1/quote/pdf`  — export the rate card (PDF, or HTML fallback)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use ratecard_core::cache::RateCache;
use ratecard_core::currency::{currency_info, known_currencies};
use ratecard_core::domain::quote::{PricingRequest, QuoteContact, QuoteDelivery};
use ratecard_core::errors::ApplicationError;
use ratecard_core::lookup::RateLookup;
use ratecard_core::pricing::{
    duration_options, workload_options, DurationOption, RateQuoter, WorkloadOption,
};

use crate::email::{MailError, QuoteMailer};
use crate::pdf::PdfGenerator;

#[derive(Clone)]
pub struct ApiState {
    pub lookup: Arc<dyn RateLookup>,
    pub quoter: Arc<RateQuoter<Arc<dyn RateLookup>>>,
    pub cache: Arc<RateCache>,
    pub mailer: Arc<QuoteMailer>,
    pub pdf: Arc<PdfGenerator>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/catalog", get(catalog))
        .route("/api/v1/price", post(price))
        .route("/api/v1/quote/send", post(send_quote))
        .route("/api/v1/quote/pdf", post(export_pdf))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CurrencyView {
    pub code: String,
    pub symbol: String,
    pub name: String,
    pub decimal_places: u32,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub roles: Vec<String>,
    pub regions: Vec<String>,
    pub seniority_levels: Vec<String>,
    pub workload_options: Vec<WorkloadOption>,
    pub duration_options: Vec<DurationOption>,
    pub currencies: Vec<CurrencyView>,
}

#[derive(Debug, Deserialize)]
pub struct SendQuoteRequest {
    pub contact: QuoteContact,
    pub delivery: QuoteDelivery,
}

#[derive(Debug, Serialize)]
pub struct SendQuoteResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiError { error: message.into() })).into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn catalog(State(state): State<ApiState>) -> Json<CatalogResponse> {
    let roles = state.lookup.roles().await;
    let regions = state.lookup.regions().await;
    let seniority_levels = state.lookup.seniority_levels().await;

    let currencies = known_currencies()
        .into_iter()
        .filter_map(|code| {
            currency_info(code).map(|info| CurrencyView {
                code: code.to_string(),
                symbol: info.symbol.to_string(),
                name: info.name.to_string(),
                decimal_places: info.decimal_places,
            })
        })
        .collect();

    Json(CatalogResponse {
        roles,
        regions,
        seniority_levels,
        workload_options: workload_options(),
        duration_options: duration_options(),
        currencies,
    })
}

pub async fn price(
    State(state): State<ApiState>,
    Json(request): Json<PricingRequest>,
) -> Response {
    if request.role.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "role must not be empty");
    }
    if request.display_currency.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "display_currency must not be empty");
    }

    // whichever snapshot is current; a concurrent refresh swaps the Arc,
    // never the table this computation is reading
    let rates = state.cache.snapshot();
    let result = state.quoter.price(&request, &rates).await;

    info!(
        mode = ?request.mode,
        role = %request.role,
        currency = %request.display_currency,
        amount = %result.base_monthly_amount,
        "price computed"
    );

    Json(result).into_response()
}

pub async fn send_quote(
    State(state): State<ApiState>,
    Json(request): Json<SendQuoteRequest>,
) -> Response {
    if request.contact.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "name is required");
    }
    if !request.contact.has_plausible_email() {
        return error_response(StatusCode::BAD_REQUEST, "a valid email address is required");
    }
    if request.delivery.team_rate.trim().is_empty()
        || request.delivery.custom_rate.trim().is_empty()
    {
        return error_response(StatusCode::BAD_REQUEST, "both formatted rates are required");
    }

    match state.mailer.send_quote(&request.contact, &request.delivery).await {
        Ok(receipt) => Json(SendQuoteResponse {
            success: true,
            message: "Quote sent successfully".to_string(),
            id: receipt.message_id,
        })
        .into_response(),
        Err(MailError::NotConfigured) => {
            warn!("quote email requested but delivery is not configured");
            error_response(StatusCode::SERVICE_UNAVAILABLE, "email delivery is not configured")
        }
        Err(error) => {
            let correlation_id = Uuid::new_v4().to_string();
            warn!(error = %error, correlation_id = %correlation_id, "quote email delivery failed");
            let interface =
                ApplicationError::Integration(error.to_string()).into_interface(correlation_id);
            error_response(StatusCode::BAD_GATEWAY, interface.user_message())
        }
    }
}

pub async fn export_pdf(
    State(state): State<ApiState>,
    Json(delivery): Json<QuoteDelivery>,
) -> Response {
    if delivery.team_rate.trim().is_empty() || delivery.custom_rate.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "both formatted rates are required");
    }

    match state.pdf.generate_rate_card(&delivery).await {
        Ok(result) => result.into_response(&format!("rate-card-{}.pdf", Uuid::new_v4())),
        Err(error) => {
            let correlation_id = Uuid::new_v4().to_string();
            warn!(error = %error, correlation_id = %correlation_id, "rate card export failed");
            let interface =
                ApplicationError::Integration(error.to_string()).into_interface(correlation_id);
            error_response(StatusCode::BAD_GATEWAY, interface.user_message())
        }
    }
}
