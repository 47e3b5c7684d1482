//! HTTP request handlers.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{info, warn};

use super::types::{
    ContactRequest, ContactResponse, ExportQuery, HealthResponse, RootResponse, SignupRequest,
    SignupResponse,
};
use super::AppState;
use crate::contact::NewContactMessage;
use crate::error::ApiError;
use crate::export;
use crate::signup::NewSignup;

/// Service metadata, no side effects.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        name: "Waitlist API",
        status: "ok",
        health: "/health",
    })
}

/// Health check: 200 when the record store answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.ping().await?;
    let signup_count = state.store.count().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        signup_count,
    }))
}

/// Register a new signup.
pub async fn join_waitlist(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    let signup = NewSignup::parse(request).map_err(ApiError::Validation)?;
    info!(email = %signup.email, "Signup request received");

    let record = state.store.insert(&signup).await?;
    info!(email = %record.email, id = %record.id, "Signup persisted");

    // The record is already durable; the welcome email is best-effort and
    // its outcome never changes this response.
    let notifier = state.notifier.clone();
    let committed = record.clone();
    tokio::spawn(async move {
        notifier.notify(&committed).await;
    });

    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Store a contact-form message.
pub async fn submit_contact(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let ip_address = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .or_else(|| connect_info.map(|ConnectInfo(addr)| addr.ip().to_string()));
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    let message = NewContactMessage::parse(request, ip_address, user_agent)
        .map_err(ApiError::Validation)?;
    let stored = state.store.insert_contact(&message).await?;
    info!(id = %stored.id, "Contact message stored");

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            id: stored.id,
            created_at: stored.created_at,
        }),
    ))
}

/// Export every signup as CSV, gated by the admin key.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    if let Err(e) = export::check_export_key(state.export_key.as_deref(), query.key.as_deref()) {
        warn!("Export request rejected");
        return Err(e);
    }

    let records = state.store.list_all().await?;
    info!(count = records.len(), "Exporting waitlist");
    let body = export::to_csv(&records);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"waitlist.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}
