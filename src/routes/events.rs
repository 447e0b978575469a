use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::models::{ErrorResponse, EventAccepted, HealthResponse, InboundEvent};
use crate::services::Dispatcher;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    /// Signals an unrecoverable contract violation up to the process loop.
    pub fatal: mpsc::UnboundedSender<String>,
}

/// Configure all event-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/events", web::post().to(ingest_event));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    // Degraded once any partition worker stops consuming.
    let status = if state.dispatcher.is_accepting() {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Event ingest endpoint, the in-process stand-in for the inbound channel
/// of the event bus.
///
/// POST /api/v1/events
///
/// Request body: one inbound event object, discriminated by `type`:
/// `RIDER_STATUS`, `RIDER_INTEREST` or `RIDE_REQUEST`.
async fn ingest_event(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> impl Responder {
    let event = match InboundEvent::from_value(body.into_inner()) {
        Ok(event) => event,
        Err(err) if err.is_contract_violation() => {
            // An unknown type on the recognized inbound channel means the
            // upstream transport or schema is broken; stop the process.
            tracing::error!(%err, "contract violation on inbound channel, halting");
            let _ = state.fatal.send(err.to_string());
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "contract_violation".to_string(),
                message: err.to_string(),
                status_code: 500,
            });
        }
        Err(err) => {
            tracing::info!(%err, "rejected malformed inbound event");
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "malformed_event".to_string(),
                message: err.to_string(),
                status_code: 400,
            });
        }
    };

    if let Err(errors) = event.validate_payload() {
        tracing::info!(kind = event.kind(), "validation failed for inbound event: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let event_id = uuid::Uuid::new_v4().to_string();
    tracing::debug!(
        event_id = %event_id,
        kind = event.kind(),
        user_id = event.partition_key(),
        "accepted inbound event"
    );

    match state.dispatcher.dispatch(event).await {
        Ok(partition) => HttpResponse::Accepted().json(EventAccepted {
            accepted: true,
            partition,
            event_id,
        }),
        Err(err) => {
            tracing::error!(%err, "failed to enqueue event, halting");
            let _ = state.fatal.send(err.to_string());
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "engine_unavailable".to_string(),
                message: err.to_string(),
                status_code: 500,
            })
        }
    }
}
