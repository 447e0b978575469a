mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use config::Settings;
use core::Catalog;
use routes::events::AppState;
use services::{load_businesses, load_riders, Dispatcher, KeyedStore};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting AdMatch engine...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Load the bootstrap catalog before accepting any live event
    let riders = load_riders(&settings.bootstrap.riders_file).unwrap_or_else(|e| {
        error!("Failed to load rider bootstrap file: {}", e);
        panic!("Bootstrap error: {}", e);
    });

    let businesses = load_businesses(&settings.bootstrap.businesses_file).unwrap_or_else(|e| {
        error!("Failed to load business bootstrap file: {}", e);
        panic!("Bootstrap error: {}", e);
    });

    let catalog: Catalog = businesses
        .into_iter()
        .map(|b| (b.store_id.clone(), b))
        .collect();

    info!(
        riders = riders.len(),
        businesses = catalog.len(),
        "Bootstrap catalog loaded"
    );

    // Outbound ad stream: placements are serialized and logged on the
    // ad_stream target, where the deployment forwards them to the broker.
    let (ad_tx, mut ad_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(placement) = ad_rx.recv().await {
            match serde_json::to_string(&placement) {
                Ok(json) => info!(target: "ad_stream", "{}", json),
                Err(e) => error!("Failed to serialize ad placement: {}", e),
            }
        }
    });

    // Spawn the partition workers
    let partitions = settings.engine.partitions;
    let dispatcher = Arc::new(Dispatcher::spawn(
        partitions,
        settings.engine.queue_depth,
        riders,
        Arc::new(catalog),
        settings.engine.interest_min_duration_ms,
        ad_tx,
    ));

    info!(partitions, "Dispatcher initialized");

    // Fatal channel: an inbound contract violation stops the process.
    let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel::<String>();

    let app_state = AppState {
        dispatcher,
        fatal: fatal_tx,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run();

    let server_handle = server.handle();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result,
        Some(reason) = fatal_rx.recv() => {
            error!("Unrecoverable engine failure: {}", reason);
            server_handle.stop(true).await;
            Err(std::io::Error::new(std::io::ErrorKind::InvalidData, reason))
        }
    }
}
