//! JSON HTTP front end for the clinic records system.
//!
//! Routes keep the flat `/add_*` and `/get_*` layout of the browser client.
//! All persistence goes through `clinic_core`.

mod error;
mod handlers;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use clinic_core::ClinicConfig;
use log::info;
use std::sync::Arc;
use std::time::Instant;

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClinicConfig>,
}

/// Builds the full route table over the configured database.
pub fn router(config: ClinicConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/health", get(handlers::health))
        .route("/add_patient", post(handlers::add_patient))
        .route("/get_patients", get(handlers::get_patients))
        .route("/add_doctor", post(handlers::add_doctor))
        .route("/get_doctors", get(handlers::get_doctors))
        .route("/add_appointment", post(handlers::add_appointment))
        .route("/get_appointments", get(handlers::get_appointments))
        .route("/add_lab", post(handlers::add_lab))
        .route("/get_lab", get(handlers::get_lab))
        .route("/add_bill", post(handlers::add_bill))
        .route("/get_bills", get(handlers::get_bills))
        .route("/get_patient_summary", get(handlers::get_patient_summary))
        .route("/get_doctor_workload", get(handlers::get_doctor_workload))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    info!(
        "event=http_request module=http method={} path={} status={} elapsed_ms={}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}
