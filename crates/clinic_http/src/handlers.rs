//! Route handlers.
//!
//! # Responsibility
//! - Decode JSON bodies, run one core operation on a blocking task and
//!   encode the result.
//!
//! # Invariants
//! - Each request opens its own connection from the shared `ClinicConfig`.
//! - Listing rows are positional arrays led by the row id.

use crate::error::ApiError;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use clinic_core::model::validation::{format_date, format_time, format_timestamp};
use clinic_core::{
    parse_date, parse_time, ClinicService, NewAppointment, NewBill, NewDoctor, NewLabTest,
    NewPatient, RepoResult,
};
use serde::Deserialize;
use serde_json::{json, Value};

type JsonBody<T> = Result<Json<T>, JsonRejection>;
type ApiResult = Result<Json<Value>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct AddAppointmentRequest {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddLabRequest {
    pub patient_id: i64,
    pub test: String,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddBillRequest {
    pub patient_id: i64,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
}

/// Runs `op` against a fresh connection on the blocking pool.
async fn with_service<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&ClinicService<'_>) -> RepoResult<T> + Send + 'static,
{
    let config = state.config.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let conn = config.open_db()?;
        let service = ClinicService::try_new(&conn)?;
        op(&service)
    })
    .await;

    match joined {
        Ok(result) => result.map_err(ApiError::from),
        Err(err) => Err(ApiError::Internal(format!("request task failed: {err}"))),
    }
}

fn success() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// Writes

pub async fn add_patient(State(state): State<AppState>, body: JsonBody<NewPatient>) -> ApiResult {
    let Json(patient) = body?;
    with_service(&state, move |service| service.add_patient(patient)).await?;
    Ok(success())
}

pub async fn add_doctor(State(state): State<AppState>, body: JsonBody<NewDoctor>) -> ApiResult {
    let Json(doctor) = body?;
    with_service(&state, move |service| service.add_doctor(doctor)).await?;
    Ok(success())
}

pub async fn add_appointment(
    State(state): State<AppState>,
    body: JsonBody<AddAppointmentRequest>,
) -> ApiResult {
    let Json(req) = body?;
    with_service(&state, move |service| {
        service.schedule_appointment(NewAppointment {
            patient_id: req.patient_id,
            doctor_id: req.doctor_id,
            date: parse_date(&req.date)?,
            time: parse_time(&req.time)?,
            notes: req.notes,
        })
    })
    .await?;
    Ok(success())
}

pub async fn add_lab(State(state): State<AppState>, body: JsonBody<AddLabRequest>) -> ApiResult {
    let Json(req) = body?;
    with_service(&state, move |service| {
        service.order_lab_test(NewLabTest::new(req.patient_id, req.test, req.cost))
    })
    .await?;
    Ok(success())
}

pub async fn add_bill(State(state): State<AppState>, body: JsonBody<AddBillRequest>) -> ApiResult {
    let Json(req) = body?;
    with_service(&state, move |service| {
        service.create_bill(NewBill {
            patient_id: req.patient_id,
            amount: req.amount,
            description: req.description,
        })
    })
    .await?;
    Ok(success())
}

// Listings

pub async fn get_patients(State(state): State<AppState>) -> ApiResult {
    let rows = with_service(&state, |service| service.list_patients_with_doctor()).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|row| {
            let p = row.patient;
            json!([p.id, p.name, p.age, p.gender, p.contact, p.disease, row.doctor_name])
        })
        .collect();
    Ok(Json(Value::Array(rows)))
}

pub async fn get_doctors(State(state): State<AppState>) -> ApiResult {
    let rows = with_service(&state, |service| service.list_doctors()).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|d| json!([d.id, d.name, d.specialization, d.contact]))
        .collect();
    Ok(Json(Value::Array(rows)))
}

pub async fn get_appointments(State(state): State<AppState>) -> ApiResult {
    let rows = with_service(&state, |service| service.list_appointment_views()).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|view| {
            let a = view.appointment;
            json!([
                a.id,
                view.patient_name,
                view.doctor_name,
                format_date(a.date),
                format_time(a.time),
                a.notes
            ])
        })
        .collect();
    Ok(Json(Value::Array(rows)))
}

pub async fn get_lab(State(state): State<AppState>) -> ApiResult {
    let rows = with_service(&state, |service| service.list_lab_test_views(false)).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|view| {
            let t = view.test;
            json!([
                t.id,
                view.patient_name,
                t.test_name,
                t.cost,
                format_timestamp(t.ordered_on),
                t.result,
                t.reported_on.map(format_timestamp)
            ])
        })
        .collect();
    Ok(Json(Value::Array(rows)))
}

pub async fn get_bills(State(state): State<AppState>) -> ApiResult {
    let rows = with_service(&state, |service| service.list_bill_views(false)).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|view| {
            let b = view.bill;
            json!([
                b.id,
                view.patient_name,
                b.amount,
                b.description,
                format_date(b.billed_on),
                b.paid
            ])
        })
        .collect();
    Ok(Json(Value::Array(rows)))
}

// Reports

pub async fn get_patient_summary(State(state): State<AppState>) -> ApiResult {
    let rows = with_service(&state, |service| service.patient_summary()).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|r| json!([r.patient_id, r.name, r.appointments, r.lab_tests, r.unpaid_amount]))
        .collect();
    Ok(Json(Value::Array(rows)))
}

pub async fn get_doctor_workload(State(state): State<AppState>) -> ApiResult {
    let rows = with_service(&state, |service| service.doctor_workload()).await?;
    let rows: Vec<Value> = rows
        .into_iter()
        .map(|r| {
            json!([
                r.doctor_id,
                r.name,
                r.specialization,
                r.appointments_count,
                r.patients_assigned
            ])
        })
        .collect();
    Ok(Json(Value::Array(rows)))
}
