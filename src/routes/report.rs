use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::{
    export,
    filter::{self, FilterCriteria},
    models::call_report::{CallReport, CallReportRequest, CallReportStatusRequest},
    routes::{respond_error, ApiResponse},
    state::AppState,
};

#[get("/reports")]
pub async fn get_call_reports(
    state: web::Data<AppState>,
    query: web::Query<FilterCriteria>,
) -> HttpResponse {
    let criteria = query.into_inner();
    let reports = state.call_reports.read().expect("STORE_LOCK_POISONED");

    let matched: Vec<CallReport> = filter::apply(reports.all(), &criteria)
        .into_iter()
        .cloned()
        .collect();
    HttpResponse::Ok().json(ApiResponse::ok("REPORTS_FOUND", matched))
}

#[get("/reports/export")]
pub async fn export_call_reports(
    state: web::Data<AppState>,
    query: web::Query<FilterCriteria>,
) -> HttpResponse {
    let criteria = query.into_inner();
    let reports = state.call_reports.read().expect("STORE_LOCK_POISONED");

    let matched = filter::apply(reports.all(), &criteria);
    match export::to_csv(&matched) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(bytes),
        Err(error) => respond_error(error),
    }
}

#[get("/reports/{report_id}")]
pub async fn get_call_report(state: web::Data<AppState>, report_id: web::Path<u32>) -> HttpResponse {
    let reports = state.call_reports.read().expect("STORE_LOCK_POISONED");

    match reports.get(report_id.into_inner()) {
        Ok(report) => HttpResponse::Ok().json(ApiResponse::ok("REPORT_FOUND", report)),
        Err(error) => respond_error(error),
    }
}

#[post("/reports")]
pub async fn create_call_report(
    state: web::Data<AppState>,
    payload: web::Json<CallReportRequest>,
) -> HttpResponse {
    let report = match CallReport::from_request(payload.into_inner()) {
        Ok(report) => report,
        Err(error) => return respond_error(error),
    };

    let mut reports = state.call_reports.write().expect("STORE_LOCK_POISONED");
    let report = reports.add(report);
    HttpResponse::Created().json(ApiResponse::ok("REPORT_CREATED", report))
}

#[put("/reports/{report_id}")]
pub async fn update_call_report(
    state: web::Data<AppState>,
    report_id: web::Path<u32>,
    payload: web::Json<CallReportRequest>,
) -> HttpResponse {
    let report_id = report_id.into_inner();
    let mut reports = state.call_reports.write().expect("STORE_LOCK_POISONED");

    let existing = match reports.get(report_id) {
        Ok(existing) => existing.clone(),
        Err(error) => return respond_error(error),
    };
    let mut report = match CallReport::from_request(payload.into_inner()) {
        Ok(report) => report,
        Err(error) => return respond_error(error),
    };
    report.id = existing.id;
    report.status = existing.status;
    report.created_at = existing.created_at;

    match reports.update(report) {
        Ok(report) => HttpResponse::Ok().json(ApiResponse::ok("REPORT_UPDATED", report)),
        Err(error) => respond_error(error),
    }
}

#[patch("/reports/{report_id}/status")]
pub async fn update_call_report_status(
    state: web::Data<AppState>,
    report_id: web::Path<u32>,
    payload: web::Json<CallReportStatusRequest>,
) -> HttpResponse {
    let report_id = report_id.into_inner();
    let mut reports = state.call_reports.write().expect("STORE_LOCK_POISONED");

    let mut report = match reports.get(report_id) {
        Ok(report) => report.clone(),
        Err(error) => return respond_error(error),
    };
    report.status = payload.status;

    match reports.update(report) {
        Ok(report) => HttpResponse::Ok().json(ApiResponse::ok("REPORT_STATUS_UPDATED", report)),
        Err(error) => respond_error(error),
    }
}

#[delete("/reports/{report_id}")]
pub async fn delete_call_report(
    state: web::Data<AppState>,
    report_id: web::Path<u32>,
) -> HttpResponse {
    let mut reports = state.call_reports.write().expect("STORE_LOCK_POISONED");

    match reports.delete(report_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("REPORT_DELETED")),
        Err(error) => respond_error(error),
    }
}
