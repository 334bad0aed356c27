use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use chrono::Utc;

use crate::{
    export,
    filter::{self, FilterCriteria},
    models::work_permit::{self, PermitHoldRequest, WorkPermit, WorkPermitRequest},
    routes::{respond_error, ApiResponse},
    state::AppState,
};

#[get("/work-permits")]
pub async fn get_work_permits(
    state: web::Data<AppState>,
    query: web::Query<FilterCriteria>,
) -> HttpResponse {
    let criteria = query.into_inner();
    let permits = state.work_permits.read().expect("STORE_LOCK_POISONED");

    let matched: Vec<WorkPermit> = filter::apply(permits.all(), &criteria)
        .into_iter()
        .cloned()
        .collect();
    HttpResponse::Ok().json(ApiResponse::ok("PERMITS_FOUND", matched))
}

#[get("/work-permits/export")]
pub async fn export_work_permits(
    state: web::Data<AppState>,
    query: web::Query<FilterCriteria>,
) -> HttpResponse {
    let criteria = query.into_inner();
    let permits = state.work_permits.read().expect("STORE_LOCK_POISONED");

    let matched = filter::apply(permits.all(), &criteria);
    match export::to_csv(&matched) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(bytes),
        Err(error) => respond_error(error),
    }
}

#[post("/work-permits/refresh")]
pub async fn refresh_work_permits(state: web::Data<AppState>) -> HttpResponse {
    let mut permits = state.work_permits.write().expect("STORE_LOCK_POISONED");

    let changed = work_permit::refresh_statuses(&mut permits, Utc::now());
    HttpResponse::Ok().json(ApiResponse::ok("PERMIT_STATUS_REFRESHED", changed))
}

#[get("/work-permits/{permit_id}")]
pub async fn get_work_permit(state: web::Data<AppState>, permit_id: web::Path<u32>) -> HttpResponse {
    let permits = state.work_permits.read().expect("STORE_LOCK_POISONED");

    match permits.get(permit_id.into_inner()) {
        Ok(permit) => HttpResponse::Ok().json(ApiResponse::ok("PERMIT_FOUND", permit)),
        Err(error) => respond_error(error),
    }
}

#[post("/work-permits")]
pub async fn create_work_permit(
    state: web::Data<AppState>,
    payload: web::Json<WorkPermitRequest>,
) -> HttpResponse {
    let permit = match WorkPermit::from_request(payload.into_inner(), Utc::now()) {
        Ok(permit) => permit,
        Err(error) => return respond_error(error),
    };

    let mut permits = state.work_permits.write().expect("STORE_LOCK_POISONED");
    let permit = permits.add(permit);
    HttpResponse::Created().json(ApiResponse::ok("PERMIT_CREATED", permit))
}

#[put("/work-permits/{permit_id}")]
pub async fn update_work_permit(
    state: web::Data<AppState>,
    permit_id: web::Path<u32>,
    payload: web::Json<WorkPermitRequest>,
) -> HttpResponse {
    let permit_id = permit_id.into_inner();
    let now = Utc::now();
    let mut permits = state.work_permits.write().expect("STORE_LOCK_POISONED");

    let existing = match permits.get(permit_id) {
        Ok(existing) => existing.clone(),
        Err(error) => return respond_error(error),
    };
    let mut permit = match WorkPermit::from_request(payload.into_inner(), now) {
        Ok(permit) => permit,
        Err(error) => return respond_error(error),
    };

    permit.id = existing.id;
    permit.on_hold = existing.on_hold;
    permit.hold_reason = existing.hold_reason;
    permit.created_at = existing.created_at;
    permit.refresh_status(now);

    match permits.update(permit) {
        Ok(permit) => HttpResponse::Ok().json(ApiResponse::ok("PERMIT_UPDATED", permit)),
        Err(error) => respond_error(error),
    }
}

#[patch("/work-permits/{permit_id}/hold")]
pub async fn hold_work_permit(
    state: web::Data<AppState>,
    permit_id: web::Path<u32>,
    payload: web::Json<PermitHoldRequest>,
) -> HttpResponse {
    let permit_id = permit_id.into_inner();
    let mut permits = state.work_permits.write().expect("STORE_LOCK_POISONED");

    let mut permit = match permits.get(permit_id) {
        Ok(permit) => permit.clone(),
        Err(error) => return respond_error(error),
    };
    permit.hold(payload.into_inner().reason, Utc::now());

    match permits.update(permit) {
        Ok(permit) => HttpResponse::Ok().json(ApiResponse::ok("PERMIT_HELD", permit)),
        Err(error) => respond_error(error),
    }
}

#[patch("/work-permits/{permit_id}/release")]
pub async fn release_work_permit(
    state: web::Data<AppState>,
    permit_id: web::Path<u32>,
) -> HttpResponse {
    let permit_id = permit_id.into_inner();
    let mut permits = state.work_permits.write().expect("STORE_LOCK_POISONED");

    let mut permit = match permits.get(permit_id) {
        Ok(permit) => permit.clone(),
        Err(error) => return respond_error(error),
    };
    permit.release(Utc::now());

    match permits.update(permit) {
        Ok(permit) => HttpResponse::Ok().json(ApiResponse::ok("PERMIT_RELEASED", permit)),
        Err(error) => respond_error(error),
    }
}

#[delete("/work-permits/{permit_id}")]
pub async fn delete_work_permit(
    state: web::Data<AppState>,
    permit_id: web::Path<u32>,
) -> HttpResponse {
    let mut permits = state.work_permits.write().expect("STORE_LOCK_POISONED");

    match permits.delete(permit_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("PERMIT_DELETED")),
        Err(error) => respond_error(error),
    }
}
