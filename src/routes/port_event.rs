use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    models::port_event::{PortEvent, PortEventQuery, PortEventRequest},
    routes::{respond_error, ApiResponse},
    state::AppState,
};

#[get("/port-events")]
pub async fn get_port_events(
    state: web::Data<AppState>,
    query: web::Query<PortEventQuery>,
) -> HttpResponse {
    let query = query.into_inner();
    let events = state.port_events.read().expect("STORE_LOCK_POISONED");

    let matched: Vec<PortEvent> = if let Some(department) = query.department.as_deref() {
        events.by_department(department).into_iter().cloned().collect()
    } else if let (Some(from), Some(to)) = (query.from, query.to) {
        events.by_date_range(from, to).into_iter().cloned().collect()
    } else if let Some(kind) = query.kind.as_deref() {
        events.by_kind(kind).into_iter().cloned().collect()
    } else {
        events.all().to_vec()
    };
    HttpResponse::Ok().json(ApiResponse::ok("EVENTS_FOUND", matched))
}

#[get("/port-events/{event_id}")]
pub async fn get_port_event(state: web::Data<AppState>, event_id: web::Path<u32>) -> HttpResponse {
    let events = state.port_events.read().expect("STORE_LOCK_POISONED");

    match events.get(event_id.into_inner()) {
        Ok(event) => HttpResponse::Ok().json(ApiResponse::ok("EVENT_FOUND", event)),
        Err(error) => respond_error(error),
    }
}

#[post("/port-events")]
pub async fn create_port_event(
    state: web::Data<AppState>,
    payload: web::Json<PortEventRequest>,
) -> HttpResponse {
    let event = match PortEvent::from_request(payload.into_inner()) {
        Ok(event) => event,
        Err(error) => return respond_error(error),
    };

    let mut events = state.port_events.write().expect("STORE_LOCK_POISONED");
    let event = events.add(event);
    HttpResponse::Created().json(ApiResponse::ok("EVENT_CREATED", event))
}

#[put("/port-events/{event_id}")]
pub async fn update_port_event(
    state: web::Data<AppState>,
    event_id: web::Path<u32>,
    payload: web::Json<PortEventRequest>,
) -> HttpResponse {
    let event_id = event_id.into_inner();
    let mut events = state.port_events.write().expect("STORE_LOCK_POISONED");

    let existing = match events.get(event_id) {
        Ok(existing) => existing.clone(),
        Err(error) => return respond_error(error),
    };
    let mut event = match PortEvent::from_request(payload.into_inner()) {
        Ok(event) => event,
        Err(error) => return respond_error(error),
    };
    event.id = existing.id;
    event.created_at = existing.created_at;

    match events.update(event) {
        Ok(event) => HttpResponse::Ok().json(ApiResponse::ok("EVENT_UPDATED", event)),
        Err(error) => respond_error(error),
    }
}

#[delete("/port-events/{event_id}")]
pub async fn delete_port_event(
    state: web::Data<AppState>,
    event_id: web::Path<u32>,
) -> HttpResponse {
    let mut events = state.port_events.write().expect("STORE_LOCK_POISONED");

    match events.delete(event_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("EVENT_DELETED")),
        Err(error) => respond_error(error),
    }
}
