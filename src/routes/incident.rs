use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use chrono::Utc;

use crate::{
    export,
    filter::{self, FilterCriteria},
    models::incident::{Incident, IncidentCommentRequest, IncidentRequest, IncidentStatusRequest},
    routes::{persist_upload, respond_error, ApiResponse},
    state::AppState,
};

#[derive(Debug, MultipartForm)]
pub struct IncidentAttachmentForm {
    #[multipart(rename = "file")]
    pub file: TempFile,
}

#[get("/incidents")]
pub async fn get_incidents(
    state: web::Data<AppState>,
    query: web::Query<FilterCriteria>,
) -> HttpResponse {
    let criteria = query.into_inner();
    let incidents = state.incidents.read().expect("STORE_LOCK_POISONED");

    let matched: Vec<Incident> = filter::apply(incidents.all(), &criteria)
        .into_iter()
        .cloned()
        .collect();
    HttpResponse::Ok().json(ApiResponse::ok("INCIDENTS_FOUND", matched))
}

#[get("/incidents/export")]
pub async fn export_incidents(
    state: web::Data<AppState>,
    query: web::Query<FilterCriteria>,
) -> HttpResponse {
    let criteria = query.into_inner();
    let incidents = state.incidents.read().expect("STORE_LOCK_POISONED");

    let matched = filter::apply(incidents.all(), &criteria);
    match export::to_csv(&matched) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(bytes),
        Err(error) => respond_error(error),
    }
}

#[get("/incidents/{incident_id}")]
pub async fn get_incident(state: web::Data<AppState>, incident_id: web::Path<u32>) -> HttpResponse {
    let incidents = state.incidents.read().expect("STORE_LOCK_POISONED");

    match incidents.get(incident_id.into_inner()) {
        Ok(incident) => HttpResponse::Ok().json(ApiResponse::ok("INCIDENT_FOUND", incident)),
        Err(error) => respond_error(error),
    }
}

#[post("/incidents")]
pub async fn create_incident(
    state: web::Data<AppState>,
    payload: web::Json<IncidentRequest>,
) -> HttpResponse {
    let incident = match Incident::from_request(payload.into_inner()) {
        Ok(incident) => incident,
        Err(error) => return respond_error(error),
    };

    let mut incidents = state.incidents.write().expect("STORE_LOCK_POISONED");
    let incident = incidents.add(incident);
    HttpResponse::Created().json(ApiResponse::ok("INCIDENT_CREATED", incident))
}

#[put("/incidents/{incident_id}")]
pub async fn update_incident(
    state: web::Data<AppState>,
    incident_id: web::Path<u32>,
    payload: web::Json<IncidentRequest>,
) -> HttpResponse {
    let incident_id = incident_id.into_inner();
    let mut incidents = state.incidents.write().expect("STORE_LOCK_POISONED");

    let existing = match incidents.get(incident_id) {
        Ok(existing) => existing.clone(),
        Err(error) => return respond_error(error),
    };
    let mut incident = match Incident::from_request(payload.into_inner()) {
        Ok(incident) => incident,
        Err(error) => return respond_error(error),
    };

    // Descriptive fields come from the payload; identity, status history and
    // owned sub-records stay with the stored record.
    incident.id = existing.id;
    incident.status = existing.status;
    incident.comments = existing.comments;
    incident.attachments = existing.attachments;
    incident.response_at = existing.response_at;
    incident.resolved_at = existing.resolved_at;
    incident.created_at = existing.created_at;

    match incidents.update(incident) {
        Ok(incident) => HttpResponse::Ok().json(ApiResponse::ok("INCIDENT_UPDATED", incident)),
        Err(error) => respond_error(error),
    }
}

#[patch("/incidents/{incident_id}/status")]
pub async fn update_incident_status(
    state: web::Data<AppState>,
    incident_id: web::Path<u32>,
    payload: web::Json<IncidentStatusRequest>,
) -> HttpResponse {
    let incident_id = incident_id.into_inner();
    let mut incidents = state.incidents.write().expect("STORE_LOCK_POISONED");

    let mut incident = match incidents.get(incident_id) {
        Ok(incident) => incident.clone(),
        Err(error) => return respond_error(error),
    };
    incident.set_status(payload.status, Utc::now());

    match incidents.update(incident) {
        Ok(incident) => HttpResponse::Ok().json(ApiResponse::ok("INCIDENT_STATUS_UPDATED", incident)),
        Err(error) => respond_error(error),
    }
}

#[post("/incidents/{incident_id}/comments")]
pub async fn add_incident_comment(
    state: web::Data<AppState>,
    incident_id: web::Path<u32>,
    payload: web::Json<IncidentCommentRequest>,
) -> HttpResponse {
    let incident_id = incident_id.into_inner();
    let payload = payload.into_inner();
    let mut incidents = state.incidents.write().expect("STORE_LOCK_POISONED");

    let mut incident = match incidents.get(incident_id) {
        Ok(incident) => incident.clone(),
        Err(error) => return respond_error(error),
    };
    if let Err(error) = incident.add_comment(payload.author, payload.text, Utc::now()) {
        return respond_error(error);
    }

    match incidents.update(incident) {
        Ok(incident) => HttpResponse::Created().json(ApiResponse::ok("COMMENT_ADDED", incident)),
        Err(error) => respond_error(error),
    }
}

#[put("/incidents/{incident_id}/attachments")]
pub async fn upload_incident_attachment(
    state: web::Data<AppState>,
    incident_id: web::Path<u32>,
    form: MultipartForm<IncidentAttachmentForm>,
) -> HttpResponse {
    let incident_id = incident_id.into_inner();
    let mut incidents = state.incidents.write().expect("STORE_LOCK_POISONED");

    let mut incident = match incidents.get(incident_id) {
        Ok(incident) => incident.clone(),
        Err(error) => return respond_error(error),
    };

    let name = format!("{}-{}", incident_id, incident.attachments.len() + 1);
    let attachment = match persist_upload("incidents", &name, &form.file) {
        Ok(attachment) => attachment,
        Err(error) => return respond_error(error),
    };
    incident.attachments.push(attachment);

    match incidents.update(incident) {
        Ok(incident) => HttpResponse::Ok().json(ApiResponse::ok("ATTACHMENT_STORED", incident)),
        Err(error) => respond_error(error),
    }
}

#[delete("/incidents/{incident_id}")]
pub async fn delete_incident(
    state: web::Data<AppState>,
    incident_id: web::Path<u32>,
) -> HttpResponse {
    let mut incidents = state.incidents.write().expect("STORE_LOCK_POISONED");

    match incidents.delete(incident_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("INCIDENT_DELETED")),
        Err(error) => respond_error(error),
    }
}
