use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use chrono::Utc;

use crate::{
    models::camera::{Camera, CameraRequest, CameraStatusRequest},
    routes::{respond_error, ApiResponse},
    state::AppState,
};

#[get("/cameras")]
pub async fn get_cameras(state: web::Data<AppState>) -> HttpResponse {
    let cameras = state.cameras.read().expect("STORE_LOCK_POISONED");
    HttpResponse::Ok().json(ApiResponse::ok("CAMERAS_FOUND", cameras.all().to_vec()))
}

#[get("/cameras/{camera_id}")]
pub async fn get_camera(state: web::Data<AppState>, camera_id: web::Path<u32>) -> HttpResponse {
    let cameras = state.cameras.read().expect("STORE_LOCK_POISONED");

    match cameras.get(camera_id.into_inner()) {
        Ok(camera) => HttpResponse::Ok().json(ApiResponse::ok("CAMERA_FOUND", camera)),
        Err(error) => respond_error(error),
    }
}

#[post("/cameras")]
pub async fn create_camera(
    state: web::Data<AppState>,
    payload: web::Json<CameraRequest>,
) -> HttpResponse {
    let camera = match Camera::from_request(payload.into_inner(), Utc::now()) {
        Ok(camera) => camera,
        Err(error) => return respond_error(error),
    };

    let mut cameras = state.cameras.write().expect("STORE_LOCK_POISONED");
    let camera = cameras.add(camera);
    HttpResponse::Created().json(ApiResponse::ok("CAMERA_CREATED", camera))
}

#[put("/cameras/{camera_id}")]
pub async fn update_camera(
    state: web::Data<AppState>,
    camera_id: web::Path<u32>,
    payload: web::Json<CameraRequest>,
) -> HttpResponse {
    let camera_id = camera_id.into_inner();
    let mut cameras = state.cameras.write().expect("STORE_LOCK_POISONED");

    let existing = match cameras.get(camera_id) {
        Ok(existing) => existing.clone(),
        Err(error) => return respond_error(error),
    };
    let mut camera = match Camera::from_request(payload.into_inner(), Utc::now()) {
        Ok(camera) => camera,
        Err(error) => return respond_error(error),
    };
    camera.id = existing.id;
    camera.status = existing.status;
    camera.created_at = existing.created_at;

    match cameras.update(camera) {
        Ok(camera) => HttpResponse::Ok().json(ApiResponse::ok("CAMERA_UPDATED", camera)),
        Err(error) => respond_error(error),
    }
}

#[patch("/cameras/{camera_id}/status")]
pub async fn update_camera_status(
    state: web::Data<AppState>,
    camera_id: web::Path<u32>,
    payload: web::Json<CameraStatusRequest>,
) -> HttpResponse {
    let camera_id = camera_id.into_inner();
    let mut cameras = state.cameras.write().expect("STORE_LOCK_POISONED");

    let mut camera = match cameras.get(camera_id) {
        Ok(camera) => camera.clone(),
        Err(error) => return respond_error(error),
    };
    camera.status = payload.status;

    match cameras.update(camera) {
        Ok(camera) => HttpResponse::Ok().json(ApiResponse::ok("CAMERA_STATUS_UPDATED", camera)),
        Err(error) => respond_error(error),
    }
}

#[delete("/cameras/{camera_id}")]
pub async fn delete_camera(state: web::Data<AppState>, camera_id: web::Path<u32>) -> HttpResponse {
    let mut cameras = state.cameras.write().expect("STORE_LOCK_POISONED");

    match cameras.delete(camera_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("CAMERA_DELETED")),
        Err(error) => respond_error(error),
    }
}
