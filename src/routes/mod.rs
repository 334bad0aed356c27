use std::fs::{create_dir_all, rename};

use actix_multipart::form::tempfile::TempFile;
use actix_web::{get, web, HttpResponse};
use mime_guess::{from_path, get_mime_extensions_str};
use serde::{Deserialize, Serialize};

use crate::{error::StoreError, models::Attachment};

pub mod camera;
pub mod incident;
pub mod lost_item;
pub mod port_event;
pub mod report;
pub mod role;
pub mod user;
pub mod work_permit;

/// Envelope on every response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &str, data: T) -> ApiResponse<T> {
        ApiResponse {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &str) -> ApiResponse<()> {
        ApiResponse {
            success: true,
            message: message.to_string(),
            data: None,
        }
    }
    pub fn failure(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            message,
            data: None,
        }
    }
}

pub fn respond_error(error: StoreError) -> HttpResponse {
    let body = ApiResponse::failure(error.to_string());
    match error {
        StoreError::NotFound { .. } => HttpResponse::NotFound().json(body),
        StoreError::Validation(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

pub fn files_dir() -> String {
    std::env::var("MARSA_FILES_DIR").unwrap_or_else(|_| String::from("./files"))
}

/// Moves an uploaded temp file under `<files_dir>/<subdir>/`, named after the
/// owning record; the extension comes from the declared mime type.
pub fn persist_upload(subdir: &str, name: &str, file: &TempFile) -> Result<Attachment, StoreError> {
    let mime = file
        .content_type
        .as_ref()
        .ok_or(StoreError::Validation("FILE_MUST_HAVE_MIME"))?;
    let extensions = get_mime_extensions_str(mime.essence_str())
        .ok_or(StoreError::Validation("FILE_INVALID_MIME"))?;
    let extension = extensions
        .first()
        .ok_or(StoreError::Validation("FILE_INVALID_MIME"))?;

    let dir = format!("{}/{subdir}", files_dir());
    create_dir_all(&dir)?;

    let stored = format!("{name}.{extension}");
    rename(file.file.path(), format!("{dir}/{stored}"))?;

    Ok(Attachment {
        name: stored,
        extension: (*extension).to_string(),
    })
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    IncidentAttachment,
    LostItemImage,
}

#[derive(Deserialize)]
pub struct FileQueryParams {
    pub kind: FileKind,
    pub name: String,
}

#[get("/files")]
pub async fn get_file(query: web::Query<FileQueryParams>) -> HttpResponse {
    if query.name.contains("..") || query.name.contains('/') {
        return HttpResponse::BadRequest().json(ApiResponse::failure("INVALID_NAME".to_string()));
    }

    let root = files_dir();
    let path = match query.kind {
        FileKind::IncidentAttachment => format!("{root}/incidents/{}", query.name),
        FileKind::LostItemImage => format!("{root}/lost-items/{}", query.name),
    };
    if let Ok(file) = std::fs::read(path.clone()) {
        let mime = from_path(path).first_or_octet_stream();
        HttpResponse::Ok().content_type(mime).body(file)
    } else {
        HttpResponse::NotFound().json(ApiResponse::failure("CONTENT_NOT_FOUND".to_string()))
    }
}

/// Registration shared by `main` and the integration tests. Literal paths
/// (`/export`, `/refresh`) come before their `{id}` siblings.
pub fn configure(config: &mut web::ServiceConfig) {
    config
        .service(incident::export_incidents)
        .service(incident::get_incidents)
        .service(incident::create_incident)
        .service(incident::update_incident_status)
        .service(incident::add_incident_comment)
        .service(incident::upload_incident_attachment)
        .service(incident::get_incident)
        .service(incident::update_incident)
        .service(incident::delete_incident)
        .service(work_permit::export_work_permits)
        .service(work_permit::refresh_work_permits)
        .service(work_permit::get_work_permits)
        .service(work_permit::create_work_permit)
        .service(work_permit::hold_work_permit)
        .service(work_permit::release_work_permit)
        .service(work_permit::get_work_permit)
        .service(work_permit::update_work_permit)
        .service(work_permit::delete_work_permit)
        .service(port_event::get_port_events)
        .service(port_event::create_port_event)
        .service(port_event::get_port_event)
        .service(port_event::update_port_event)
        .service(port_event::delete_port_event)
        .service(report::export_call_reports)
        .service(report::get_call_reports)
        .service(report::create_call_report)
        .service(report::update_call_report_status)
        .service(report::get_call_report)
        .service(report::update_call_report)
        .service(report::delete_call_report)
        .service(lost_item::get_lost_items)
        .service(lost_item::create_lost_item)
        .service(lost_item::claim_lost_item)
        .service(lost_item::return_lost_item)
        .service(lost_item::upload_lost_item_image)
        .service(lost_item::get_lost_item)
        .service(lost_item::update_lost_item)
        .service(lost_item::delete_lost_item)
        .service(camera::get_cameras)
        .service(camera::create_camera)
        .service(camera::update_camera_status)
        .service(camera::get_camera)
        .service(camera::update_camera)
        .service(camera::delete_camera)
        .service(user::get_users)
        .service(user::create_user)
        .service(user::get_user)
        .service(user::update_user)
        .service(user::delete_user)
        .service(role::get_roles)
        .service(role::create_role)
        .service(role::get_role)
        .service(role::delete_role)
        .service(get_file);
}
