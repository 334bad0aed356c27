use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{delete, get, patch, post, put, web, HttpResponse};

use crate::{
    models::lost_item::{LostItem, LostItemClaimRequest, LostItemRequest},
    routes::{persist_upload, respond_error, ApiResponse},
    state::AppState,
};

#[derive(Debug, MultipartForm)]
pub struct LostItemImageForm {
    #[multipart(rename = "file")]
    pub file: TempFile,
}

#[get("/lost-and-found")]
pub async fn get_lost_items(state: web::Data<AppState>) -> HttpResponse {
    let items = state.lost_items.read().expect("STORE_LOCK_POISONED");
    HttpResponse::Ok().json(ApiResponse::ok("ITEMS_FOUND", items.all().to_vec()))
}

#[get("/lost-and-found/{item_id}")]
pub async fn get_lost_item(state: web::Data<AppState>, item_id: web::Path<u32>) -> HttpResponse {
    let items = state.lost_items.read().expect("STORE_LOCK_POISONED");

    match items.get(item_id.into_inner()) {
        Ok(item) => HttpResponse::Ok().json(ApiResponse::ok("ITEM_FOUND", item)),
        Err(error) => respond_error(error),
    }
}

#[post("/lost-and-found")]
pub async fn create_lost_item(
    state: web::Data<AppState>,
    payload: web::Json<LostItemRequest>,
) -> HttpResponse {
    let item = match LostItem::from_request(payload.into_inner()) {
        Ok(item) => item,
        Err(error) => return respond_error(error),
    };

    let mut items = state.lost_items.write().expect("STORE_LOCK_POISONED");
    let item = items.add(item);
    HttpResponse::Created().json(ApiResponse::ok("ITEM_CREATED", item))
}

#[put("/lost-and-found/{item_id}")]
pub async fn update_lost_item(
    state: web::Data<AppState>,
    item_id: web::Path<u32>,
    payload: web::Json<LostItemRequest>,
) -> HttpResponse {
    let item_id = item_id.into_inner();
    let mut items = state.lost_items.write().expect("STORE_LOCK_POISONED");

    let existing = match items.get(item_id) {
        Ok(existing) => existing.clone(),
        Err(error) => return respond_error(error),
    };
    let mut item = match LostItem::from_request(payload.into_inner()) {
        Ok(item) => item,
        Err(error) => return respond_error(error),
    };
    item.id = existing.id;
    item.status = existing.status;
    item.claimant = existing.claimant;
    item.image = existing.image;
    item.created_at = existing.created_at;

    match items.update(item) {
        Ok(item) => HttpResponse::Ok().json(ApiResponse::ok("ITEM_UPDATED", item)),
        Err(error) => respond_error(error),
    }
}

#[patch("/lost-and-found/{item_id}/claim")]
pub async fn claim_lost_item(
    state: web::Data<AppState>,
    item_id: web::Path<u32>,
    payload: web::Json<LostItemClaimRequest>,
) -> HttpResponse {
    let item_id = item_id.into_inner();
    let mut items = state.lost_items.write().expect("STORE_LOCK_POISONED");

    let mut item = match items.get(item_id) {
        Ok(item) => item.clone(),
        Err(error) => return respond_error(error),
    };
    if let Err(error) = item.claim(payload.into_inner().claimant) {
        return respond_error(error);
    }

    match items.update(item) {
        Ok(item) => HttpResponse::Ok().json(ApiResponse::ok("ITEM_CLAIMED", item)),
        Err(error) => respond_error(error),
    }
}

#[patch("/lost-and-found/{item_id}/return")]
pub async fn return_lost_item(state: web::Data<AppState>, item_id: web::Path<u32>) -> HttpResponse {
    let item_id = item_id.into_inner();
    let mut items = state.lost_items.write().expect("STORE_LOCK_POISONED");

    let mut item = match items.get(item_id) {
        Ok(item) => item.clone(),
        Err(error) => return respond_error(error),
    };
    if let Err(error) = item.mark_returned() {
        return respond_error(error);
    }

    match items.update(item) {
        Ok(item) => HttpResponse::Ok().json(ApiResponse::ok("ITEM_RETURNED", item)),
        Err(error) => respond_error(error),
    }
}

#[put("/lost-and-found/{item_id}/image")]
pub async fn upload_lost_item_image(
    state: web::Data<AppState>,
    item_id: web::Path<u32>,
    form: MultipartForm<LostItemImageForm>,
) -> HttpResponse {
    let item_id = item_id.into_inner();
    let mut items = state.lost_items.write().expect("STORE_LOCK_POISONED");

    let mut item = match items.get(item_id) {
        Ok(item) => item.clone(),
        Err(error) => return respond_error(error),
    };

    let image = match persist_upload("lost-items", &item_id.to_string(), &form.file) {
        Ok(image) => image,
        Err(error) => return respond_error(error),
    };
    item.image = Some(image);

    match items.update(item) {
        Ok(item) => HttpResponse::Ok().json(ApiResponse::ok("IMAGE_STORED", item)),
        Err(error) => respond_error(error),
    }
}

#[delete("/lost-and-found/{item_id}")]
pub async fn delete_lost_item(state: web::Data<AppState>, item_id: web::Path<u32>) -> HttpResponse {
    let mut items = state.lost_items.write().expect("STORE_LOCK_POISONED");

    match items.delete(item_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("ITEM_DELETED")),
        Err(error) => respond_error(error),
    }
}
