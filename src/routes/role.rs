use actix_web::{delete, get, post, web, HttpResponse};
use chrono::Utc;

use crate::{
    models::role::{Role, RoleRequest},
    routes::{respond_error, ApiResponse},
    state::AppState,
};

#[get("/roles")]
pub async fn get_roles(state: web::Data<AppState>) -> HttpResponse {
    let roles = state.roles.read().expect("STORE_LOCK_POISONED");
    HttpResponse::Ok().json(ApiResponse::ok("ROLES_FOUND", roles.all().to_vec()))
}

#[get("/roles/{role_id}")]
pub async fn get_role(state: web::Data<AppState>, role_id: web::Path<u32>) -> HttpResponse {
    let roles = state.roles.read().expect("STORE_LOCK_POISONED");

    match roles.get(role_id.into_inner()) {
        Ok(role) => HttpResponse::Ok().json(ApiResponse::ok("ROLE_FOUND", role)),
        Err(error) => respond_error(error),
    }
}

#[post("/roles")]
pub async fn create_role(
    state: web::Data<AppState>,
    payload: web::Json<RoleRequest>,
) -> HttpResponse {
    let role = match Role::from_request(payload.into_inner(), Utc::now()) {
        Ok(role) => role,
        Err(error) => return respond_error(error),
    };

    let mut roles = state.roles.write().expect("STORE_LOCK_POISONED");
    let role = roles.add(role);
    HttpResponse::Created().json(ApiResponse::ok("ROLE_CREATED", role))
}

/// Deleting a role strips it from every user; a user left with no roles is
/// deleted with it.
#[delete("/roles/{role_id}")]
pub async fn delete_role(state: web::Data<AppState>, role_id: web::Path<u32>) -> HttpResponse {
    let role_id = role_id.into_inner();
    let mut users = state.users.write().expect("STORE_LOCK_POISONED");
    let mut roles = state.roles.write().expect("STORE_LOCK_POISONED");

    if let Err(error) = roles.get(role_id).map(|_| ()) {
        return respond_error(error);
    }

    let affected: Vec<_> = users
        .all()
        .iter()
        .filter(|user| user.role_id.contains(&role_id))
        .cloned()
        .collect();
    for mut user in affected {
        user.role_id.retain(|id| *id != role_id);
        let result = if user.role_id.is_empty() {
            users.delete(user.id)
        } else {
            users.update(user).map(|_| ())
        };
        if let Err(error) = result {
            return respond_error(error);
        }
    }

    match roles.delete(role_id) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("ROLE_DELETED")),
        Err(error) => respond_error(error),
    }
}
