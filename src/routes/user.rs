use actix_web::{delete, get, post, put, web, HttpResponse};
use chrono::Utc;
use regex::Regex;

use crate::{
    models::{
        role::Role,
        user::{User, UserRequest, UserResponse},
    },
    routes::{respond_error, ApiResponse},
    state::AppState,
    store::Store,
};

fn email_regex() -> Regex {
    Regex::new(
        r"^([a-z0-9_+]([a-z0-9_+.]*[a-z0-9_+])?)@([a-z0-9]+([\-\.]{1}[a-z0-9]+)*\.[a-z]{2,6})",
    )
    .expect("EMAIL_REGEX_INVALID")
}

fn resolve_roles(requested: Vec<u32>, roles: &Store<Role>) -> Vec<u32> {
    let mut resolved: Vec<u32> = Vec::new();
    for id in requested {
        if roles.get(id).is_ok() {
            resolved.push(id);
        }
    }
    resolved
}

#[get("/users")]
pub async fn get_users(state: web::Data<AppState>) -> HttpResponse {
    let users = state.users.read().expect("STORE_LOCK_POISONED");

    let users: Vec<UserResponse> = users.all().iter().map(UserResponse::from).collect();
    HttpResponse::Ok().json(ApiResponse::ok("USERS_FOUND", users))
}

#[get("/users/{user_id}")]
pub async fn get_user(state: web::Data<AppState>, user_id: web::Path<u32>) -> HttpResponse {
    let users = state.users.read().expect("STORE_LOCK_POISONED");

    match users.get(user_id.into_inner()) {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::ok("USER_FOUND", UserResponse::from(user))),
        Err(error) => respond_error(error),
    }
}

#[post("/users")]
pub async fn create_user(
    state: web::Data<AppState>,
    payload: web::Json<UserRequest>,
) -> HttpResponse {
    let payload = payload.into_inner();

    if payload.password.len() < 8 {
        return HttpResponse::BadRequest()
            .json(ApiResponse::failure("USER_MUST_HAVE_VALID_PASSWORD".to_string()));
    }
    if !email_regex().is_match(&payload.email) {
        return HttpResponse::BadRequest()
            .json(ApiResponse::failure("USER_MUST_HAVE_VALID_EMAIL".to_string()));
    }

    let mut users = state.users.write().expect("STORE_LOCK_POISONED");
    let mut roles = state.roles.write().expect("STORE_LOCK_POISONED");

    if users.all().iter().any(|user| user.email == payload.email) {
        return HttpResponse::BadRequest().json(ApiResponse::failure("USER_ALREADY_EXIST".to_string()));
    }

    // The very first user owns the system; everyone after that needs roles
    // that already exist.
    let role_id: Vec<u32> = if users.is_empty() {
        let owner = roles.add(Role::owner(Utc::now()));
        vec![owner.id]
    } else {
        let requested = match payload.role_id {
            Some(requested) if !requested.is_empty() => requested,
            _ => {
                return HttpResponse::BadRequest()
                    .json(ApiResponse::failure("USER_MUST_HAVE_ROLES".to_string()))
            }
        };
        let resolved = resolve_roles(requested, &roles);
        if resolved.is_empty() {
            return HttpResponse::BadRequest()
                .json(ApiResponse::failure("USER_MUST_HAVE_ROLES".to_string()));
        }
        resolved
    };

    let mut user = User::new(
        payload.name,
        payload.email,
        payload.password,
        role_id,
        payload.department,
        Utc::now(),
    );
    if let Err(error) = user.hash_password() {
        return respond_error(error);
    }

    let user = users.add(user);
    HttpResponse::Created().json(ApiResponse::ok("USER_CREATED", UserResponse::from(&user)))
}

#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    user_id: web::Path<u32>,
    payload: web::Json<UserRequest>,
) -> HttpResponse {
    let user_id = user_id.into_inner();
    let payload = payload.into_inner();

    if !email_regex().is_match(&payload.email) {
        return HttpResponse::BadRequest()
            .json(ApiResponse::failure("USER_MUST_HAVE_VALID_EMAIL".to_string()));
    }

    let mut users = state.users.write().expect("STORE_LOCK_POISONED");
    let roles = state.roles.read().expect("STORE_LOCK_POISONED");

    let existing = match users.get(user_id) {
        Ok(existing) => existing.clone(),
        Err(error) => return respond_error(error),
    };
    if users
        .all()
        .iter()
        .any(|user| user.id != user_id && user.email == payload.email)
    {
        return HttpResponse::BadRequest().json(ApiResponse::failure("USER_ALREADY_EXIST".to_string()));
    }

    let role_id = match payload.role_id {
        Some(requested) if !requested.is_empty() => {
            let resolved = resolve_roles(requested, &roles);
            if resolved.is_empty() {
                return HttpResponse::BadRequest()
                    .json(ApiResponse::failure("USER_MUST_HAVE_ROLES".to_string()));
            }
            resolved
        }
        _ => existing.role_id.clone(),
    };

    let mut user = User {
        id: user_id,
        name: payload.name,
        email: payload.email,
        password: existing.password.clone(),
        role_id,
        department: payload.department,
        created_at: existing.created_at,
        updated_at: existing.updated_at,
    };

    // "*" keeps the stored hash; anything else is a password change.
    if payload.password != *"*" {
        if payload.password.len() < 8 {
            return HttpResponse::BadRequest()
                .json(ApiResponse::failure("USER_MUST_HAVE_VALID_PASSWORD".to_string()));
        }
        user.password = payload.password;
        if let Err(error) = user.hash_password() {
            return respond_error(error);
        }
    }

    match users.update(user) {
        Ok(user) => HttpResponse::Ok().json(ApiResponse::ok("USER_UPDATED", UserResponse::from(&user))),
        Err(error) => respond_error(error),
    }
}

#[delete("/users/{user_id}")]
pub async fn delete_user(state: web::Data<AppState>, user_id: web::Path<u32>) -> HttpResponse {
    let mut users = state.users.write().expect("STORE_LOCK_POISONED");

    match users.delete(user_id.into_inner()) {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("USER_DELETED")),
        Err(error) => respond_error(error),
    }
}
