use chrono::{DateTime, Utc};
use pwhash::bcrypt;
use serde::{Deserialize, Serialize};

use crate::{error::StoreError, store::Record};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: Vec<u32>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize, Serialize)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: Option<Vec<u32>>,
    pub department: Option<String>,
}
/// What leaves the server; the password hash never does.
#[derive(Debug, Deserialize, Serialize)]
pub struct UserResponse {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role_id: Vec<u32>,
    pub department: Option<String>,
}

impl User {
    pub fn new(
        name: String,
        email: String,
        password: String,
        role_id: Vec<u32>,
        department: Option<String>,
        now: DateTime<Utc>,
    ) -> User {
        User {
            id: 0,
            name,
            email,
            password,
            role_id,
            department,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn hash_password(&mut self) -> Result<(), StoreError> {
        self.password =
            bcrypt::hash(&self.password).map_err(|_| StoreError::Internal("HASHING_FAILED"))?;
        Ok(())
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> UserResponse {
        UserResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role_id: user.role_id.clone(),
            department: user.department.clone(),
        }
    }
}

impl Record for User {
    const STORE: &'static str = "users-storage";
    const ENTITY: &'static str = "USER";

    fn id(&self) -> u32 {
        self.id
    }
    fn assign_id(&mut self, id: u32) {
        self.id = id;
    }
    fn stamp(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
        self.updated_at = at;
    }
    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email]
    }
}
