use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::StoreError, store::Record};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CameraStatus {
    Online,
    Offline,
    Maintenance,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Camera {
    pub id: u32,
    pub name: String,
    pub zone: String,
    pub feed_url: String,
    pub status: CameraStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize, Serialize)]
pub struct CameraRequest {
    pub name: String,
    pub zone: String,
    pub feed_url: String,
}
#[derive(Debug, Deserialize)]
pub struct CameraStatusRequest {
    pub status: CameraStatus,
}

impl CameraStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CameraStatus::Online => "online",
            CameraStatus::Offline => "offline",
            CameraStatus::Maintenance => "maintenance",
        }
    }
}

impl Camera {
    pub fn from_request(payload: CameraRequest, now: DateTime<Utc>) -> Result<Camera, StoreError> {
        if payload.name.trim().is_empty() {
            return Err(StoreError::Validation("CAMERA_MUST_HAVE_NAME"));
        }
        if payload.zone.trim().is_empty() {
            return Err(StoreError::Validation("CAMERA_MUST_HAVE_ZONE"));
        }

        Ok(Camera {
            id: 0,
            name: payload.name,
            zone: payload.zone,
            feed_url: payload.feed_url,
            status: CameraStatus::Online,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Record for Camera {
    const STORE: &'static str = "cameras-storage";
    const ENTITY: &'static str = "CAMERA";

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
    fn status_label(&self) -> Option<&'static str> {
        Some(self.status.label())
    }
    fn location(&self) -> Option<&str> {
        Some(&self.zone)
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.zone]
    }
}
