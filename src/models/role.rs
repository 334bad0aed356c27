use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::StoreError, store::Record};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RolePermission {
    Owner,
    GetIncidents,
    CreateIncident,
    UpdateIncident,
    DeleteIncident,
    GetPermits,
    CreatePermit,
    UpdatePermit,
    GetEvents,
    CreateEvent,
    GetReports,
    ExportReports,
    GetLostItems,
    ManageLostItems,
    ViewCameras,
    ManageCameras,
    ManageUsers,
    ManageRoles,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Role {
    pub id: u32,
    pub name: String,
    pub permission: Vec<RolePermission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
#[derive(Debug, Serialize, Deserialize)]
pub struct RoleRequest {
    pub name: String,
    pub permission: Vec<RolePermission>,
}

impl Role {
    pub fn from_request(payload: RoleRequest, now: DateTime<Utc>) -> Result<Role, StoreError> {
        if payload.name.trim().is_empty() {
            return Err(StoreError::Validation("ROLE_MUST_HAVE_NAME"));
        }
        // Owner is only ever granted through the bootstrap path.
        if payload.permission.contains(&RolePermission::Owner) {
            return Err(StoreError::Validation("ROLE_MUST_HAVE_VALID_PERMISSION"));
        }

        Ok(Role {
            id: 0,
            name: payload.name,
            permission: payload.permission,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn owner(now: DateTime<Utc>) -> Role {
        Role {
            id: 0,
            name: "Owner".to_string(),
            permission: vec![RolePermission::Owner],
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Role {
    const STORE: &'static str = "roles-storage";
    const ENTITY: &'static str = "ROLE";

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
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
}
