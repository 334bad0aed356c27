use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::StoreError, export::Exportable, store::Record};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallCategory {
    Complaint,
    Inquiry,
    Emergency,
    Tip,
}
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallReportStatus {
    New,
    InReview,
    Closed,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CallReport {
    pub id: u32,
    pub caller: String,
    pub phone: String,
    pub category: CallCategory,
    pub description: String,
    pub unit: String,
    pub location: String,
    pub status: CallReportStatus,
    pub received_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize, Serialize)]
pub struct CallReportRequest {
    pub caller: String,
    pub phone: String,
    pub category: CallCategory,
    pub description: String,
    pub unit: String,
    pub location: String,
    pub received_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize)]
pub struct CallReportStatusRequest {
    pub status: CallReportStatus,
}

impl CallCategory {
    pub fn label(&self) -> &'static str {
        match self {
            CallCategory::Complaint => "complaint",
            CallCategory::Inquiry => "inquiry",
            CallCategory::Emergency => "emergency",
            CallCategory::Tip => "tip",
        }
    }
}
impl CallReportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CallReportStatus::New => "new",
            CallReportStatus::InReview => "in_review",
            CallReportStatus::Closed => "closed",
        }
    }
}

impl CallReport {
    pub fn from_request(payload: CallReportRequest) -> Result<CallReport, StoreError> {
        if payload.caller.trim().is_empty() {
            return Err(StoreError::Validation("REPORT_MUST_HAVE_CALLER"));
        }
        if payload.phone.trim().is_empty() {
            return Err(StoreError::Validation("REPORT_MUST_HAVE_PHONE"));
        }
        if payload.description.trim().is_empty() {
            return Err(StoreError::Validation("REPORT_MUST_HAVE_DESCRIPTION"));
        }

        Ok(CallReport {
            id: 0,
            caller: payload.caller,
            phone: payload.phone,
            category: payload.category,
            description: payload.description,
            unit: payload.unit,
            location: payload.location,
            status: CallReportStatus::New,
            received_at: payload.received_at,
            created_at: payload.received_at,
            updated_at: payload.received_at,
        })
    }

    pub fn display_id(&self) -> String {
        format!("CR-{:04}", self.id)
    }
}

impl Record for CallReport {
    const STORE: &'static str = "call-reports-storage";
    const ENTITY: &'static str = "REPORT";

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
        self.received_at
    }
    fn kind_label(&self) -> Option<&'static str> {
        Some(self.category.label())
    }
    fn status_label(&self) -> Option<&'static str> {
        Some(self.status.label())
    }
    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn unit(&self) -> Option<&str> {
        Some(&self.unit)
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.caller,
            &self.phone,
            &self.description,
            &self.location,
        ]
    }
}

impl Exportable for CallReport {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "caller",
        "phone",
        "category",
        "status",
        "unit",
        "location",
        "received_at",
        "description",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.display_id(),
            self.caller.clone(),
            self.phone.clone(),
            self.category.label().to_string(),
            self.status.label().to_string(),
            self.unit.clone(),
            self.location.clone(),
            self.received_at.format("%Y-%m-%d %H:%M").to_string(),
            self.description.clone(),
        ]
    }
}
