use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::StoreError, export::Exportable, store::Record};

use super::Attachment;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    Theft,
    Trespassing,
    Fire,
    Smuggling,
    Accident,
    Environmental,
    EquipmentDamage,
    Other,
}
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentSeverity {
    Low,
    Medium,
    High,
    Critical,
}
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    New,
    InProgress,
    Resolved,
    Closed,
}

/// Incident status is authoritative: it only changes through `set_status`,
/// never derived from other fields.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Incident {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub kind: IncidentKind,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    pub department: String,
    pub location: String,
    pub reporter: String,
    pub occurred_at: DateTime<Utc>,
    pub comments: Vec<IncidentComment>,
    pub attachments: Vec<Attachment>,
    pub response_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IncidentComment {
    pub author: String,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize, Serialize)]
pub struct IncidentRequest {
    pub title: String,
    pub description: String,
    pub kind: IncidentKind,
    pub severity: IncidentSeverity,
    pub department: String,
    pub location: String,
    pub reporter: String,
    pub occurred_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize)]
pub struct IncidentStatusRequest {
    pub status: IncidentStatus,
}
#[derive(Debug, Deserialize)]
pub struct IncidentCommentRequest {
    pub author: String,
    pub text: String,
}

impl IncidentKind {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentKind::Theft => "theft",
            IncidentKind::Trespassing => "trespassing",
            IncidentKind::Fire => "fire",
            IncidentKind::Smuggling => "smuggling",
            IncidentKind::Accident => "accident",
            IncidentKind::Environmental => "environmental",
            IncidentKind::EquipmentDamage => "equipment_damage",
            IncidentKind::Other => "other",
        }
    }
}
impl IncidentSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentSeverity::Low => "low",
            IncidentSeverity::Medium => "medium",
            IncidentSeverity::High => "high",
            IncidentSeverity::Critical => "critical",
        }
    }
}
impl IncidentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            IncidentStatus::New => "new",
            IncidentStatus::InProgress => "in_progress",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Closed => "closed",
        }
    }
}

impl Incident {
    pub fn from_request(payload: IncidentRequest) -> Result<Incident, StoreError> {
        if payload.title.trim().is_empty() {
            return Err(StoreError::Validation("INCIDENT_MUST_HAVE_TITLE"));
        }
        if payload.department.trim().is_empty() {
            return Err(StoreError::Validation("INCIDENT_MUST_HAVE_DEPARTMENT"));
        }
        if payload.location.trim().is_empty() {
            return Err(StoreError::Validation("INCIDENT_MUST_HAVE_LOCATION"));
        }

        Ok(Incident {
            id: 0,
            title: payload.title,
            description: payload.description,
            kind: payload.kind,
            severity: payload.severity,
            status: IncidentStatus::New,
            department: payload.department,
            location: payload.location,
            reporter: payload.reporter,
            occurred_at: payload.occurred_at,
            comments: Vec::new(),
            attachments: Vec::new(),
            response_at: None,
            resolved_at: None,
            created_at: payload.occurred_at,
            updated_at: payload.occurred_at,
        })
    }

    /// Stamps the response/resolution milestones the first time the matching
    /// status is reached; moving back does not clear them.
    pub fn set_status(&mut self, status: IncidentStatus, at: DateTime<Utc>) {
        match status {
            IncidentStatus::InProgress if self.response_at.is_none() => {
                self.response_at = Some(at);
            }
            IncidentStatus::Resolved | IncidentStatus::Closed if self.resolved_at.is_none() => {
                self.resolved_at = Some(at);
            }
            _ => (),
        }
        self.status = status;
    }

    pub fn add_comment(
        &mut self,
        author: String,
        text: String,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        if text.trim().is_empty() {
            return Err(StoreError::Validation("COMMENT_MUST_HAVE_TEXT"));
        }
        if author.trim().is_empty() {
            return Err(StoreError::Validation("COMMENT_MUST_HAVE_AUTHOR"));
        }
        self.comments.push(IncidentComment {
            author,
            text,
            posted_at: at,
        });
        Ok(())
    }

    pub fn display_id(&self) -> String {
        format!("INC-{:04}", self.id)
    }
}

impl Record for Incident {
    const STORE: &'static str = "incidents-storage";
    const ENTITY: &'static str = "INCIDENT";

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
        self.occurred_at
    }
    fn kind_label(&self) -> Option<&'static str> {
        Some(self.kind.label())
    }
    fn status_label(&self) -> Option<&'static str> {
        Some(self.status.label())
    }
    fn department(&self) -> Option<&str> {
        Some(&self.department)
    }
    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.title,
            &self.description,
            &self.location,
            &self.reporter,
        ]
    }
}

impl Exportable for Incident {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "title",
        "kind",
        "severity",
        "status",
        "department",
        "location",
        "reporter",
        "occurred_at",
        "comments",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.display_id(),
            self.title.clone(),
            self.kind.label().to_string(),
            self.severity.label().to_string(),
            self.status.label().to_string(),
            self.department.clone(),
            self.location.clone(),
            self.reporter.clone(),
            self.occurred_at.format("%Y-%m-%d %H:%M").to_string(),
            self.comments.len().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident() -> Incident {
        Incident::from_request(IncidentRequest {
            title: "تسلل عبر السياج".to_string(),
            description: "شخص مجهول قرب البوابة الشمالية".to_string(),
            kind: IncidentKind::Trespassing,
            severity: IncidentSeverity::High,
            department: "الأمن".to_string(),
            location: "Gate 3".to_string(),
            reporter: "دورية المساء".to_string(),
            occurred_at: "2026-08-06T21:40:00Z".parse().unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn from_request_rejects_blank_title() {
        let error = Incident::from_request(IncidentRequest {
            title: "  ".to_string(),
            description: String::new(),
            kind: IncidentKind::Other,
            severity: IncidentSeverity::Low,
            department: "الأمن".to_string(),
            location: "Gate 1".to_string(),
            reporter: String::new(),
            occurred_at: "2026-08-06T21:40:00Z".parse().unwrap(),
        })
        .unwrap_err();
        assert_eq!(error.to_string(), "INCIDENT_MUST_HAVE_TITLE");
    }

    #[test]
    fn set_status_stamps_milestones_once() {
        let mut incident = incident();
        let first: DateTime<Utc> = "2026-08-06T22:00:00Z".parse().unwrap();
        let second: DateTime<Utc> = "2026-08-06T23:00:00Z".parse().unwrap();

        incident.set_status(IncidentStatus::InProgress, first);
        assert_eq!(incident.response_at, Some(first));

        incident.set_status(IncidentStatus::Resolved, second);
        assert_eq!(incident.resolved_at, Some(second));

        // Reopening and resolving again keeps the original milestones.
        incident.set_status(IncidentStatus::InProgress, second);
        incident.set_status(IncidentStatus::Closed, second);
        assert_eq!(incident.response_at, Some(first));
        assert_eq!(incident.resolved_at, Some(second));
    }

    #[test]
    fn comments_append_in_order() {
        let mut incident = incident();
        let at: DateTime<Utc> = "2026-08-06T22:00:00Z".parse().unwrap();
        incident
            .add_comment("ضابط المناوبة".to_string(), "تم إبلاغ الدورية".to_string(), at)
            .unwrap();
        incident
            .add_comment("قائد الوردية".to_string(), "أُغلقت البوابة".to_string(), at)
            .unwrap();

        assert_eq!(incident.comments.len(), 2);
        assert_eq!(incident.comments[0].text, "تم إبلاغ الدورية");
        assert_eq!(incident.comments[1].author, "قائد الوردية");
    }

    #[test]
    fn blank_comment_is_rejected() {
        let mut incident = incident();
        let at: DateTime<Utc> = "2026-08-06T22:00:00Z".parse().unwrap();
        let error = incident
            .add_comment("ضابط".to_string(), "   ".to_string(), at)
            .unwrap_err();
        assert_eq!(error.to_string(), "COMMENT_MUST_HAVE_TEXT");
        assert!(incident.comments.is_empty());
    }
}
