use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::StoreError, store::Record};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PortEventKind {
    VesselArrival,
    VesselDeparture,
    GateIn,
    GateOut,
    SecurityAlert,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PortEvent {
    pub id: u32,
    pub kind: PortEventKind,
    pub vessel: Option<String>,
    pub berth: Option<String>,
    pub department: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize, Serialize)]
pub struct PortEventRequest {
    pub kind: PortEventKind,
    pub vessel: Option<String>,
    pub berth: Option<String>,
    pub department: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}
/// Listing query served by the selector layer; criteria are alternatives,
/// not composed.
#[derive(Debug, Deserialize)]
pub struct PortEventQuery {
    pub kind: Option<String>,
    pub department: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl PortEventKind {
    pub fn label(&self) -> &'static str {
        match self {
            PortEventKind::VesselArrival => "vessel_arrival",
            PortEventKind::VesselDeparture => "vessel_departure",
            PortEventKind::GateIn => "gate_in",
            PortEventKind::GateOut => "gate_out",
            PortEventKind::SecurityAlert => "security_alert",
        }
    }
}

impl PortEvent {
    pub fn from_request(payload: PortEventRequest) -> Result<PortEvent, StoreError> {
        if payload.department.trim().is_empty() {
            return Err(StoreError::Validation("EVENT_MUST_HAVE_DEPARTMENT"));
        }
        let vessel_kind = matches!(
            payload.kind,
            PortEventKind::VesselArrival | PortEventKind::VesselDeparture
        );
        if vessel_kind && payload.vessel.as_deref().map_or(true, |name| name.trim().is_empty()) {
            return Err(StoreError::Validation("EVENT_MUST_HAVE_VESSEL"));
        }

        Ok(PortEvent {
            id: 0,
            kind: payload.kind,
            vessel: payload.vessel,
            berth: payload.berth,
            department: payload.department,
            description: payload.description,
            occurred_at: payload.occurred_at,
            created_at: payload.occurred_at,
            updated_at: payload.occurred_at,
        })
    }
}

impl Record for PortEvent {
    const STORE: &'static str = "port-events-storage";
    const ENTITY: &'static str = "EVENT";

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
    fn department(&self) -> Option<&str> {
        Some(&self.department)
    }
    fn location(&self) -> Option<&str> {
        self.berth.as_deref()
    }
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.description.as_str()];
        if let Some(vessel) = self.vessel.as_deref() {
            fields.push(vessel);
        }
        if let Some(berth) = self.berth.as_deref() {
            fields.push(berth);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vessel_events_require_a_vessel_name() {
        let error = PortEvent::from_request(PortEventRequest {
            kind: PortEventKind::VesselArrival,
            vessel: None,
            berth: Some("Berth 3".to_string()),
            department: "العمليات البحرية".to_string(),
            description: String::new(),
            occurred_at: "2026-08-05T04:30:00Z".parse().unwrap(),
        })
        .unwrap_err();
        assert_eq!(error.to_string(), "EVENT_MUST_HAVE_VESSEL");
    }

    #[test]
    fn gate_events_do_not_require_a_vessel() {
        let event = PortEvent::from_request(PortEventRequest {
            kind: PortEventKind::GateIn,
            vessel: None,
            berth: None,
            department: "بوابة الشحن".to_string(),
            description: "شاحنة حاويات".to_string(),
            occurred_at: "2026-08-05T04:30:00Z".parse().unwrap(),
        })
        .unwrap();
        assert_eq!(event.kind.label(), "gate_in");
    }
}
