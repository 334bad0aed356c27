use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::StoreError,
    export::Exportable,
    store::{Record, Store},
};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PermitKind {
    HotWork,
    ColdWork,
    Electrical,
    Excavation,
    WorkAtHeight,
    ConfinedSpace,
}
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PermitStatus {
    InProgress,
    Ended,
    Hold,
}

/// Permit status is derived, never authoritative: the persisted field is a
/// snapshot of `PermitStatus::derive`, rewritten on every mutation and by the
/// `refresh_statuses` sweep. Requests carry no status field.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WorkPermit {
    pub id: u32,
    pub company: String,
    pub area: String,
    pub kind: PermitKind,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub workers: u32,
    pub description: String,
    pub on_hold: bool,
    pub hold_reason: Option<String>,
    pub status: PermitStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize, Serialize)]
pub struct WorkPermitRequest {
    pub company: String,
    pub area: String,
    pub kind: PermitKind,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub workers: u32,
    pub description: String,
}
#[derive(Debug, Deserialize)]
pub struct PermitHoldRequest {
    pub reason: Option<String>,
}

impl PermitKind {
    pub fn label(&self) -> &'static str {
        match self {
            PermitKind::HotWork => "hot_work",
            PermitKind::ColdWork => "cold_work",
            PermitKind::Electrical => "electrical",
            PermitKind::Excavation => "excavation",
            PermitKind::WorkAtHeight => "work_at_height",
            PermitKind::ConfinedSpace => "confined_space",
        }
    }
}

impl PermitStatus {
    /// An explicit hold wins over the dates; otherwise a permit whose end
    /// date has passed is ended, and anything else is in progress. `now` is
    /// always supplied by the caller.
    pub fn derive(on_hold: bool, end_date: DateTime<Utc>, now: DateTime<Utc>) -> PermitStatus {
        if on_hold {
            PermitStatus::Hold
        } else if end_date < now {
            PermitStatus::Ended
        } else {
            PermitStatus::InProgress
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PermitStatus::InProgress => "in_progress",
            PermitStatus::Ended => "ended",
            PermitStatus::Hold => "hold",
        }
    }
}

impl WorkPermit {
    pub fn from_request(payload: WorkPermitRequest, now: DateTime<Utc>) -> Result<WorkPermit, StoreError> {
        if payload.company.trim().is_empty() {
            return Err(StoreError::Validation("PERMIT_MUST_HAVE_COMPANY"));
        }
        if payload.area.trim().is_empty() {
            return Err(StoreError::Validation("PERMIT_MUST_HAVE_AREA"));
        }
        if payload.end_date < payload.start_date {
            return Err(StoreError::Validation("PERMIT_MUST_HAVE_VALID_PERIOD"));
        }

        Ok(WorkPermit {
            id: 0,
            company: payload.company,
            area: payload.area,
            kind: payload.kind,
            start_date: payload.start_date,
            end_date: payload.end_date,
            workers: payload.workers,
            description: payload.description,
            on_hold: false,
            hold_reason: None,
            status: PermitStatus::derive(false, payload.end_date, now),
            created_at: now,
            updated_at: now,
        })
    }

    /// Recomputes the snapshot; true when it changed.
    pub fn refresh_status(&mut self, now: DateTime<Utc>) -> bool {
        let next = PermitStatus::derive(self.on_hold, self.end_date, now);
        if next == self.status {
            false
        } else {
            self.status = next;
            true
        }
    }

    pub fn hold(&mut self, reason: Option<String>, now: DateTime<Utc>) {
        self.on_hold = true;
        self.hold_reason = reason;
        self.refresh_status(now);
    }

    pub fn release(&mut self, now: DateTime<Utc>) {
        self.on_hold = false;
        self.hold_reason = None;
        self.refresh_status(now);
    }

    pub fn permit_number(&self) -> String {
        format!("WP-{:04}", self.id)
    }
}

/// Batch sweep over the whole store; persists once when at least one
/// snapshot went stale.
pub fn refresh_statuses(store: &mut Store<WorkPermit>, now: DateTime<Utc>) -> usize {
    store.modify_all(|permit| permit.refresh_status(now))
}

impl Record for WorkPermit {
    const STORE: &'static str = "work-permits-storage";
    const ENTITY: &'static str = "PERMIT";

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
        self.start_date
    }
    fn kind_label(&self) -> Option<&'static str> {
        Some(self.kind.label())
    }
    fn status_label(&self) -> Option<&'static str> {
        Some(self.status.label())
    }
    fn location(&self) -> Option<&str> {
        Some(&self.area)
    }
    fn unit(&self) -> Option<&str> {
        Some(&self.company)
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.company, &self.area, &self.description]
    }
}

impl Exportable for WorkPermit {
    const HEADERS: &'static [&'static str] = &[
        "permit",
        "company",
        "area",
        "kind",
        "status",
        "start_date",
        "end_date",
        "workers",
    ];

    fn row(&self) -> Vec<String> {
        vec![
            self.permit_number(),
            self.company.clone(),
            self.area.clone(),
            self.kind.label().to_string(),
            self.status.label().to_string(),
            self.start_date.format("%Y-%m-%d").to_string(),
            self.end_date.format("%Y-%m-%d").to_string(),
            self.workers.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use std::sync::Arc;

    fn at(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    fn permit(start: &str, end: &str) -> WorkPermit {
        WorkPermit::from_request(
            WorkPermitRequest {
                company: "شركة الإنشاءات البحرية".to_string(),
                area: "Berth 12".to_string(),
                kind: PermitKind::HotWork,
                start_date: at(start),
                end_date: at(end),
                workers: 6,
                description: "لحام دعامات الرصيف".to_string(),
            },
            at(start),
        )
        .unwrap()
    }

    #[test]
    fn derive_is_pure_and_hold_wins() {
        let end = at("2026-08-10T00:00:00Z");
        let now = at("2026-08-20T00:00:00Z");

        assert_eq!(PermitStatus::derive(true, end, now), PermitStatus::Hold);
        assert_eq!(PermitStatus::derive(true, end, now), PermitStatus::Hold);
        assert_eq!(PermitStatus::derive(false, end, now), PermitStatus::Ended);
    }

    #[test]
    fn derive_uses_end_date_against_now() {
        let now = at("2026-08-07T12:00:00Z");
        assert_eq!(
            PermitStatus::derive(false, at("2026-08-06T12:00:00Z"), now),
            PermitStatus::Ended
        );
        assert_eq!(
            PermitStatus::derive(false, at("2026-08-08T12:00:00Z"), now),
            PermitStatus::InProgress
        );
        // End date equal to now has not passed yet.
        assert_eq!(PermitStatus::derive(false, now, now), PermitStatus::InProgress);
    }

    #[test]
    fn invalid_period_is_rejected() {
        let error = WorkPermit::from_request(
            WorkPermitRequest {
                company: "X".to_string(),
                area: "Y".to_string(),
                kind: PermitKind::ColdWork,
                start_date: at("2026-08-10T00:00:00Z"),
                end_date: at("2026-08-01T00:00:00Z"),
                workers: 1,
                description: String::new(),
            },
            at("2026-08-01T00:00:00Z"),
        )
        .unwrap_err();
        assert_eq!(error.to_string(), "PERMIT_MUST_HAVE_VALID_PERIOD");
    }

    #[test]
    fn hold_and_release_rewrite_the_snapshot() {
        let mut permit = permit("2026-08-01T00:00:00Z", "2026-08-30T00:00:00Z");
        assert_eq!(permit.status, PermitStatus::InProgress);

        permit.hold(Some("حادث في المنطقة".to_string()), at("2026-08-05T00:00:00Z"));
        assert_eq!(permit.status, PermitStatus::Hold);
        assert!(permit.on_hold);

        permit.release(at("2026-08-06T00:00:00Z"));
        assert_eq!(permit.status, PermitStatus::InProgress);
        assert!(permit.hold_reason.is_none());
    }

    #[test]
    fn sweep_rewrites_stale_snapshots_once() {
        let mut permits: Store<WorkPermit> = Store::open(Arc::new(MemoryBackend::new())).unwrap();
        permits.add(permit("2026-08-01T00:00:00Z", "2026-08-10T00:00:00Z"));
        permits.add(permit("2026-08-01T00:00:00Z", "2026-09-20T00:00:00Z"));

        let after_first_end = at("2026-08-15T00:00:00Z");
        assert_eq!(refresh_statuses(&mut permits, after_first_end), 1);
        assert_eq!(permits.get(1).unwrap().status, PermitStatus::Ended);
        assert_eq!(permits.get(2).unwrap().status, PermitStatus::InProgress);

        // Idempotent on unchanged inputs.
        assert_eq!(refresh_statuses(&mut permits, after_first_end), 0);
    }

    #[test]
    fn held_permit_survives_the_sweep() {
        let mut permits: Store<WorkPermit> = Store::open(Arc::new(MemoryBackend::new())).unwrap();
        let mut held = permit("2026-08-01T00:00:00Z", "2026-08-10T00:00:00Z");
        held.hold(None, at("2026-08-02T00:00:00Z"));
        permits.add(held);

        refresh_statuses(&mut permits, at("2026-08-15T00:00:00Z"));
        assert_eq!(permits.get(1).unwrap().status, PermitStatus::Hold);
    }
}
