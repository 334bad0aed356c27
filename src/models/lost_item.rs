use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::StoreError, store::Record};

use super::Attachment;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LostItemKind {
    Lost,
    Found,
}
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LostItemStatus {
    Unclaimed,
    Claimed,
    Returned,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LostItem {
    pub id: u32,
    pub kind: LostItemKind,
    pub item: String,
    pub description: String,
    pub location: String,
    pub reporter: String,
    pub contact: String,
    pub status: LostItemStatus,
    pub claimant: Option<String>,
    pub image: Option<Attachment>,
    pub reported_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize, Serialize)]
pub struct LostItemRequest {
    pub kind: LostItemKind,
    pub item: String,
    pub description: String,
    pub location: String,
    pub reporter: String,
    pub contact: String,
    pub reported_at: DateTime<Utc>,
}
#[derive(Debug, Deserialize)]
pub struct LostItemClaimRequest {
    pub claimant: String,
}

impl LostItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            LostItemKind::Lost => "lost",
            LostItemKind::Found => "found",
        }
    }
}
impl LostItemStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LostItemStatus::Unclaimed => "unclaimed",
            LostItemStatus::Claimed => "claimed",
            LostItemStatus::Returned => "returned",
        }
    }
}

impl LostItem {
    pub fn from_request(payload: LostItemRequest) -> Result<LostItem, StoreError> {
        if payload.item.trim().is_empty() {
            return Err(StoreError::Validation("ITEM_MUST_HAVE_NAME"));
        }
        if payload.contact.trim().is_empty() {
            return Err(StoreError::Validation("ITEM_MUST_HAVE_CONTACT"));
        }

        Ok(LostItem {
            id: 0,
            kind: payload.kind,
            item: payload.item,
            description: payload.description,
            location: payload.location,
            reporter: payload.reporter,
            contact: payload.contact,
            status: LostItemStatus::Unclaimed,
            claimant: None,
            image: None,
            reported_at: payload.reported_at,
            created_at: payload.reported_at,
            updated_at: payload.reported_at,
        })
    }

    pub fn claim(&mut self, claimant: String) -> Result<(), StoreError> {
        if self.status != LostItemStatus::Unclaimed {
            return Err(StoreError::Validation("ITEM_ALREADY_CLAIMED"));
        }
        if claimant.trim().is_empty() {
            return Err(StoreError::Validation("CLAIM_MUST_HAVE_CLAIMANT"));
        }
        self.status = LostItemStatus::Claimed;
        self.claimant = Some(claimant);
        Ok(())
    }

    pub fn mark_returned(&mut self) -> Result<(), StoreError> {
        if self.status != LostItemStatus::Claimed {
            return Err(StoreError::Validation("ITEM_MUST_BE_CLAIMED_FIRST"));
        }
        self.status = LostItemStatus::Returned;
        Ok(())
    }
}

impl Record for LostItem {
    const STORE: &'static str = "lost-items-storage";
    const ENTITY: &'static str = "ITEM";

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
        self.reported_at
    }
    fn kind_label(&self) -> Option<&'static str> {
        Some(self.kind.label())
    }
    fn status_label(&self) -> Option<&'static str> {
        Some(self.status.label())
    }
    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.item,
            &self.description,
            &self.location,
            &self.reporter,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> LostItem {
        LostItem::from_request(LostItemRequest {
            kind: LostItemKind::Found,
            item: "محفظة جلدية".to_string(),
            description: "وُجدت قرب صالة الانتظار".to_string(),
            location: "Terminal 1".to_string(),
            reporter: "عامل النظافة".to_string(),
            contact: "0551112222".to_string(),
            reported_at: "2026-08-03T09:00:00Z".parse().unwrap(),
        })
        .unwrap()
    }

    #[test]
    fn claim_then_return_walks_the_lifecycle() {
        let mut item = item();
        item.claim("سالم الحربي".to_string()).unwrap();
        assert_eq!(item.status, LostItemStatus::Claimed);
        assert_eq!(item.claimant.as_deref(), Some("سالم الحربي"));

        item.mark_returned().unwrap();
        assert_eq!(item.status, LostItemStatus::Returned);
    }

    #[test]
    fn double_claim_is_rejected() {
        let mut item = item();
        item.claim("الأول".to_string()).unwrap();
        let error = item.claim("الثاني".to_string()).unwrap_err();
        assert_eq!(error.to_string(), "ITEM_ALREADY_CLAIMED");
        assert_eq!(item.claimant.as_deref(), Some("الأول"));
    }

    #[test]
    fn return_requires_a_claim() {
        let mut item = item();
        let error = item.mark_returned().unwrap_err();
        assert_eq!(error.to_string(), "ITEM_MUST_BE_CLAIMED_FIRST");
    }
}
