use serde::Deserialize;

use crate::store::Record;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DateScope {
    Day,
    Month,
    Year,
}

/// Report-page criteria. Every populated field narrows the result; the
/// filters compose by intersection.
#[derive(Debug, Default, Deserialize)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub kind: Option<String>,
    pub status: Option<String>,
    pub scope: Option<DateScope>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub unit: Option<String>,
}

fn populated(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Applies the criteria in a fixed order: free-text search, kind, status,
/// date scope, location, unit. Input order is preserved; empty criteria
/// return the full input.
pub fn apply<'a, R: Record>(records: &'a [R], criteria: &FilterCriteria) -> Vec<&'a R> {
    let mut matches: Vec<&R> = records.iter().collect();

    if let Some(search) = populated(&criteria.search) {
        let needle = search.to_lowercase();
        matches.retain(|record| {
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });
    }
    if let Some(kind) = populated(&criteria.kind) {
        matches.retain(|record| record.kind_label() == Some(kind));
    }
    if let Some(status) = populated(&criteria.status) {
        matches.retain(|record| record.status_label() == Some(status));
    }
    if let (Some(scope), Some(date)) = (criteria.scope, populated(&criteria.date)) {
        let pattern = match scope {
            DateScope::Day => "%Y-%m-%d",
            DateScope::Month => "%Y-%m",
            DateScope::Year => "%Y",
        };
        matches.retain(|record| record.occurred_at().format(pattern).to_string() == date);
    }
    if let Some(location) = populated(&criteria.location) {
        let needle = location.to_lowercase();
        matches.retain(|record| {
            record
                .location()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        });
    }
    if let Some(unit) = populated(&criteria.unit) {
        let needle = unit.to_lowercase();
        matches.retain(|record| {
            record
                .unit()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        });
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        call_report::{CallCategory, CallReport, CallReportRequest},
        incident::{Incident, IncidentKind, IncidentRequest, IncidentSeverity},
    };

    fn incident(title: &str, kind: IncidentKind, location: &str, occurred_at: &str) -> Incident {
        Incident::from_request(IncidentRequest {
            title: title.to_string(),
            description: format!("{title} details"),
            kind,
            severity: IncidentSeverity::Medium,
            department: "الأمن".to_string(),
            location: location.to_string(),
            reporter: "ضابط المناوبة".to_string(),
            occurred_at: occurred_at.parse().unwrap(),
        })
        .unwrap()
    }

    fn fixtures() -> Vec<Incident> {
        vec![
            incident("سرقة معدات", IncidentKind::Theft, "Berth 4", "2026-08-01T10:00:00Z"),
            incident("Fence breach", IncidentKind::Trespassing, "Gate 2", "2026-08-14T22:30:00Z"),
            incident("حريق محدود", IncidentKind::Fire, "Warehouse 7", "2026-07-03T03:15:00Z"),
        ]
    }

    #[test]
    fn empty_criteria_returns_all_in_order() {
        let incidents = fixtures();
        let matched = apply(&incidents, &FilterCriteria::default());
        assert_eq!(matched.len(), 3);
        assert_eq!(matched[0].title, "سرقة معدات");
        assert_eq!(matched[2].title, "حريق محدود");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let incidents = fixtures();
        let criteria = FilterCriteria {
            search: Some("FENCE".to_string()),
            ..FilterCriteria::default()
        };
        let matched = apply(&incidents, &criteria);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].title, "Fence breach");
    }

    #[test]
    fn search_covers_arabic_fields() {
        let incidents = fixtures();
        let criteria = FilterCriteria {
            search: Some("سرقة".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(apply(&incidents, &criteria).len(), 1);
    }

    #[test]
    fn filters_compose_by_intersection() {
        let incidents = fixtures();
        let criteria = FilterCriteria {
            search: Some("breach".to_string()),
            kind: Some("theft".to_string()),
            ..FilterCriteria::default()
        };
        assert!(apply(&incidents, &criteria).is_empty());

        let criteria = FilterCriteria {
            search: Some("breach".to_string()),
            kind: Some("trespassing".to_string()),
            status: Some("new".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(apply(&incidents, &criteria).len(), 1);
    }

    #[test]
    fn date_scopes_compare_formatted_dates() {
        let incidents = fixtures();

        let day = FilterCriteria {
            scope: Some(DateScope::Day),
            date: Some("2026-08-14".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(apply(&incidents, &day).len(), 1);

        let month = FilterCriteria {
            scope: Some(DateScope::Month),
            date: Some("2026-08".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(apply(&incidents, &month).len(), 2);

        let year = FilterCriteria {
            scope: Some(DateScope::Year),
            date: Some("2026".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(apply(&incidents, &year).len(), 3);
    }

    #[test]
    fn location_filter_is_substring() {
        let incidents = fixtures();
        let criteria = FilterCriteria {
            location: Some("gate".to_string()),
            ..FilterCriteria::default()
        };
        let matched = apply(&incidents, &criteria);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].location, "Gate 2");
    }

    #[test]
    fn unit_filter_applies_to_call_reports() {
        let reports = vec![
            CallReport::from_request(CallReportRequest {
                caller: "أبو خالد".to_string(),
                phone: "0501234567".to_string(),
                category: CallCategory::Emergency,
                description: "دخان قرب الرصيف".to_string(),
                unit: "fire-brigade".to_string(),
                location: "Berth 9".to_string(),
                received_at: "2026-08-05T12:00:00Z".parse().unwrap(),
            })
            .unwrap(),
            CallReport::from_request(CallReportRequest {
                caller: "مراقب البوابة".to_string(),
                phone: "0507654321".to_string(),
                category: CallCategory::Tip,
                description: "شاحنة متروكة".to_string(),
                unit: "patrol".to_string(),
                location: "Gate 1".to_string(),
                received_at: "2026-08-05T13:00:00Z".parse().unwrap(),
            })
            .unwrap(),
        ];

        let criteria = FilterCriteria {
            unit: Some("patrol".to_string()),
            ..FilterCriteria::default()
        };
        let matched = apply(&reports, &criteria);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].caller, "مراقب البوابة");
    }
}
