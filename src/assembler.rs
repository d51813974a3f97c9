use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::dates::normalize_date;
use crate::rules::{Classification, RuleSet};
use crate::sponsors::SponsorNames;
use crate::types::{ClassificationRecord, HistoryEntry, Matter};

/// Title used when a matter has no name
pub const UNTITLED: &str = "Untitled";

/// Distinct, trimmed, non-empty action names from a matter's history, sorted
pub fn distinct_committees(history: &[HistoryEntry]) -> Vec<String> {
    history
        .iter()
        .filter_map(|entry| entry.action_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Joins a matter with its derived fields into an exportable record
#[derive(Debug, Clone)]
pub struct MatterAssembler {
    record_viewer_url: String,
    date_checked: String,
}

impl MatterAssembler {
    /// `date_checked` is stamped on every record of the run
    pub fn new(record_viewer_url: impl Into<String>, date_checked: NaiveDate) -> Self {
        Self {
            record_viewer_url: record_viewer_url.into(),
            date_checked: date_checked.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn date_checked(&self) -> &str {
        &self.date_checked
    }

    pub fn record_url(&self, matter_id: i64) -> String {
        format!("{}?ID={}", self.record_viewer_url, matter_id)
    }

    pub fn assemble(
        &self,
        rules: &RuleSet,
        matter: &Matter,
        classification: &Classification,
        committees: Vec<String>,
        sponsors: SponsorNames,
    ) -> ClassificationRecord {
        let action = non_blank(matter.last_action_name.as_deref())
            .or(matter.final_action_name.as_deref())
            .unwrap_or_default();
        let action_date = non_blank(matter.last_action_date.as_deref())
            .or(matter.final_action_date.as_deref());

        ClassificationRecord {
            matter_id: matter.matter_id,
            file_number: matter.file.clone().unwrap_or_default(),
            title: non_blank(matter.name.as_deref())
                .unwrap_or(UNTITLED)
                .to_string(),
            legislation_type: matter.type_name.clone().unwrap_or_default(),
            priority: classification.priority,
            department: matter.department.clone().unwrap_or_default(),
            in_control: matter.in_control_name.clone().unwrap_or_default(),
            action: action.to_string(),
            action_date: normalize_date(action_date),
            final_action_date: normalize_date(matter.passed_date.as_deref()),
            primary_sponsor: sponsors.primary,
            secondary_sponsors: sponsors.secondary,
            committees,
            keyword_groups: classification.keyword_groups(),
            status: rules.normalize_status(matter.status_name.as_deref()),
            url: self.record_url(matter.matter_id),
            date_checked: self.date_checked.clone(),
        }
    }
}
