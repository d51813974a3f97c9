use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A legislative item as returned by `GET /matters`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Matter {
    #[serde(rename = "MatterId")]
    pub matter_id: i64,
    #[serde(rename = "MatterFile", default)]
    pub file: Option<String>,
    #[serde(rename = "MatterName", default)]
    pub name: Option<String>,
    #[serde(rename = "MatterTitle", default)]
    pub title: Option<String>,
    #[serde(rename = "MatterText", default)]
    pub text: Option<String>,
    #[serde(rename = "MatterTypeName", default)]
    pub type_name: Option<String>,
    #[serde(rename = "MatterStatusName", default)]
    pub status_name: Option<String>,
    #[serde(rename = "MatterInControlName", default)]
    pub in_control_name: Option<String>,
    #[serde(rename = "Department", default)]
    pub department: Option<String>,
    #[serde(rename = "MatterLastActionName", default)]
    pub last_action_name: Option<String>,
    #[serde(rename = "MatterFinalActionName", default)]
    pub final_action_name: Option<String>,
    #[serde(rename = "MatterLastActionDate", default)]
    pub last_action_date: Option<String>,
    #[serde(rename = "MatterFinalActionDate", default)]
    pub final_action_date: Option<String>,
    #[serde(rename = "MatterPassedDate", default)]
    pub passed_date: Option<String>,
}

impl Matter {
    /// Name, title and body text joined by single spaces, skipping empty parts
    pub fn search_text(&self) -> String {
        [&self.name, &self.title, &self.text]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One recorded action from `GET /matters/{id}/history`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "MatterHistoryActionName", default)]
    pub action_name: Option<String>,
}

/// Sequence number as Legistar sends it: an integer, a numeric string, or junk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SponsorSequence {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl SponsorSequence {
    /// The sequence as an integer, if it is one or is a string of ASCII digits
    pub fn as_number(&self) -> Option<i64> {
        match self {
            SponsorSequence::Number(n) => Some(*n),
            SponsorSequence::Text(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().ok()
            }
            _ => None,
        }
    }
}

/// One entry from `GET /matters/{id}/sponsors`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sponsor {
    #[serde(rename = "MatterSponsorName", default)]
    pub name: Option<String>,
    #[serde(rename = "MatterSponsorSequence", default)]
    pub sequence: Option<SponsorSequence>,
    /// Only a literal JSON `true` counts as flagged
    #[serde(
        rename = "MatterSponsorPrimary",
        default,
        deserialize_with = "explicit_true"
    )]
    pub primary: bool,
}

fn explicit_true<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(matches!(value, serde_json::Value::Bool(true)))
}

/// Review priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Priority table over the three rule signals.
    ///
    /// HIGH needs the funding group plus a department or committee hit;
    /// any single signal otherwise gives MEDIUM; no signal gives LOW.
    pub fn from_signals(funding: bool, department: bool, committee: bool) -> Self {
        if funding && (department || committee) {
            Priority::High
        } else if funding || department || committee {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit pushed to the destination database.
///
/// Built once by the assembler and only read afterwards. Optional source
/// fields have already been replaced by their defaults, and dates are
/// `YYYY-MM-DD` or empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRecord {
    pub matter_id: i64,
    pub file_number: String,
    pub title: String,
    pub legislation_type: String,
    pub priority: Priority,
    pub department: String,
    pub in_control: String,
    pub action: String,
    pub action_date: String,
    pub final_action_date: String,
    pub primary_sponsor: String,
    pub secondary_sponsors: Vec<String>,
    pub committees: Vec<String>,
    pub keyword_groups: Vec<String>,
    pub status: String,
    pub url: String,
    pub date_checked: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matter_tolerates_nulls_and_missing_fields() {
        let json = serde_json::json!({
            "MatterId": 42,
            "MatterName": "Hotel tax ordinance",
            "MatterTitle": null,
            "Department": null
        });
        let matter: Matter = serde_json::from_value(json).unwrap();
        assert_eq!(matter.matter_id, 42);
        assert_eq!(matter.name.as_deref(), Some("Hotel tax ordinance"));
        assert!(matter.title.is_none());
        assert!(matter.department.is_none());
        assert!(matter.passed_date.is_none());
    }

    #[test]
    fn search_text_skips_empty_parts() {
        let matter = Matter {
            matter_id: 1,
            name: Some("Mural".into()),
            title: Some(String::new()),
            text: Some("Public art program".into()),
            ..Default::default()
        };
        assert_eq!(matter.search_text(), "Mural Public art program");
    }

    #[test]
    fn sponsor_sequence_accepts_numbers_and_digit_strings() {
        let sponsors: Vec<Sponsor> = serde_json::from_str(
            r#"[
                {"MatterSponsorName": "A", "MatterSponsorSequence": 1},
                {"MatterSponsorName": "B", "MatterSponsorSequence": "2"},
                {"MatterSponsorName": "C", "MatterSponsorSequence": "2b"},
                {"MatterSponsorName": "D", "MatterSponsorSequence": 1.5},
                {"MatterSponsorName": "E"}
            ]"#,
        )
        .unwrap();
        let numbers: Vec<Option<i64>> = sponsors
            .iter()
            .map(|s| s.sequence.as_ref().and_then(SponsorSequence::as_number))
            .collect();
        assert_eq!(numbers, vec![Some(1), Some(2), None, None, None]);
    }

    #[test]
    fn sponsor_primary_flag_requires_literal_true() {
        let sponsors: Vec<Sponsor> = serde_json::from_str(
            r#"[
                {"MatterSponsorName": "A", "MatterSponsorPrimary": true},
                {"MatterSponsorName": "B", "MatterSponsorPrimary": 1},
                {"MatterSponsorName": "C", "MatterSponsorPrimary": null},
                {"MatterSponsorName": "D"}
            ]"#,
        )
        .unwrap();
        let flags: Vec<bool> = sponsors.iter().map(|s| s.primary).collect();
        assert_eq!(flags, vec![true, false, false, false]);
    }

    #[test]
    fn priority_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"HIGH\"");
        assert_eq!(Priority::Medium.to_string(), "MEDIUM");
    }
}
