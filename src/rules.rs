//! Rule evaluation for Legistar matters.
//!
//! Three independent signals feed the priority tier:
//!
//! - keyword groups: lower-cased phrases searched as substrings of the
//!   matter's name, title and body text
//! - trigger departments: substrings of the matter's department
//! - escalation committees: substrings of any action name in the history
//!
//! Screening is two-stage. A matter is eligible only through a keyword hit
//! or a department trigger; committee escalation raises the priority of an
//! eligible matter but never makes a matter eligible on its own.
//!
//! Matching is plain case-insensitive substring containment, so a short
//! phrase such as `"tot"` also matches inside longer words.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Matter, Priority};

/// Keyword group whose hit counts as the funding signal
pub const FUNDING_GROUP: &str = "funding_tax";

/// Status used when a matter's status is missing or unknown
pub const DEFAULT_STATUS: &str = "Pending";

/// Matched group name -> phrases of that group found in the text, in rule order
pub type KeywordHits = IndexMap<String, Vec<String>>;

const ARTS_CULTURE: &[&str] = &[
    "art",
    "artwork",
    "artworks",
    "arts",
    "public art",
    "mural",
    "visual art",
    "culture",
    "cultural",
    "monument",
    "sculpture",
    "painting",
];

const ARTISTS_PRACTICE: &[&str] = &["artist", "artists", "dance", "literary", "music", "film"];

const FUNDING_TAX: &[&str] = &[
    "hotel tax",
    "transient occupancy tax",
    "tot",
    "budget and appropriation",
    "appropriation ordinance",
    "annual salary ordinance",
];

const TRIGGER_DEPARTMENTS: &[&str] = &[
    "arts commission",
    "public art program",
    "asian art museum",
    "department of children, youth and their families",
    "economic and workforce development",
    "office of economic and workforce development",
    "fine arts museum",
    "fine arts museums",
    "grants for the arts",
    "museum of the african diaspora",
    "yerba buena center for the arts",
];

const ESCALATION_COMMITTEES: &[&str] = &[
    "budget and finance",
    "budget and appropriations",
    "appropriations",
    "government audit and oversight",
    "rules committee",
];

const KNOWN_STATUSES: &[&str] = &[
    "30 Day Rule",
    "Completed",
    "Consent Agenda",
    "Disapproved",
    "Discussed and Filed",
    "Failed",
    "Filed",
    "First Reading",
    "First Reading, Consent",
    "For Immediate Adoption",
    "Heard",
    "Introduced",
    "Killed",
    "Litigation-Attorney",
    "Mayors Office",
    "New Business",
    "Passed",
    "Pending",
    "Pending Committee Action",
    "Special Order",
    "To be Scheduled for Public Hearing",
    "Unfinished Business",
    "Unfinished Business-Final Passage",
    "Vetoed",
    "Withdrawn",
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Rule tables as they appear in a YAML rules file
#[derive(Debug, Deserialize)]
struct RawRuleSet {
    keyword_groups: IndexMap<String, Vec<String>>,
    #[serde(default)]
    trigger_departments: Vec<String>,
    #[serde(default)]
    escalation_committees: Vec<String>,
    #[serde(default)]
    known_statuses: Option<Vec<String>>,
    #[serde(default)]
    default_status: Option<String>,
}

/// The curated tables a matter is evaluated against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    keyword_groups: IndexMap<String, Vec<String>>,
    trigger_departments: Vec<String>,
    escalation_committees: Vec<String>,
    known_statuses: Vec<String>,
    default_status: String,
}

impl Default for RuleSet {
    /// The San Francisco arts and culture tables
    fn default() -> Self {
        let mut groups = IndexMap::new();
        groups.insert("arts_culture".to_string(), to_strings(ARTS_CULTURE));
        groups.insert("artists_practice".to_string(), to_strings(ARTISTS_PRACTICE));
        groups.insert(FUNDING_GROUP.to_string(), to_strings(FUNDING_TAX));

        Self::new(
            groups,
            to_strings(TRIGGER_DEPARTMENTS),
            to_strings(ESCALATION_COMMITTEES),
        )
    }
}

impl RuleSet {
    /// Build a rule set with the built-in status list.
    ///
    /// Phrases and trigger names are lower-cased and trimmed; blank entries are dropped.
    pub fn new(
        keyword_groups: IndexMap<String, Vec<String>>,
        trigger_departments: Vec<String>,
        escalation_committees: Vec<String>,
    ) -> Self {
        Self {
            keyword_groups: keyword_groups
                .into_iter()
                .map(|(group, phrases)| (group, lowercase_all(phrases)))
                .collect(),
            trigger_departments: lowercase_all(trigger_departments),
            escalation_committees: lowercase_all(escalation_committees),
            known_statuses: to_strings(KNOWN_STATUSES),
            default_status: DEFAULT_STATUS.to_string(),
        }
    }

    /// Replace the status vocabulary. The default must be one of the known statuses.
    pub fn with_statuses(
        mut self,
        known_statuses: Vec<String>,
        default_status: impl Into<String>,
    ) -> Result<Self> {
        let default_status = default_status.into();
        if !known_statuses.iter().any(|s| s == &default_status) {
            return Err(Error::Config(format!(
                "Default status '{}' is not one of the known statuses",
                default_status
            )));
        }
        self.known_statuses = known_statuses;
        self.default_status = default_status;
        Ok(self)
    }

    /// Parse rule tables from YAML
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let raw: RawRuleSet = serde_yaml::from_str(contents)?;
        let rules = Self::new(
            raw.keyword_groups,
            raw.trigger_departments,
            raw.escalation_committees,
        );

        match (raw.known_statuses, raw.default_status) {
            (None, None) => Ok(rules),
            (known, default) => {
                let known = known.unwrap_or_else(|| to_strings(KNOWN_STATUSES));
                let default = default.unwrap_or_else(|| DEFAULT_STATUS.to_string());
                rules.with_statuses(known, default)
            }
        }
    }

    /// Load rule tables from a YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "reading rules file");
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    pub fn keyword_groups(&self) -> &IndexMap<String, Vec<String>> {
        &self.keyword_groups
    }

    pub fn trigger_departments(&self) -> &[String] {
        &self.trigger_departments
    }

    pub fn escalation_committees(&self) -> &[String] {
        &self.escalation_committees
    }

    pub fn known_statuses(&self) -> &[String] {
        &self.known_statuses
    }

    pub fn default_status(&self) -> &str {
        &self.default_status
    }

    /// Groups with at least one phrase occurring in `text`
    pub fn match_keywords(&self, text: &str) -> KeywordHits {
        let text = text.to_lowercase();
        self.keyword_groups
            .iter()
            .filter_map(|(group, phrases)| {
                let matches: Vec<String> = phrases
                    .iter()
                    .filter(|phrase| text.contains(phrase.as_str()))
                    .cloned()
                    .collect();
                (!matches.is_empty()).then(|| (group.clone(), matches))
            })
            .collect()
    }

    /// Whether the department names a trigger department. Missing or blank never triggers.
    pub fn department_trigger(&self, department: Option<&str>) -> bool {
        let department = match department.map(str::trim) {
            Some(d) if !d.is_empty() => d.to_lowercase(),
            _ => return false,
        };
        self.trigger_departments
            .iter()
            .any(|trigger| department.contains(trigger.as_str()))
    }

    /// Whether any history action name names an escalation committee
    pub fn committee_escalation<S: AsRef<str>>(&self, committees: &[S]) -> bool {
        committees.iter().any(|committee| {
            let committee = committee.as_ref().to_lowercase();
            self.escalation_committees
                .iter()
                .any(|escalation| committee.contains(escalation.as_str()))
        })
    }

    /// Known status as given (surrounding whitespace ignored), anything else becomes the default status
    pub fn normalize_status(&self, status: Option<&str>) -> String {
        status
            .map(str::trim)
            .filter(|s| self.known_statuses.iter().any(|known| known == s))
            .unwrap_or(&self.default_status)
            .to_string()
    }

    /// First stage: the signals that decide eligibility
    pub fn screen(&self, matter: &Matter) -> Screening {
        let screening = Screening {
            keyword_hits: self.match_keywords(&matter.search_text()),
            department_trigger: self.department_trigger(matter.department.as_deref()),
        };
        debug!(
            matter_id = matter.matter_id,
            groups = ?screening.keyword_hits.keys().collect::<Vec<_>>(),
            department_trigger = screening.department_trigger,
            "screened matter"
        );
        screening
    }

    /// Second stage: add committee escalation and assign the priority
    pub fn classify<S: AsRef<str>>(&self, screening: Screening, committees: &[S]) -> Classification {
        let committee_trigger = self.committee_escalation(committees);
        let priority = Priority::from_signals(
            screening.keyword_hits.contains_key(FUNDING_GROUP),
            screening.department_trigger,
            committee_trigger,
        );
        Classification {
            keyword_hits: screening.keyword_hits,
            department_trigger: screening.department_trigger,
            committee_trigger,
            priority,
        }
    }

    /// Both stages at once; `None` when the matter is not eligible
    pub fn evaluate<S: AsRef<str>>(&self, matter: &Matter, committees: &[S]) -> Option<Classification> {
        let screening = self.screen(matter);
        screening
            .is_eligible()
            .then(|| self.classify(screening, committees))
    }
}

/// Outcome of the first stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screening {
    pub keyword_hits: KeywordHits,
    pub department_trigger: bool,
}

impl Screening {
    pub fn is_eligible(&self) -> bool {
        !self.keyword_hits.is_empty() || self.department_trigger
    }
}

/// Full evaluation of an eligible matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub keyword_hits: KeywordHits,
    pub department_trigger: bool,
    pub committee_trigger: bool,
    pub priority: Priority,
}

impl Classification {
    /// Matched group names in rule order
    pub fn keyword_groups(&self) -> Vec<String> {
        self.keyword_hits.keys().cloned().collect()
    }
}
