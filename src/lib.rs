//! Legistar matter monitor.
//!
//! Fetches matters from a Legistar client API, screens them against curated
//! keyword, department and committee rules, assigns a priority tier, and
//! creates one Notion database page per eligible matter.

pub mod assembler;
pub mod config;
pub mod dates;
pub mod error;
pub mod legistar;
pub mod notion;
pub mod processor;
pub mod rules;
pub mod sponsors;
pub mod types;

#[cfg(test)]
mod test_support;

pub use assembler::MatterAssembler;
pub use config::{Config, ConfigBuilder, DuplicatePolicy};
pub use error::{Error, Result};
pub use legistar::{LegistarClient, MatterSource};
pub use notion::{NotionClient, RecordSink};
pub use processor::{MatterOutcome, MonitorProcessor, RunSummary};
pub use rules::{Classification, RuleSet, Screening};
pub use types::{ClassificationRecord, HistoryEntry, Matter, Priority, Sponsor};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::assembler::MatterAssembler;
    pub use crate::config::{Config, ConfigBuilder, DuplicatePolicy};
    pub use crate::error::{Error, Result};
    pub use crate::legistar::{LegistarClient, MatterSource};
    pub use crate::notion::{NotionClient, RecordSink};
    pub use crate::processor::{MatterOutcome, MonitorProcessor, RunSummary};
    pub use crate::rules::RuleSet;
    pub use crate::types::{ClassificationRecord, HistoryEntry, Matter, Priority, Sponsor};
    pub use futures::StreamExt;
}
