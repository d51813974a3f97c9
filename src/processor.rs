use async_stream::try_stream;
use futures::{Stream, StreamExt};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

use crate::assembler::{distinct_committees, MatterAssembler};
use crate::config::DuplicatePolicy;
use crate::error::Result;
use crate::legistar::MatterSource;
use crate::notion::RecordSink;
use crate::rules::RuleSet;
use crate::sponsors::extract_sponsors;
use crate::types::{Matter, Priority};

/// What happened to one entry of the fetched matter list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatterOutcome {
    Exported { matter_id: i64, priority: Priority },
    /// No keyword hit and no department trigger
    Skipped { matter_id: i64 },
    /// Already processed earlier in this run
    Duplicate { matter_id: i64 },
}

impl MatterOutcome {
    pub fn matter_id(&self) -> i64 {
        match self {
            MatterOutcome::Exported { matter_id, .. }
            | MatterOutcome::Skipped { matter_id }
            | MatterOutcome::Duplicate { matter_id } => *matter_id,
        }
    }
}

/// Counts for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub exported: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &MatterOutcome) {
        self.fetched += 1;
        match outcome {
            MatterOutcome::Exported { .. } => self.exported += 1,
            MatterOutcome::Skipped { .. } => self.skipped += 1,
            MatterOutcome::Duplicate { .. } => self.duplicates += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} matters: {} exported, {} skipped, {} duplicates",
            self.fetched, self.exported, self.skipped, self.duplicates
        )
    }
}

/// One pass over the Legistar matter list
pub struct MonitorProcessor<S, K> {
    source: S,
    sink: K,
    rules: RuleSet,
    assembler: MatterAssembler,
    duplicate_policy: DuplicatePolicy,
}

impl<S: MatterSource, K: RecordSink> MonitorProcessor<S, K> {
    /// Create a new processor with the default duplicate policy
    pub fn new(source: S, sink: K, rules: RuleSet, assembler: MatterAssembler) -> Self {
        Self {
            source,
            sink,
            rules,
            assembler,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Process the matter list and yield one outcome per entry.
    ///
    /// The stream ends after the first error: a failed list fetch yields only
    /// that error, and a rejected export stops the run at that matter.
    pub fn process(&self) -> impl Stream<Item = Result<MatterOutcome>> + '_ {
        Box::pin(try_stream! {
            let matters = self.source.fetch_matters().await?;
            let mut seen = HashSet::new();

            for matter in matters {
                let first_sighting = seen.insert(matter.matter_id);
                if !first_sighting && self.duplicate_policy == DuplicatePolicy::SkipSeen {
                    debug!(matter_id = matter.matter_id, "skipping duplicate matter");
                    yield MatterOutcome::Duplicate { matter_id: matter.matter_id };
                    continue;
                }

                let outcome = self.process_matter(&matter).await?;
                yield outcome;
            }
        })
    }

    async fn process_matter(&self, matter: &Matter) -> Result<MatterOutcome> {
        let screening = self.rules.screen(matter);
        if !screening.is_eligible() {
            return Ok(MatterOutcome::Skipped {
                matter_id: matter.matter_id,
            });
        }

        let history = self.source.fetch_history(matter.matter_id).await;
        let committees = distinct_committees(&history);
        let classification = self.rules.classify(screening, &committees);

        let sponsors = extract_sponsors(&self.source.fetch_sponsors(matter.matter_id).await);
        let record =
            self.assembler
                .assemble(&self.rules, matter, &classification, committees, sponsors);

        self.sink.export(&record).await?;

        Ok(MatterOutcome::Exported {
            matter_id: matter.matter_id,
            priority: classification.priority,
        })
    }

    /// Run to completion, or stop at the first error
    pub async fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut stream = self.process();

        while let Some(outcome) = stream.next().await {
            summary.record(&outcome?);
        }

        info!(
            fetched = summary.fetched,
            exported = summary.exported,
            skipped = summary.skipped,
            duplicates = summary.duplicates,
            "monitor run finished"
        );
        Ok(summary)
    }
}
