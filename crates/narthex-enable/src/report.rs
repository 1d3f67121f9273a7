//! Outcome of one enable run.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use narthex_core::{ActorIri, OrgId};
use narthex_sparql::queries::RejectedBinding;

/// An actor whose update was attempted and failed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ActorFailure {
    pub actor: ActorIri,
    pub error: String,
}

/// Per-actor outcome of a run, serialized as the tool's final output.
#[derive(Debug, Clone, Serialize)]
pub struct EnableReport {
    pub run_id: Uuid,
    pub org_id: OrgId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    /// Rows returned by the listing, including rejected ones.
    pub listed: usize,
    /// Listing rows that did not name a usable actor.
    pub rejected: Vec<RejectedBinding>,
    pub enabled: Vec<ActorIri>,
    pub failed: Vec<ActorFailure>,
    /// Listed but never attempted (dry run, or stopped by the halt policy).
    pub skipped: Vec<ActorIri>,
}

impl EnableReport {
    pub fn new(org_id: OrgId, listed: usize, dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            org_id,
            started_at: now,
            finished_at: now,
            dry_run,
            listed,
            rejected: Vec::new(),
            enabled: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Stamp the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Utc::now();
    }

    /// Actors an update was sent for.
    pub fn attempted(&self) -> usize {
        self.enabled.len() + self.failed.len()
    }

    /// True when every listed row was a usable actor and no update failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.rejected.is_empty()
    }
}
