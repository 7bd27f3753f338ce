//! Per-status counts of a change set, plus a human-readable rendering.

use serde::{Deserialize, Serialize};

use crate::model::{ChangeRecord, IudStatus};

/// Counts of Inserts, Updates and Deletes in a change set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub inserts: usize,
    pub updates: usize,
    pub deletes: usize,
}

impl ChangeSummary {
    pub fn from_records(records: &[ChangeRecord]) -> Self {
        let mut summary = Self::default();
        summary.absorb(records);
        summary
    }

    /// Add the counts of another batch (used per chunk)
    pub fn absorb(&mut self, records: &[ChangeRecord]) {
        for record in records {
            match record.status {
                IudStatus::Insert => self.inserts += 1,
                IudStatus::Update => self.updates += 1,
                IudStatus::Delete => self.deletes += 1,
            }
        }
    }

    pub fn total(&self) -> usize {
        self.inserts + self.updates + self.deletes
    }
}

/// Render a short text summary of a change set for console output.
pub fn render_human_summary(table: &str, summary: &ChangeSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("Table {} reconciled:\n", table));
    out.push_str(&format!("  inserted: {}\n", summary.inserts));
    out.push_str(&format!("  updated:  {}\n", summary.updates));
    out.push_str(&format!("  deleted:  {}\n", summary.deletes));
    if summary.total() == 0 {
        out.push_str("  (no rows)\n");
    }
    out
}
