//! Per-item batch operation reporting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Outcome report for a batch mutation.
///
/// Batch operations process members independently; partial success is never
/// indistinguishable from total failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Members processed successfully
    pub succeeded: usize,
    /// Members that failed
    pub failed: usize,
    /// Per-id failure messages
    pub errors: BTreeMap<Uuid, String>,
}

impl BatchReport {
    /// Record one successful member.
    pub fn record_ok(&mut self) {
        self.succeeded += 1;
    }

    /// Record one failed member with its message.
    pub fn record_err(&mut self, id: Uuid, message: impl Into<String>) {
        self.failed += 1;
        self.errors.insert(id, message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_track_recorded_outcomes() {
        let mut report = BatchReport::default();
        report.record_ok();
        report.record_ok();
        let missing = Uuid::new_v4();
        report.record_err(missing, "Asset not found");

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(
            report.errors.get(&missing).map(String::as_str),
            Some("Asset not found")
        );
    }
}
