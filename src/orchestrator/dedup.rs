use std::collections::HashSet;
use std::sync::Mutex;

use crate::domain::JobRecord;

/// Run-scoped set of job fingerprints shared by every source task of one run.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: Mutex<HashSet<String>>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and records the job if its fingerprint has not been seen.
    pub fn admit(&self, job: &JobRecord) -> bool {
        let fingerprint = job.fingerprint();
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(fingerprint)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
