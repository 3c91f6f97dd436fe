//! Verdict counters for batch runs.

use std::sync::atomic::{AtomicU64, Ordering};

use dobverify_types::Verdict;

/// A thread-safe tally of verdicts, shared across batch workers.
#[derive(Debug, Default)]
pub struct VerdictTally {
    verified: AtomicU64,
    mismatch: AtomicU64,
    unreadable: AtomicU64,
    rejected: AtomicU64,
}

impl VerdictTally {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, verdict: Verdict) -> &AtomicU64 {
        match verdict {
            Verdict::Verified => &self.verified,
            Verdict::Mismatch => &self.mismatch,
            Verdict::Unreadable => &self.unreadable,
        }
    }

    pub fn record(&self, verdict: Verdict) {
        self.counter(verdict).fetch_add(1, Ordering::Relaxed);
    }

    /// Count a submission that never reached the pipeline (invalid input).
    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, verdict: Verdict) -> u64 {
        self.counter(verdict).load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.get(Verdict::Verified)
            + self.get(Verdict::Mismatch)
            + self.get(Verdict::Unreadable)
            + self.rejected()
    }

    /// One-line summary, e.g. `verified=2 mismatch=1 unreadable=0 rejected=0`.
    pub fn summary(&self) -> String {
        format!(
            "verified={} mismatch={} unreadable={} rejected={}",
            self.get(Verdict::Verified),
            self.get(Verdict::Mismatch),
            self.get(Verdict::Unreadable),
            self.rejected()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_verdict() {
        let tally = VerdictTally::new();
        tally.record(Verdict::Verified);
        tally.record(Verdict::Verified);
        tally.record(Verdict::Unreadable);
        tally.record_rejected();
        assert_eq!(tally.get(Verdict::Verified), 2);
        assert_eq!(tally.get(Verdict::Mismatch), 0);
        assert_eq!(tally.total(), 4);
        assert_eq!(
            tally.summary(),
            "verified=2 mismatch=0 unreadable=1 rejected=1"
        );
    }
}
