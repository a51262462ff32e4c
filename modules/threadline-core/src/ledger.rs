use std::collections::HashSet;
use std::sync::Mutex;

/// Set of post ids already expanded, shared across the concurrent walks
/// of one session.
///
/// Claiming an id and recording it happen in one critical section, so a
/// post that appears under two ancestors (or a reply cycle) is expanded
/// exactly once no matter how the walks interleave. There is no
/// eviction: construct a fresh ledger per logical session and drop it
/// when the session ends, otherwise ids seen in an earlier, unrelated
/// request would suppress expansion in later ones.
#[derive(Debug, Default)]
pub struct VisitedLedger {
    seen: Mutex<HashSet<String>>,
}

impl VisitedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically check-and-insert. Returns true if the id was not
    /// previously present (the caller now owns its expansion).
    pub fn try_claim(&self, id: &str) -> bool {
        self.seen
            .lock()
            .expect("ledger lock poisoned")
            .insert(id.to_string())
    }

    /// Number of ids claimed so far.
    pub fn claimed(&self) -> usize {
        self.seen.lock().expect("ledger lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_claim_wins_second_loses() {
        let ledger = VisitedLedger::new();
        assert!(ledger.try_claim("100"));
        assert!(!ledger.try_claim("100"));
        assert!(ledger.try_claim("200"));
        assert_eq!(ledger.claimed(), 2);
    }

    #[test]
    fn concurrent_claims_admit_exactly_one_winner_per_id() {
        let ledger = Arc::new(VisitedLedger::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = ledger.clone();
            handles.push(std::thread::spawn(move || {
                (0..100).filter(|i| ledger.try_claim(&i.to_string())).count()
            }));
        }
        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 100);
        assert_eq!(ledger.claimed(), 100);
    }
}
