//! Alignment observers: hooks for logging, profiling, and debugging.
//!
//! Observers are notified after every match pass and once per finished
//! alignment, without coupling to the pass logic. Callbacks take `&self` so a
//! single observer can be shared across the worker threads of a
//! [`crate::batch::BatchAligner`]; implementations keep their state behind
//! atomics or a mutex.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Alignment, MatchPass};

/// Receives notifications while an alignment runs.
///
/// Both methods default to doing nothing.
pub trait AlignmentObserver {
    /// Called after `pass` finished, with the number of pairs it created
    fn on_pass(&self, _pass: MatchPass, _matched: usize) {}

    /// Called once with the final alignment for the pair `pair_id`
    fn on_alignment(&self, _pair_id: &str, _alignment: &Alignment) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl AlignmentObserver for NoopObserver {}

/// Keeps a copy of every finished alignment, tagged by pair id.
///
/// Snapshots are stored in completion order, which is not input order when
/// a batch runs in parallel.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    snapshots: Mutex<Vec<(String, Alignment)>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, Alignment)>> {
        // A panicking observer call cannot leave the vector half-written.
        self.snapshots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of everything collected so far
    pub fn snapshots(&self) -> Vec<(String, Alignment)> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drain the collected alignments
    pub fn take(&self) -> Vec<(String, Alignment)> {
        std::mem::take(&mut *self.lock())
    }
}

impl AlignmentObserver for CollectingObserver {
    fn on_alignment(&self, pair_id: &str, alignment: &Alignment) {
        self.lock().push((pair_id.to_string(), alignment.clone()));
    }
}

/// Thread-safe tally of pairs created per match pass
#[derive(Debug, Default)]
pub struct PassTallyObserver {
    per_pass: [AtomicUsize; 7],
    alignments: AtomicUsize,
}

impl PassTallyObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairs created by `pass` across all observed alignments
    pub fn count(&self, pass: MatchPass) -> usize {
        self.per_pass[pass.index()].load(Ordering::Relaxed)
    }

    /// Pairs created by all passes
    pub fn total(&self) -> usize {
        self.per_pass
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }

    /// Number of finished alignments observed
    pub fn alignments(&self) -> usize {
        self.alignments.load(Ordering::Relaxed)
    }
}

impl AlignmentObserver for PassTallyObserver {
    fn on_pass(&self, pass: MatchPass, matched: usize) {
        self.per_pass[pass.index()].fetch_add(matched, Ordering::Relaxed);
    }

    fn on_alignment(&self, _pair_id: &str, _alignment: &Alignment) {
        self.alignments.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::KeyphraseAligner;
    use crate::types::{KeySpan, PosTag, Sentence};

    fn run(observer: &dyn AlignmentObserver, pair_id: &str) -> Alignment {
        let premise = Sentence::from_tagged(&[
            ("dog", "dog", PosTag::Noun),
            ("barks", "bark", PosTag::Verb),
        ]);
        let conclusion = Sentence::from_tagged(&[
            ("puppy", "puppy", PosTag::Noun),
            ("barks", "bark", PosTag::Verb),
        ]);
        let spans = [KeySpan::single(0), KeySpan::single(1)];
        KeyphraseAligner::new()
            .align_observed(pair_id, &premise, &spans, &conclusion, &spans, observer)
            .unwrap()
    }

    #[test]
    fn test_noop_observer() {
        let alignment = run(&NoopObserver, "p0");
        assert_eq!(alignment.aligned().count(), 2);
    }

    #[test]
    fn test_collecting_observer() {
        let observer = CollectingObserver::new();
        assert!(observer.is_empty());
        let alignment = run(&observer, "p0");
        run(&observer, "p1");

        assert_eq!(observer.len(), 2);
        let snapshots = observer.snapshots();
        assert_eq!(snapshots[0].0, "p0");
        assert_eq!(snapshots[0].1, alignment);

        let taken = observer.take();
        assert_eq!(taken.len(), 2);
        assert!(observer.is_empty());
    }

    #[test]
    fn test_pass_tally_observer() {
        let observer = PassTallyObserver::new();
        run(&observer, "p0");
        // "bark" matches exactly; "dog" / "puppy" is filled in by position.
        assert_eq!(observer.count(MatchPass::Exact), 1);
        assert_eq!(observer.count(MatchPass::PositionalFallback), 1);
        assert_eq!(observer.count(MatchPass::ManyToMany), 0);
        assert_eq!(observer.total(), 2);
        assert_eq!(observer.alignments(), 1);
    }
}
