//! Working set of evaluated candidates for the current screening session.
//!
//! The collection is plain local state. Network sequencing for deletes lives in
//! [`crate::candidates::manager`]; this module only tracks which entries exist,
//! which of them have a delete in flight, and how they are presented.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::candidates::models::{Candidate, SortKey};
use crate::candidates::stats::CollectionStats;
use crate::errors::Rejection;

/// Per-candidate deletion lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionState {
    #[default]
    Idle,
    Deleting,
}

#[derive(Debug, Clone)]
struct Entry {
    candidate: Candidate,
    deletion: DeletionState,
}

/// A candidate positioned in a sorted view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    /// 1-based position in the view.
    pub rank: usize,
    pub candidate: Candidate,
    pub deleting: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateCollection {
    entries: Vec<Entry>,
    analyzed_at: Option<DateTime<Utc>>,
    sort_key: SortKey,
    expanded: Option<String>,
}

impl CandidateCollection {
    /// Replaces the working set with a fresh match result.
    ///
    /// Arrival order is kept. A repeated `resume_id` keeps its first occurrence.
    pub fn seed(&mut self, candidates: Vec<Candidate>) -> usize {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            if !seen.insert(candidate.resume_id.clone()) {
                warn!(
                    resume_id = %candidate.resume_id,
                    "Dropping duplicate candidate from match result"
                );
                continue;
            }
            entries.push(Entry {
                candidate,
                deletion: DeletionState::Idle,
            });
        }

        self.entries = entries;
        self.analyzed_at = Some(Utc::now());
        self.expanded = None;
        self.entries.len()
    }

    /// True once a match result has been received, even if every candidate
    /// has since been deleted.
    pub fn is_seeded(&self) -> bool {
        self.analyzed_at.is_some()
    }

    pub fn analyzed_at(&self) -> Option<DateTime<Utc>> {
        self.analyzed_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, resume_id: &str) -> bool {
        self.position(resume_id).is_some()
    }

    pub fn get(&self, resume_id: &str) -> Option<&Candidate> {
        self.position(resume_id).map(|i| &self.entries[i].candidate)
    }

    /// Candidates in arrival order.
    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter().map(|e| &e.candidate)
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
    }

    /// The collection ranked by the currently selected sort key.
    pub fn view(&self) -> Vec<RankedCandidate> {
        self.sorted_view(self.sort_key)
    }

    /// A freshly ordered copy, highest score first. Stored order is untouched.
    pub fn sorted_view(&self, key: SortKey) -> Vec<RankedCandidate> {
        let mut ordered: Vec<&Entry> = self.entries.iter().collect();
        ordered.sort_by(|a, b| key.compare(&a.candidate, &b.candidate));

        ordered
            .into_iter()
            .enumerate()
            .map(|(i, entry)| RankedCandidate {
                rank: i + 1,
                candidate: entry.candidate.clone(),
                deleting: entry.deletion == DeletionState::Deleting,
                expanded: self.expanded.as_deref() == Some(entry.candidate.resume_id.as_str()),
            })
            .collect()
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// Expands `resume_id`, or collapses it if it is already expanded.
    /// Expanding one candidate collapses any other. Returns the new expanded state.
    pub fn toggle_expanded(&mut self, resume_id: &str) -> Result<bool, Rejection> {
        if !self.contains(resume_id) {
            return Err(Rejection::UnknownCandidate(resume_id.to_string()));
        }
        if self.expanded.as_deref() == Some(resume_id) {
            self.expanded = None;
            Ok(false)
        } else {
            self.expanded = Some(resume_id.to_string());
            Ok(true)
        }
    }

    pub fn deletion_state(&self, resume_id: &str) -> Option<DeletionState> {
        self.position(resume_id).map(|i| self.entries[i].deletion)
    }

    pub fn has_pending_deletes(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.deletion == DeletionState::Deleting)
    }

    /// Moves `resume_id` from Idle to Deleting.
    pub fn begin_delete(&mut self, resume_id: &str) -> Result<(), Rejection> {
        let index = self
            .position(resume_id)
            .ok_or_else(|| Rejection::UnknownCandidate(resume_id.to_string()))?;
        let entry = &mut self.entries[index];
        if entry.deletion == DeletionState::Deleting {
            return Err(Rejection::DeleteInFlight(resume_id.to_string()));
        }
        entry.deletion = DeletionState::Deleting;
        Ok(())
    }

    /// Settles an in-flight delete: removes the entry when the remote delete
    /// succeeded, otherwise returns it to Idle with its fields untouched.
    pub fn finish_delete(&mut self, resume_id: &str, succeeded: bool) -> Option<Candidate> {
        let index = self.position(resume_id)?;
        if !succeeded {
            self.entries[index].deletion = DeletionState::Idle;
            return None;
        }

        if self.expanded.as_deref() == Some(resume_id) {
            self.expanded = None;
        }
        Some(self.entries.remove(index).candidate)
    }

    pub fn stats(&self) -> CollectionStats {
        CollectionStats::from_candidates(self.candidates())
    }

    /// Forgets everything, including whether a result was ever received.
    pub fn clear(&mut self) {
        *self = CandidateCollection::default();
    }

    fn position(&self, resume_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.candidate.resume_id == resume_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::models::fixtures::candidate;

    fn seeded(candidates: Vec<Candidate>) -> CandidateCollection {
        let mut collection = CandidateCollection::default();
        collection.seed(candidates);
        collection
    }

    fn ids(view: &[RankedCandidate]) -> Vec<&str> {
        view.iter().map(|r| r.candidate.resume_id.as_str()).collect()
    }

    #[test]
    fn test_sorted_view_is_descending_and_non_mutating() {
        let collection = seeded(vec![
            candidate("low", 3.2, 0.0, 0.0),
            candidate("high", 9.1, 0.0, 0.0),
            candidate("mid", 6.0, 0.0, 0.0),
        ]);

        let first = collection.sorted_view(SortKey::OverallScore);
        let scores: Vec<f64> = first.iter().map(|r| r.candidate.overall_score).collect();
        assert_eq!(scores, vec![9.1, 6.0, 3.2]);

        let second = collection.sorted_view(SortKey::OverallScore);
        assert_eq!(first, second);

        let stored: Vec<&str> = collection.candidates().map(|c| c.resume_id.as_str()).collect();
        assert_eq!(stored, vec!["low", "high", "mid"]);
    }

    #[test]
    fn test_sorted_view_by_each_metric() {
        let collection = seeded(vec![
            candidate("A", 9.0, 5.0, 1.0),
            candidate("B", 5.0, 6.0, 9.0),
        ]);

        assert_eq!(ids(&collection.sorted_view(SortKey::OverallScore)), vec!["A", "B"]);
        assert_eq!(ids(&collection.sorted_view(SortKey::SkillsScore)), vec!["B", "A"]);
        assert_eq!(ids(&collection.sorted_view(SortKey::ExperienceScore)), vec!["B", "A"]);
    }

    #[test]
    fn test_view_assigns_ranks_and_uses_selected_key() {
        let mut collection = seeded(vec![
            candidate("A", 9.0, 5.0, 1.0),
            candidate("B", 5.0, 6.0, 9.0),
        ]);
        collection.set_sort_key(SortKey::ExperienceScore);

        let view = collection.view();
        assert_eq!(ids(&view), vec!["B", "A"]);
        assert_eq!(view[0].rank, 1);
        assert_eq!(view[1].rank, 2);
    }

    #[test]
    fn test_seed_drops_duplicate_ids() {
        let mut collection = CandidateCollection::default();
        let count = collection.seed(vec![
            candidate("A", 9.0, 0.0, 0.0),
            candidate("A", 1.0, 0.0, 0.0),
            candidate("B", 5.0, 0.0, 0.0),
        ]);

        assert_eq!(count, 2);
        assert_eq!(collection.get("A").unwrap().overall_score, 9.0);
    }

    #[test]
    fn test_seeded_empty_differs_from_never_seeded() {
        let mut collection = seeded(vec![candidate("A", 9.0, 0.0, 0.0)]);
        collection.begin_delete("A").unwrap();
        collection.finish_delete("A", true);

        assert!(collection.is_empty());
        assert!(collection.is_seeded());
        assert!(!CandidateCollection::default().is_seeded());
    }

    #[test]
    fn test_delete_success_removes_exactly_one() {
        let mut collection = seeded(vec![
            candidate("A", 9.0, 0.0, 0.0),
            candidate("B", 5.0, 0.0, 0.0),
            candidate("C", 7.0, 0.0, 0.0),
        ]);
        let before_b = collection.get("B").cloned();
        let before_c = collection.get("C").cloned();

        collection.begin_delete("A").unwrap();
        let removed = collection.finish_delete("A", true).unwrap();

        assert_eq!(removed.resume_id, "A");
        let stored: Vec<&str> = collection.candidates().map(|c| c.resume_id.as_str()).collect();
        assert_eq!(stored, vec!["B", "C"]);
        assert_eq!(collection.get("B").cloned(), before_b);
        assert_eq!(collection.get("C").cloned(), before_c);
    }

    #[test]
    fn test_delete_failure_returns_entry_to_idle() {
        let mut collection = seeded(vec![candidate("A", 9.0, 0.0, 0.0)]);

        collection.begin_delete("A").unwrap();
        assert_eq!(collection.deletion_state("A"), Some(DeletionState::Deleting));
        assert!(collection.sorted_view(SortKey::OverallScore)[0].deleting);

        assert!(collection.finish_delete("A", false).is_none());
        assert_eq!(collection.deletion_state("A"), Some(DeletionState::Idle));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_second_begin_delete_is_rejected() {
        let mut collection = seeded(vec![candidate("A", 9.0, 0.0, 0.0)]);
        collection.begin_delete("A").unwrap();

        assert_eq!(
            collection.begin_delete("A"),
            Err(Rejection::DeleteInFlight("A".to_string()))
        );
        assert_eq!(
            collection.begin_delete("Z"),
            Err(Rejection::UnknownCandidate("Z".to_string()))
        );
    }

    #[test]
    fn test_toggle_expanded_is_exclusive_and_keyed_by_id() {
        let mut collection = seeded(vec![
            candidate("A", 9.0, 0.0, 0.0),
            candidate("B", 5.0, 0.0, 0.0),
        ]);

        assert_eq!(collection.toggle_expanded("B"), Ok(true));
        assert_eq!(collection.toggle_expanded("A"), Ok(true));
        assert_eq!(collection.expanded(), Some("A"));

        // Re-sorting keeps the same candidate expanded.
        let view = collection.sorted_view(SortKey::SkillsScore);
        let expanded: Vec<&str> = view
            .iter()
            .filter(|r| r.expanded)
            .map(|r| r.candidate.resume_id.as_str())
            .collect();
        assert_eq!(expanded, vec!["A"]);

        assert_eq!(collection.toggle_expanded("A"), Ok(false));
        assert_eq!(collection.expanded(), None);
    }

    #[test]
    fn test_deleting_expanded_candidate_collapses_it() {
        let mut collection = seeded(vec![candidate("A", 9.0, 0.0, 0.0)]);
        collection.toggle_expanded("A").unwrap();
        collection.begin_delete("A").unwrap();
        collection.finish_delete("A", true);
        assert_eq!(collection.expanded(), None);
    }

    #[test]
    fn test_clear_resets_to_default() {
        let mut collection = seeded(vec![candidate("A", 9.0, 0.0, 0.0)]);
        collection.set_sort_key(SortKey::SkillsScore);
        collection.clear();

        assert!(collection.is_empty());
        assert!(!collection.is_seeded());
        assert_eq!(collection.sort_key(), SortKey::OverallScore);
    }
}
