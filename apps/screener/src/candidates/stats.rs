use serde::Serialize;

use crate::candidates::models::{Candidate, Recommendation};

/// Headline numbers shown above the candidate list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub highly_recommended: usize,
    pub recommended: usize,
    /// Mean overall score, 0.0 for an empty collection.
    pub average_overall: f64,
}

impl CollectionStats {
    pub fn from_candidates<'a, I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = &'a Candidate>,
    {
        let mut total = 0;
        let mut highly_recommended = 0;
        let mut recommended = 0;
        let mut score_sum = 0.0_f64;

        for candidate in candidates {
            total += 1;
            score_sum += candidate.overall_score;
            match candidate.recommendation {
                Recommendation::HighlyRecommended => highly_recommended += 1,
                Recommendation::Recommended => recommended += 1,
                _ => {}
            }
        }

        let average_overall = if total > 0 {
            score_sum / total as f64
        } else {
            0.0
        };

        CollectionStats {
            total,
            highly_recommended,
            recommended,
            average_overall,
        }
    }

    /// Average rounded to one decimal, as displayed.
    pub fn average_display(&self) -> String {
        format!("{:.1}", self.average_overall)
    }
}
