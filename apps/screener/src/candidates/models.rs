use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder the screening service writes when it could not extract a phone number.
const PHONE_NOT_FOUND: &str = "Not Found";

/// One evaluated resume as returned by the match endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub resume_id: String,
    pub candidate_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub filename: String,
    pub overall_score: f64,
    pub skills_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    #[serde(default)]
    pub justification: String,
}

impl Candidate {
    /// Phone number worth displaying; the service's "Not Found" marker counts as absent.
    pub fn contact_phone(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty() && *p != PHONE_NOT_FOUND)
    }

    /// First `limit` skills plus how many were left out.
    pub fn skills_preview(&self, limit: usize) -> (&[String], usize) {
        let shown = self.skills.len().min(limit);
        (&self.skills[..shown], self.skills.len() - shown)
    }

    pub fn score_tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.overall_score)
    }
}

/// Hiring recommendation label assigned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Highly Recommended")]
    HighlyRecommended,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Maybe")]
    Maybe,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
    /// Any label outside the fixed set.
    #[serde(other)]
    Unrecognized,
}

impl Recommendation {
    /// Label used for display. Unrecognized labels are presented as "Maybe".
    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::HighlyRecommended => "Highly Recommended",
            Recommendation::Recommended => "Recommended",
            Recommendation::Maybe | Recommendation::Unrecognized => "Maybe",
            Recommendation::NotRecommended => "Not Recommended",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metric a candidate list is ranked by. Always descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    OverallScore,
    SkillsScore,
    ExperienceScore,
}

impl SortKey {
    pub fn score_of(&self, candidate: &Candidate) -> f64 {
        match self {
            SortKey::OverallScore => candidate.overall_score,
            SortKey::SkillsScore => candidate.skills_score,
            SortKey::ExperienceScore => candidate.experience_score,
        }
    }

    /// Descending comparison of two candidates on this metric.
    pub fn compare(&self, a: &Candidate, b: &Candidate) -> Ordering {
        self.score_of(b).total_cmp(&self.score_of(a))
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::OverallScore => "Overall Score",
            SortKey::SkillsScore => "Skills Score",
            SortKey::ExperienceScore => "Experience Score",
        }
    }
}

/// Coarse band of a 0–10 score, used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Excellent, // ≥ 8
    Good,      // ≥ 6
    Fair,      // ≥ 4
    Poor,
}

impl ScoreTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 8.0 {
            ScoreTier::Excellent
        } else if score >= 6.0 {
            ScoreTier::Good
        } else if score >= 4.0 {
            ScoreTier::Fair
        } else {
            ScoreTier::Poor
        }
    }
}
