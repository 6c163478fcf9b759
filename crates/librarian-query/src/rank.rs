//! Stage 4: rank candidates by lexical overlap, semantic cosine (when
//! embeddings are available), and affected-file proximity.

use std::path::{Path, PathBuf};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

#[derive(Debug, Clone)]
pub struct RankWeights {
    pub lexical: f32,
    pub semantic: f32,
    pub proximity: f32,
}

impl Default for RankWeights {
    fn default() -> Self {
        Self { lexical: 0.5, semantic: 0.3, proximity: 0.2 }
    }
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub pack_id: String,
    pub name: String,
    pub purpose: String,
    pub path: PathBuf,
    pub semantic_score: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub score: f32,
}

/// Lexical overlap of `intent`'s tokens against a candidate's name/purpose,
/// via the same fuzzy matcher the teacher declared but never wired up.
pub fn lexical_score(matcher: &SkimMatcherV2, intent: &str, candidate: &Candidate) -> f32 {
    let haystack = format!("{} {}", candidate.name, candidate.purpose);
    let best = intent
        .split_whitespace()
        .filter_map(|token| matcher.fuzzy_match(&haystack, token))
        .max()
        .unwrap_or(0);
    (best as f32 / 100.0).clamp(0.0, 1.0)
}

fn proximity_score(path: &Path, affected_files: &[PathBuf]) -> f32 {
    if affected_files.is_empty() {
        return 0.0;
    }
    if affected_files.iter().any(|f| f == path) {
        return 1.0;
    }
    let dir = path.parent();
    if affected_files.iter().any(|f| f.parent() == dir && dir.is_some()) {
        return 0.5;
    }
    0.0
}

/// Combines the three signals and sorts descending, breaking ties
/// lexicographically by `pack_id` so `deterministic=true` callers see a
/// stable order.
pub fn rank(
    intent: &str,
    candidates: Vec<Candidate>,
    affected_files: &[PathBuf],
    weights: &RankWeights,
) -> Vec<RankedCandidate> {
    let matcher = SkimMatcherV2::default();
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let lexical = lexical_score(&matcher, intent, &candidate);
            let semantic = candidate.semantic_score.unwrap_or(0.0);
            let proximity = proximity_score(&candidate.path, affected_files);
            let score = weights.lexical * lexical + weights.semantic * semantic + weights.proximity * proximity;
            RankedCandidate { candidate, score }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.candidate.pack_id.cmp(&b.candidate.pack_id))
    });
    ranked
}
