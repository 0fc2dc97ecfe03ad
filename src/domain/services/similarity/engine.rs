//--------------------------------------------------------------------------------------------------
// FUNCTIONS
//--------------------------------------------------------------------------------------------------
// | Name           | Description                                           | Return Type           |
// |----------------|-------------------------------------------------------|-----------------------|
// | score          | Heuristic similarity of one candidate to the target   | u8                    |
// | rank           | Scored, filtered, ordered and capped candidate list   | Vec<SimilarityResult> |
//--------------------------------------------------------------------------------------------------

use std::collections::HashSet;

use crate::domain::models::{CourseSnapshot, SimilarityResult};

/// Points for an exact, non-empty category match
pub const CATEGORY_MATCH_POINTS: u32 = 50;
/// Points per tag shared with the target
pub const TAG_MATCH_POINTS: u32 = 10;
/// Points per description word shared with the target
pub const DESCRIPTION_WORD_POINTS: u32 = 2;
/// Upper bound on the description contribution
pub const DESCRIPTION_POINTS_CAP: u32 = 30;
/// Upper bound on the total score
pub const MAX_SCORE: u32 = 100;
/// Number of results returned by [`rank`]
pub const MAX_RESULTS: usize = 5;

/// Scores `candidate` against `target`.
///
/// The score is the sum of three bounded contributions, clamped to `0..=100`:
/// * category: +50 when both categories are present, non-empty and equal
/// * tags: +10 for every candidate tag that also appears on the target
/// * description: +2 per word shared by both descriptions (lower-cased, whitespace split,
///   compared as sets), capped at 30; skipped unless both descriptions are non-empty
pub fn score(target: &CourseSnapshot, candidate: &CourseSnapshot) -> u8 {
    let total = category_points(target, candidate)
        + tag_points(target, candidate)
        + description_points(target, candidate);

    total.min(MAX_SCORE) as u8
}

/// Ranks `candidates` by similarity to `target`.
///
/// The target itself (matched by id) and zero-score candidates are excluded. Remaining
/// candidates are sorted by descending score; ties keep their input order. At most
/// [`MAX_RESULTS`] entries are returned. Empty input yields an empty list.
pub fn rank(target: &CourseSnapshot, candidates: Vec<CourseSnapshot>) -> Vec<SimilarityResult> {
    let mut results: Vec<SimilarityResult> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != target.id)
        .filter_map(|candidate| {
            let similarity_score = score(target, &candidate);
            (similarity_score > 0).then(|| SimilarityResult::new(candidate, similarity_score))
        })
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| b.similarity_score.cmp(&a.similarity_score));
    results.truncate(MAX_RESULTS);

    results
}

fn category_points(target: &CourseSnapshot, candidate: &CourseSnapshot) -> u32 {
    match (non_empty(&target.category), non_empty(&candidate.category)) {
        (Some(a), Some(b)) if a == b => CATEGORY_MATCH_POINTS,
        _ => 0,
    }
}

fn tag_points(target: &CourseSnapshot, candidate: &CourseSnapshot) -> u32 {
    let (Some(target_tags), Some(candidate_tags)) = (&target.tags, &candidate.tags) else {
        return 0;
    };

    let target_tags: HashSet<&str> = target_tags.iter().map(String::as_str).collect();
    // duplicates on the candidate each count
    let common = candidate_tags
        .iter()
        .filter(|tag| target_tags.contains(tag.as_str()))
        .count() as u32;

    common * TAG_MATCH_POINTS
}

fn description_points(target: &CourseSnapshot, candidate: &CourseSnapshot) -> u32 {
    let (Some(a), Some(b)) = (non_empty(&target.description), non_empty(&candidate.description))
    else {
        return 0;
    };

    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    let common = words_a.intersection(&words_b).count() as u32;

    (common * DESCRIPTION_WORD_POINTS).min(DESCRIPTION_POINTS_CAP)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
