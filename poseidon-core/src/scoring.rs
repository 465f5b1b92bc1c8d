//! Lexical fit scoring between a free-text query and a catalog entry.
//!
//! The score is a heuristic, not a ranking model:
//! - 20 points per (scope tag, query term) pair that overlaps
//! - 10 points per query term found in the name or description
//! - a deterministic per-journal offset (`first char of id % 15`)
//!
//! The sum is clamped to `0..=100`.

use crate::journal::{FitScore, JournalRecord, ScoredResult};

/// Highest possible fit score.
pub const MAX_FIT_SCORE: u8 = 100;

/// Results at or below this score are dropped from search results.
pub const SEARCH_SCORE_THRESHOLD: u8 = 20;

/// Match reason used when no scope tag matched.
pub const FALLBACK_MATCH_REASON: &str = "일반적 적합성";

const TAG_MATCH_POINTS: u32 = 20;
const TEXT_MATCH_POINTS: u32 = 10;
const TAG_PREFIX_CHARS: usize = 4;
const MAX_MATCHED_TAGS: usize = 3;
const ID_OFFSET_MODULUS: u32 = 15;

/// Split a query into lowercase terms, dropping single-character terms.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|term| term.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Score one journal against a query.
pub fn score(record: &JournalRecord, query: &str) -> FitScore {
    score_terms(record, &query_terms(query))
}

fn score_terms(record: &JournalRecord, terms: &[String]) -> FitScore {
    let mut points: u32 = 0;
    let mut matched_tags: Vec<&str> = Vec::new();

    for tag in &record.scope_tags {
        let tag_lower = tag.to_lowercase();
        let tag_prefix: String = tag_lower.chars().take(TAG_PREFIX_CHARS).collect();

        for term in terms {
            if tag_lower.contains(term.as_str()) || term.contains(tag_prefix.as_str()) {
                points += TAG_MATCH_POINTS;
                if !matched_tags.contains(&tag.as_str()) {
                    matched_tags.push(tag);
                }
            }
        }
    }

    let name_description = format!("{} {}", record.name, record.description).to_lowercase();
    let text_hits = terms
        .iter()
        .filter(|term| name_description.contains(term.as_str()))
        .count() as u32;
    points += text_hits * TEXT_MATCH_POINTS;

    let total = points
        .saturating_add(id_offset(&record.id))
        .min(u32::from(MAX_FIT_SCORE));

    let match_reason = match matched_tags.first() {
        Some(tag) => format!("{} 관련 연구에 적합", tag),
        None => FALLBACK_MATCH_REASON.to_string(),
    };

    FitScore {
        fit_score: total as u8,
        matched_tags: matched_tags
            .into_iter()
            .take(MAX_MATCHED_TAGS)
            .map(str::to_string)
            .collect(),
        match_reason,
    }
}

/// Stable per-journal tie-breaker derived from the first character of the id.
fn id_offset(id: &str) -> u32 {
    id.chars()
        .next()
        .map(|c| u32::from(c) % ID_OFFSET_MODULUS)
        .unwrap_or(0)
}

/// Score every record, drop weak matches and order by descending fit score.
///
/// The sort is stable, so equal scores keep catalog order. A query with no
/// usable terms (empty, whitespace, single letters) yields no results.
pub fn rank<'a, I>(records: I, query: &str) -> Vec<ScoredResult>
where
    I: IntoIterator<Item = &'a JournalRecord>,
{
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<ScoredResult> = records
        .into_iter()
        .map(|record| ScoredResult::scored(record.clone(), score_terms(record, &terms)))
        .filter(|result| result.fit_score() > SEARCH_SCORE_THRESHOLD)
        .collect();

    results.sort_by(|a, b| b.fit_score().cmp(&a.fit_score()));
    results
}
