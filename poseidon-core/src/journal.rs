//! Journal catalog types and the request/response shapes built from them.
//!
//! Every wire type serializes with camelCase field names so the JSON matches
//! what the web client already consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

// ============================================================================
// CATALOG ENTRIES
// ============================================================================

/// Immutable catalog entry. Loaded once at startup, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalRecord {
    /// Unique catalog identifier (e.g. `ijcscl`)
    pub id: String,
    /// English display name
    pub name: String,
    /// Korean display name
    pub name_ko: String,
    pub discipline: String,
    pub impact_factor: f64,
    pub description: String,
    /// Scope tags; order matters for matched-tag ordering.
    pub scope_tags: Vec<String>,
}

/// Trend keyword attached to a journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendKeyword {
    /// Korean keyword name
    pub name: String,
    pub name_en: String,
    /// Share of recent papers mentioning the keyword, in percent
    pub frequency: u32,
    /// Year-over-year growth, in percent (may be negative)
    pub growth: i32,
}

/// A journal together with its trend keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalDetail {
    #[serde(flatten)]
    pub journal: JournalRecord,
    pub trends: Vec<TrendKeyword>,
}

// ============================================================================
// SCORING RESULTS
// ============================================================================

/// Relevance of one journal to one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitScore {
    /// Always within `0..=100`
    pub fit_score: u8,
    /// At most three tags, in first-matched order
    pub matched_tags: Vec<String>,
    pub match_reason: String,
}

/// A search hit. `fit` is absent when the search ran without a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    #[serde(flatten)]
    pub journal: JournalRecord,
    #[serde(flatten)]
    pub fit: Option<FitScore>,
}

impl ScoredResult {
    pub fn scored(journal: JournalRecord, fit: FitScore) -> Self {
        Self {
            journal,
            fit: Some(fit),
        }
    }

    pub fn unscored(journal: JournalRecord) -> Self {
        Self { journal, fit: None }
    }

    /// Fit score, treating unscored results as zero.
    pub fn fit_score(&self) -> u8 {
        self.fit.as_ref().map(|f| f.fit_score).unwrap_or(0)
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

impl Pagination {
    pub fn new(total: usize, limit: usize, offset: usize) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset.saturating_add(limit) < total,
        }
    }

    /// Slice `items` according to this page's offset and limit.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.offset)
            .take(self.limit)
            .cloned()
            .collect()
    }
}

/// Pagination parameters for list operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl PageParams {
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self { limit, offset }
    }

    /// Resolve into a concrete page. A zero limit counts as "not given".
    pub fn resolve(&self, total: usize, default_limit: usize) -> Pagination {
        let limit = self.limit.filter(|l| *l > 0).unwrap_or(default_limit);
        Pagination::new(total, limit, self.offset.unwrap_or(0))
    }
}

/// One page of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalPage {
    pub data: Vec<JournalRecord>,
    pub pagination: Pagination,
    /// Only present (and true) when served from cache.
    #[serde(default, skip_serializing_if = "is_false")]
    pub cached: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ============================================================================
// SEARCH
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discipline: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_impact_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_impact_factor: Option<f64>,
}

impl SearchFilters {
    /// Whether a journal passes every configured filter.
    pub fn matches(&self, journal: &JournalRecord) -> bool {
        if let Some(disciplines) = self.discipline.as_ref().filter(|d| !d.is_empty()) {
            if !disciplines.iter().any(|d| d == &journal.discipline) {
                return false;
            }
        }
        if let Some(min) = self.min_impact_factor {
            if journal.impact_factor < min {
                return false;
            }
        }
        if let Some(max) = self.max_impact_factor {
            if journal.impact_factor > max {
                return false;
            }
        }
        true
    }
}

/// Body of `POST /journals/search`.
///
/// `query: None` means "no query given" and returns the catalog unscored;
/// `query: Some("")` is a real (empty) query and matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl SearchParams {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn page(&self) -> PageParams {
        PageParams::new(self.limit, self.offset)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredResult>,
    pub pagination: Pagination,
    pub cached: bool,
}

// ============================================================================
// BRIEF
// ============================================================================

/// Generated briefing text for one journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brief {
    pub journal_id: String,
    pub journal_name: String,
    pub journal_name_ko: String,
    pub brief: String,
    pub generated_at: Timestamp,
}
