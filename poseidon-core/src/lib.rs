//! POSEIDON Core - Journal Types and Fit Scoring
//!
//! Pure data structures plus the lexical fit-scoring heuristic.
//! All other crates depend on this one; it performs no I/O.

pub mod error;
pub mod journal;
pub mod scoring;

pub use error::{PoseidonError, PoseidonResult};
pub use journal::{
    Brief, FitScore, JournalDetail, JournalPage, JournalRecord, PageParams, Pagination,
    ScoredResult, SearchFilters, SearchParams, SearchResponse, Timestamp, TrendKeyword,
};
pub use scoring::{
    query_terms, rank, score, FALLBACK_MATCH_REASON, MAX_FIT_SCORE, SEARCH_SCORE_THRESHOLD,
};
