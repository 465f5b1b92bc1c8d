//! POSEIDON Test Utilities
//!
//! Shared test infrastructure for the POSEIDON workspace:
//! - Proptest generators for queries, journal records and search parameters
//! - Fixtures built on the builtin catalog
//! - Assertions for ranking and error invariants

use poseidon_core::{
    JournalRecord, PoseidonError, PoseidonResult, ScoredResult, SearchFilters, SearchParams,
    MAX_FIT_SCORE,
};

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for POSEIDON request and catalog types.

    use super::*;
    use proptest::prelude::*;

    /// Vocabulary drawn from the builtin catalog's tags and descriptions.
    pub const CATALOG_WORDS: &[&str] = &[
        "collaborative",
        "learning",
        "technology",
        "assessment",
        "artificial",
        "intelligence",
        "analytics",
        "mathematics",
        "literacy",
        "cognition",
        "instructional",
        "online",
        "AI",
        "CSCL",
        "협력학습",
        "교육공학",
    ];

    /// A single word, either catalog vocabulary or arbitrary lowercase text.
    pub fn arb_word() -> impl Strategy<Value = String> {
        prop_oneof![
            3 => proptest::sample::select(CATALOG_WORDS).prop_map(str::to_string),
            1 => "[a-z]{1,12}",
        ]
    }

    /// Free-form search query: words joined by one or more spaces, possibly empty.
    pub fn arb_query() -> impl Strategy<Value = String> {
        prop::collection::vec((arb_word(), "[ ]{1,3}"), 0..6).prop_map(|parts| {
            parts
                .into_iter()
                .map(|(word, sep)| format!("{}{}", word, sep))
                .collect::<String>()
        })
    }

    /// Arbitrary unicode text, including punctuation and whitespace runs.
    pub fn arb_noisy_query() -> impl Strategy<Value = String> {
        "\\PC{0,64}"
    }

    pub fn arb_discipline() -> impl Strategy<Value = String> {
        proptest::sample::select(&[
            "Learning Sciences",
            "Educational Technology",
            "AI in Education",
            "Science Education",
            "Education Policy",
        ][..])
        .prop_map(str::to_string)
    }

    pub fn arb_journal_record() -> impl Strategy<Value = JournalRecord> {
        (
            "[a-z]{2,10}",
            "[A-Za-z ]{4,40}",
            arb_discipline(),
            0.0f64..15.0,
            prop::collection::vec(arb_word(), 0..6),
            prop::collection::vec(arb_word(), 0..8),
        )
            .prop_map(|(id, name, discipline, impact_factor, tags, description)| {
                JournalRecord {
                    name_ko: format!("{} 저널", name),
                    id,
                    name,
                    discipline,
                    impact_factor,
                    description: description.join(" "),
                    scope_tags: tags,
                }
            })
    }

    pub fn arb_search_filters() -> impl Strategy<Value = SearchFilters> {
        (
            prop::option::of(prop::collection::vec(arb_discipline(), 0..3)),
            prop::option::of(0.0f64..8.0),
            prop::option::of(4.0f64..15.0),
        )
            .prop_map(|(discipline, min_impact_factor, max_impact_factor)| SearchFilters {
                discipline,
                min_impact_factor,
                max_impact_factor,
            })
    }

    pub fn arb_search_params() -> impl Strategy<Value = SearchParams> {
        (
            prop::option::of(arb_query()),
            prop::option::of(arb_search_filters()),
            prop::option::of(1usize..30),
            prop::option::of(0usize..15),
        )
            .prop_map(|(query, filters, limit, offset)| SearchParams {
                query,
                filters,
                limit,
                offset,
            })
    }

    /// Flat JSON object with distinct keys, for cache-key properties.
    pub fn arb_param_object() -> impl Strategy<Value = serde_json::Map<String, serde_json::Value>> {
        prop::collection::btree_map(
            "[a-z]{1,8}",
            prop_oneof![
                any::<i64>().prop_map(serde_json::Value::from),
                "[a-z ]{0,10}".prop_map(serde_json::Value::from),
                any::<bool>().prop_map(serde_json::Value::from),
            ],
            0..6,
        )
        .prop_map(|map| map.into_iter().collect())
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Ready-made values for common test scenarios.

    use super::*;
    use poseidon_storage::{Catalog, MockProvider, Provider};
    use std::sync::Arc;

    /// A fixed record that scores against "collaborative learning" queries.
    pub fn collaborative_record() -> JournalRecord {
        JournalRecord {
            id: "fixture-cscl".to_string(),
            name: "Fixture Journal of Collaborative Learning".to_string(),
            name_ko: "협력학습 픽스처 저널".to_string(),
            discipline: "Learning Sciences".to_string(),
            impact_factor: 3.2,
            description: "Research on collaborative learning in online settings".to_string(),
            scope_tags: vec![
                "Collaborative learning".to_string(),
                "CSCL".to_string(),
                "Online learning".to_string(),
            ],
        }
    }

    /// The builtin catalog, shared.
    pub fn builtin_catalog() -> PoseidonResult<Arc<Catalog>> {
        Catalog::builtin().map(Arc::new)
    }

    pub fn mock_provider() -> PoseidonResult<Provider> {
        Ok(Provider::Mock(MockProvider::new(builtin_catalog()?)))
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for POSEIDON-specific invariants.

    use super::*;

    /// Assert that every result is within the fit-score range.
    pub fn assert_scores_in_range(results: &[ScoredResult]) {
        for result in results {
            assert!(
                result.fit_score() <= MAX_FIT_SCORE,
                "fit score {} out of range for {}",
                result.fit_score(),
                result.journal.id
            );
        }
    }

    /// Assert that results are ordered by descending fit score.
    pub fn assert_sorted_by_score(results: &[ScoredResult]) {
        for pair in results.windows(2) {
            assert!(
                pair[0].fit_score() >= pair[1].fit_score(),
                "results out of order: {} ({}) before {} ({})",
                pair[0].journal.id,
                pair[0].fit_score(),
                pair[1].journal.id,
                pair[1].fit_score()
            );
        }
    }

    /// Assert that a result is a NotFound error.
    pub fn assert_not_found<T: std::fmt::Debug>(result: &PoseidonResult<T>) {
        match result {
            Err(PoseidonError::NotFound { .. }) => {}
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }
}

pub use assertions::*;
pub use fixtures::*;
pub use generators::*;
