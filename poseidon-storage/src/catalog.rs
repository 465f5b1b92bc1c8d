//! Static journal catalog and trend data.
//!
//! The catalog ships inside the binary (`data/catalog.json`) and is parsed
//! once at startup. Nothing mutates it afterwards, so it is shared behind an
//! `Arc` by every provider clone.

use poseidon_core::{JournalDetail, JournalRecord, PoseidonError, PoseidonResult, TrendKeyword};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    journals: Vec<JournalRecord>,
    trends: HashMap<String, Vec<TrendKeyword>>,
}

#[derive(Deserialize)]
struct CatalogFile {
    journals: Vec<JournalRecord>,
    #[serde(default)]
    trends: HashMap<String, Vec<TrendKeyword>>,
}

impl Catalog {
    /// Parse the catalog embedded at compile time.
    pub fn builtin() -> PoseidonResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> PoseidonResult<Self> {
        let file: CatalogFile = serde_json::from_str(json).map_err(|e| PoseidonError::Catalog {
            reason: format!("failed to parse catalog: {}", e),
        })?;
        Self::from_parts(file.journals, file.trends)
    }

    /// Build a catalog, rejecting duplicate journal ids.
    pub fn from_parts(
        journals: Vec<JournalRecord>,
        trends: HashMap<String, Vec<TrendKeyword>>,
    ) -> PoseidonResult<Self> {
        let mut seen = HashSet::with_capacity(journals.len());
        for journal in &journals {
            if !seen.insert(journal.id.as_str()) {
                return Err(PoseidonError::Catalog {
                    reason: format!("duplicate journal id '{}'", journal.id),
                });
            }
        }
        Ok(Self { journals, trends })
    }

    /// All journals in catalog order.
    pub fn journals(&self) -> &[JournalRecord] {
        &self.journals
    }

    pub fn len(&self) -> usize {
        self.journals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.journals.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&JournalRecord> {
        self.journals.iter().find(|j| j.id == id)
    }

    /// Trend keywords for a journal, empty when none are recorded.
    pub fn trends_for(&self, id: &str) -> &[TrendKeyword] {
        self.trends.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// A journal with its trends attached.
    pub fn detail(&self, id: &str) -> Option<JournalDetail> {
        self.get(id).map(|journal| JournalDetail {
            journal: journal.clone(),
            trends: self.trends_for(id).to_vec(),
        })
    }
}
