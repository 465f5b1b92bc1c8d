use thiserror::Error;

/// Errors raised by the catalog, providers and scoring layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoseidonError {
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Catalog error: {reason}")]
    Catalog { reason: String },
}

impl PoseidonError {
    pub fn journal_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Journal",
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type PoseidonResult<T> = Result<T, PoseidonError>;
