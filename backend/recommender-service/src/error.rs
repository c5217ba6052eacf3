use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommendError>;

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl RecommendError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        RecommendError::NotFound { entity, id }
    }
}
