use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity}_NOT_FOUND")]
    NotFound { entity: &'static str, id: u32 },
    #[error("{0}")]
    Validation(&'static str),
    #[error("{0}")]
    Internal(&'static str),
    #[error("SERIALIZATION_FAILED")]
    Serialization(#[from] serde_json::Error),
    #[error("STORAGE_FAILED")]
    Storage(#[from] std::io::Error),
    #[error("EXPORT_FAILED")]
    Export(#[from] csv::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: u32) -> StoreError {
        StoreError::NotFound { entity, id }
    }
}
