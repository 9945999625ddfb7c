use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{field} {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },
    #[error("corrupt data in {document}: {reason}")]
    CorruptData { document: String, reason: String },
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn missing(field: &'static str) -> Self {
        StoreError::Validation {
            field,
            reason: "is required",
        }
    }

    pub fn corrupt(document: impl Into<String>, reason: impl ToString) -> Self {
        StoreError::CorruptData {
            document: document.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation { .. })
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::CorruptData { .. })
    }
}
