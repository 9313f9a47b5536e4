use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemStoreError {
    #[error("ordinal {ordinal} of proposal {proposal} is already assigned")]
    OrdinalTaken { proposal: u64, ordinal: u32 },

    #[error("snapshot encoding failed: {0}")]
    Encode(String),

    #[error("snapshot decoding failed: {0}")]
    Decode(String),
}

impl From<MemStoreError> for cohort_store::StoreError {
    fn from(e: MemStoreError) -> Self {
        match e {
            MemStoreError::OrdinalTaken { .. } => cohort_store::StoreError::Duplicate(e.to_string()),
            MemStoreError::Encode(_) | MemStoreError::Decode(_) => {
                cohort_store::StoreError::Serialization(e.to_string())
            }
        }
    }
}

impl From<bincode::Error> for MemStoreError {
    fn from(e: bincode::Error) -> Self {
        MemStoreError::Decode(e.to_string())
    }
}
