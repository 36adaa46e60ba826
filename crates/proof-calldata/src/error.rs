use thiserror::Error;

pub type Result<T> = std::result::Result<T, CalldataError>;

#[derive(Debug, Error)]
pub enum CalldataError {
    #[error("calldata item {index} is not an integer: {item:?}")]
    InvalidInteger { index: usize, item: String },

    #[error("groth16 calldata needs at least 8 fields, got {0}")]
    TooFewFields(usize),

    #[error("plonk calldata has no ',' separating the proof blob from the inputs")]
    MissingSeparator,

    #[error("plonk proof blob must be 0x-prefixed hex: {0}")]
    InvalidProofBlob(String),

    #[error("public input {0} is not an integer")]
    NonIntegerInput(usize),

    #[error("proof field `{0}` is missing")]
    MissingField(String),

    #[error("proof field `{0}` is not an integer")]
    NotAnInteger(String),

    #[error("unknown proof scheme '{0}', expected groth16 or plonk")]
    UnknownScheme(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
