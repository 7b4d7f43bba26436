use thiserror::Error;

use crate::LabelKey;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate label key: {0}")]
    DuplicateLabel(LabelKey),
}

pub type ModelResult<T> = Result<T, ModelError>;
