use thiserror::Error;

use actuator_model::ModelError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid rule conditions: {0}")]
    Model(#[from] ModelError),
}

pub type CoreResult<T> = Result<T, CoreError>;
