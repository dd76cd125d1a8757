use thiserror::Error;

use crate::types::{ItemId, UserId};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("user id {0} is listed more than once")]
    DuplicateUser(UserId),

    #[error("item id {0} is listed more than once")]
    DuplicateItem(ItemId),

    #[error("invalid scoring configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid identifier '{value}' on line {line}")]
    InvalidIdentifier { line: usize, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
