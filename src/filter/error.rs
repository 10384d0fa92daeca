use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Invalid column name: {0}")]
    InvalidColumn(String),
}
