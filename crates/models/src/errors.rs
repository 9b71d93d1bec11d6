use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown icon: {0}")]
    UnknownIcon(String),
}
