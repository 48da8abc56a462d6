use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Unknown day-of-week label: {0}")]
    UnknownDay(String),
}
