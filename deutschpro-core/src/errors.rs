use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(&'static str),
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(&'static str),
    #[error("backend error: {0}")]
    Backend(String),
    #[error("no such word exists in German: {0}")]
    NoSuchWord(String),
}

impl CoreError {
    /// True for failures caused by the generation backend rather than by local state.
    pub fn is_backend(&self) -> bool {
        matches!(self, CoreError::Backend(_))
    }
}
