use thiserror::Error;

/// Error attached to a retrieval outcome.
///
/// Neither variant aborts anything: `Advisory` accompanies stale but usable
/// data, `Fatal` means the request produced nothing to show. Both leave the
/// system ready for the user to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Backend unreachable. Showing last cached result.")]
    Advisory,

    #[error("Fetch failed and no cached data found.")]
    Fatal,
}

impl RetrievalError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RetrievalError::Fatal)
    }
}
