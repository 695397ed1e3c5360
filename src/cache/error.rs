use std::fmt;
use std::sync::Arc;

/// Failure of a single refresh attempt, delivered to every caller attached to it.
///
/// One supplier error has to fan out to many waiters, so the underlying
/// `anyhow::Error` is held behind an `Arc` and the handle is `Clone`. Display
/// renders the full anyhow chain; the cache adds no wrapping of its own.
#[derive(Clone)]
pub struct RefreshError(Arc<anyhow::Error>);

impl RefreshError {
    pub(crate) fn from_supplier(err: anyhow::Error) -> Self {
        Self(Arc::new(err))
    }

    pub(crate) fn refresh_task_died() -> Self {
        Self(Arc::new(anyhow::anyhow!(
            "token refresh task terminated without reporting a result"
        )))
    }

    /// The supplier error as produced, with its full context chain.
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl fmt::Display for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl fmt::Debug for RefreshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl std::error::Error for RefreshError {}
