use thiserror::Error;

/// Errors returned by every catalog and credential store operation.
///
/// `NotFound` is only produced by single-row lookups that returned no row.
/// Empty list and search results are a successful outcome, never an error.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No row matched a single-row lookup. Carries the entity name shown to clients.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The store rejected the input (failed validation, unknown foreign key).
    #[error("{0}")]
    InvalidInput(String),

    /// Driver or connectivity failure, tagged with the operation that hit it.
    #[error("{op}: {source}")]
    Storage {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// Returns a closure wrapping a driver error with an operation identifier.
    ///
    /// ```rust,ignore
    /// sqlx::query("...").execute(pool).await.map_err(StoreError::storage("movies.delete"))?;
    /// ```
    pub fn storage(op: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StoreError::Storage { op, source }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        StoreError::InvalidInput(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
