/// Error type returned by this crate.
///
/// Errors are `Clone` because a failed preparation is cached and handed to
/// every caller that asks for the same query text.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CqlError {
    /// The byte cursor ran out or the bytes do not form a valid section.
    #[error("malformed protocol data: {0}")]
    MalformedProtocolData(String),
    /// The session reported an error while preparing a query.
    #[error("failed to prepare '{query}': {message}")]
    Preparation {
        /// Query text that was sent for preparation.
        query: String,
        /// Error message reported by the server or session.
        message: String,
        /// Optional protocol error code.
        code: Option<i32>,
    },
    /// The preparation task ended before it produced an outcome.
    #[error("preparation of '{query}' was aborted")]
    PreparationAborted { query: String },
}

impl CqlError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedProtocolData(message.into())
    }

    /// Builds a preparation failure, typically from a [`Session`](crate::Session) implementation.
    pub fn preparation(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Preparation {
            query: query.into(),
            message: message.into(),
            code: None,
        }
    }
}
