use async_trait::async_trait;

use crate::{PreparedStatement, Result};

/// Connection-level operations the statement factory relies on.
///
/// Implemented by the driver session; the factory only ever asks it to
/// prepare query text.
#[async_trait]
pub trait Session: Send + Sync {
    /// Prepares `query` on the server.
    ///
    /// Failures should be reported as [`CqlError::Preparation`](crate::CqlError::Preparation);
    /// whatever is returned is cached for the query text.
    async fn prepare(&self, query: &str) -> Result<PreparedStatement>;
}
