use std::sync::Arc;

use futures::future::join_all;

use crate::{
    BatchStatement, CacheOptions, Cql, Result, Session, SimpleStatement, Statement, StatementCache,
};

/// Turns [`Cql`] descriptors into executable statements.
///
/// Query text is prepared at most once per factory; later requests for the
/// same text bind the cached prepared statement.
#[derive(Debug, Default)]
pub struct StatementFactory {
    cache: StatementCache,
}

impl StatementFactory {
    pub fn new(options: CacheOptions) -> Self {
        Self::with_cache(StatementCache::new(options))
    }

    pub fn with_cache(cache: StatementCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &StatementCache {
        &self.cache
    }

    pub fn max_prepared_statements_threshold(&self) -> usize {
        self.cache.max_prepared_statements_threshold()
    }

    pub fn set_max_prepared_statements_threshold(&self, threshold: usize) {
        self.cache.set_max_prepared_statements_threshold(threshold);
    }

    /// Builds a statement for `cql`.
    ///
    /// With [`QueryOptions::do_not_prepare`](crate::QueryOptions::do_not_prepare)
    /// the text is sent as a simple statement and the cache is not consulted.
    /// Otherwise the text is prepared (or taken from the cache) and bound to the
    /// arguments. A preparation failure is returned as is.
    ///
    /// Works with or without a Tokio runtime; see [`StatementCache::resolve`]
    /// for how preparation is driven in each case.
    pub async fn get_statement(&self, session: &Arc<dyn Session>, cql: &Cql) -> Result<Statement> {
        if cql.options().no_prepare() {
            let mut statement = SimpleStatement::new(cql.statement(), cql.arguments().to_vec());
            statement.options = cql.options().to_statement_options();

            #[cfg(feature = "tracing")]
            tracing::debug!(query = cql.statement(), "building unprepared statement");

            return Ok(Statement::Unprepared(statement));
        }

        let prepared = self.cache.resolve(session, cql.statement()).await?;
        let mut bound = prepared.bind(cql.arguments().to_vec());
        bound.options = cql.options().to_statement_options();
        Ok(Statement::Bound(bound))
    }

    /// Builds a batch from `cqls`, preparing all members concurrently.
    ///
    /// Members keep the input order. If any member fails, the first failure in
    /// input order is returned and no batch is built.
    pub async fn get_batch_statement<'a, I>(
        &self,
        session: &Arc<dyn Session>,
        cqls: I,
    ) -> Result<BatchStatement>
    where
        I: IntoIterator<Item = &'a Cql>,
    {
        let statements = join_all(cqls.into_iter().map(|cql| self.get_statement(session, cql)))
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        Ok(statements.into_iter().collect())
    }
}
