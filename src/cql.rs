use crate::{QueryOptions, Value};

/// A query to run: CQL text, positional arguments and per-query options.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cql {
    statement: String,
    arguments: Vec<Value>,
    options: QueryOptions,
}

impl Cql {
    /// Creates a query without arguments.
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            arguments: Vec::new(),
            options: QueryOptions::default(),
        }
    }

    /// Creates a query bound to positional arguments.
    pub fn with_args<I, V>(statement: impl Into<String>, arguments: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            statement: statement.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            options: QueryOptions::default(),
        }
    }

    /// Replaces the query options using the current ones as a starting point.
    ///
    /// ```
    /// use cql_statements::{Consistency, Cql};
    ///
    /// let cql = Cql::new("SELECT * FROM users")
    ///     .with_options(|opts| opts.set_consistency(Consistency::One).do_not_prepare());
    /// assert!(cql.options().no_prepare());
    /// ```
    pub fn with_options(mut self, configure: impl FnOnce(QueryOptions) -> QueryOptions) -> Self {
        self.options = configure(self.options);
        self
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }
}

impl From<&str> for Cql {
    fn from(statement: &str) -> Self {
        Self::new(statement)
    }
}

impl From<String> for Cql {
    fn from(statement: String) -> Self {
        Self::new(statement)
    }
}
