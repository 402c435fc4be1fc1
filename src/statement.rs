//! Executable statements handed to the session.

use bytes::Bytes;

use crate::{RowSetMetadata, StatementOptions, Value};

/// A query the server has prepared, identified by an opaque id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedStatement {
    id: Bytes,
    query: String,
    variables: RowSetMetadata,
    result_metadata: Option<RowSetMetadata>,
}

impl PreparedStatement {
    pub fn new(id: impl Into<Bytes>, query: impl Into<String>, variables: RowSetMetadata) -> Self {
        Self {
            id: id.into(),
            query: query.into(),
            variables,
            result_metadata: None,
        }
    }

    /// Attaches the metadata of the rows the statement returns.
    pub fn with_result_metadata(mut self, metadata: RowSetMetadata) -> Self {
        self.result_metadata = Some(metadata);
        self
    }

    pub fn id(&self) -> &Bytes {
        &self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Metadata of the bind markers.
    pub fn variables(&self) -> &RowSetMetadata {
        &self.variables
    }

    pub fn result_metadata(&self) -> Option<&RowSetMetadata> {
        self.result_metadata.as_ref()
    }

    /// Combines the prepared statement with concrete argument values.
    pub fn bind(&self, values: Vec<Value>) -> BoundStatement {
        BoundStatement {
            prepared: self.clone(),
            values,
            options: StatementOptions::default(),
        }
    }
}

/// Query text sent to the server as is.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleStatement {
    pub query: String,
    pub values: Vec<Value>,
    pub options: StatementOptions,
}

impl SimpleStatement {
    pub fn new(query: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            query: query.into(),
            values,
            options: StatementOptions::default(),
        }
    }
}

/// A prepared statement bound to argument values for one execution.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundStatement {
    pub prepared: PreparedStatement,
    pub values: Vec<Value>,
    pub options: StatementOptions,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BatchType {
    #[default]
    Logged,
    Unlogged,
    Counter,
}

/// Statements submitted together as one unit, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchStatement {
    pub batch_type: BatchType,
    pub options: StatementOptions,
    statements: Vec<Statement>,
}

impl BatchStatement {
    pub fn new(batch_type: BatchType) -> Self {
        Self {
            batch_type,
            ..Self::default()
        }
    }

    pub fn add(&mut self, statement: Statement) -> &mut Self {
        self.statements.push(statement);
        self
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl FromIterator<Statement> for BatchStatement {
    fn from_iter<I: IntoIterator<Item = Statement>>(iter: I) -> Self {
        Self {
            statements: iter.into_iter().collect(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Unprepared(SimpleStatement),
    Bound(BoundStatement),
    Batch(BatchStatement),
}

impl Statement {
    pub fn options(&self) -> &StatementOptions {
        match self {
            Self::Unprepared(statement) => &statement.options,
            Self::Bound(statement) => &statement.options,
            Self::Batch(batch) => &batch.options,
        }
    }

    /// Argument values, empty for batches.
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Unprepared(statement) => &statement.values,
            Self::Bound(statement) => &statement.values,
            Self::Batch(_) => &[],
        }
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

impl From<SimpleStatement> for Statement {
    fn from(statement: SimpleStatement) -> Self {
        Self::Unprepared(statement)
    }
}

impl From<BoundStatement> for Statement {
    fn from(statement: BoundStatement) -> Self {
        Self::Bound(statement)
    }
}

impl From<BatchStatement> for Statement {
    fn from(batch: BatchStatement) -> Self {
        Self::Batch(batch)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use crate::{
        BatchStatement, BatchType, PreparedStatement, RowSetMetadata, SimpleStatement, Statement,
        Value,
    };

    #[test]
    fn bind_keeps_handle_and_values() {
        let prepared = PreparedStatement::new(
            Bytes::from_static(b"\x01\x02"),
            "SELECT * FROM t WHERE id = ?",
            RowSetMetadata::default(),
        );
        let bound = prepared.bind(vec![Value::int(5)]);
        assert_eq!(bound.prepared.id().as_ref(), b"\x01\x02");
        assert_eq!(bound.values, vec![Value::Int(5)]);

        let statement = Statement::from(bound);
        assert!(statement.is_prepared());
        assert_eq!(statement.values(), &[Value::Int(5)]);
    }

    #[test]
    fn batch_preserves_insertion_order() {
        let mut batch = BatchStatement::new(BatchType::Unlogged);
        batch
            .add(SimpleStatement::new("A", vec![]).into())
            .add(SimpleStatement::new("B", vec![]).into());

        let queries: Vec<_> = batch
            .statements()
            .iter()
            .map(|statement| match statement {
                Statement::Unprepared(simple) => simple.query.as_str(),
                _ => panic!("expected unprepared statement"),
            })
            .collect();
        assert_eq!(queries, ["A", "B"]);
        assert_eq!(batch.batch_type, BatchType::Unlogged);
        assert_eq!(batch.len(), 2);
    }
}
