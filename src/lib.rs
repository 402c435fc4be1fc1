//! `cql-statements` sits between a CQL driver's query API and its session.
//!
//! It provides:
//! - [`StatementFactory`], which turns a [`Cql`] descriptor into a simple or
//!   prepared-and-bound [`Statement`], and builds batches concurrently
//! - [`StatementCache`], which prepares each distinct query text at most once
//! - [`RowSetMetadata::decode`], which reads the result metadata section of a
//!   response, including nested collection, UDT and tuple type descriptors
//!
//! Sending frames is left to the driver, which plugs in through [`Session`].

mod cache;
mod cql;
pub mod decode;
mod error;
mod factory;
mod metadata;
mod options;
mod session;
mod statement;
pub mod types;
mod value;
pub mod wire;

pub use cache::{CacheObserver, StatementCache, TracingObserver};
pub use cql::Cql;
pub use error::CqlError;
pub use factory::StatementFactory;
pub use metadata::{CqlColumn, RowSetMetadata, RowSetMetadataFlags};
pub use options::{CacheOptions, Consistency, QueryOptions, SerialConsistency, StatementOptions};
pub use session::Session;
pub use statement::{
    BatchStatement, BatchType, BoundStatement, PreparedStatement, SimpleStatement, Statement,
};
pub use types::{ColumnType, ColumnTypeCode, NativeType, TypeInfo, TypeMapper};
pub use value::Value;
pub use wire::ProtocolReader;

pub type Result<T> = std::result::Result<T, CqlError>;
