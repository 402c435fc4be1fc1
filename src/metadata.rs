//! Result metadata: the column schema sent ahead of row data and in
//! prepare responses.

use std::collections::HashMap;

use bytes::Bytes;

use crate::{
    decode,
    types::{ColumnTypeCode, DefaultTypeMapper, NativeType, TypeInfo, TypeMapper},
    wire::ProtocolReader,
    CqlError, Result,
};

bitflags::bitflags! {
    /// Flags word at the start of a metadata section.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct RowSetMetadataFlags: u32 {
        /// One keyspace/table pair precedes the columns and applies to all of them.
        const GLOBAL_TABLES_SPEC = 0x0001;
        /// A paging state follows the column count.
        const HAS_MORE_PAGES = 0x0002;
        /// No column specs are present.
        const NO_METADATA = 0x0004;
    }
}

/// A column of a result or of a prepared statement's bind variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CqlColumn {
    pub keyspace: String,
    pub table: String,
    pub name: String,
    /// Position of the column in the row.
    pub index: usize,
    pub type_code: ColumnTypeCode,
    pub type_info: Option<TypeInfo>,
    /// Client-side value type resolved from `type_code` and `type_info`.
    pub native_type: NativeType,
}

/// Column schema of a result set.
///
/// Built once from a single decode pass and never mutated afterwards. The
/// column list and the name index are either both present or both absent;
/// they are absent when the server set the no-metadata flag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowSetMetadata {
    flags: RowSetMetadataFlags,
    column_count: i32,
    columns: Option<Vec<CqlColumn>>,
    column_indexes: Option<HashMap<String, usize>>,
    paging_state: Option<Bytes>,
}

impl RowSetMetadata {
    /// Decodes a metadata section using [`DefaultTypeMapper`].
    pub fn decode(reader: &mut ProtocolReader) -> Result<Self> {
        Self::decode_with(reader, &DefaultTypeMapper)
    }

    /// Decodes a metadata section, resolving native types with `mapper`.
    pub fn decode_with(reader: &mut ProtocolReader, mapper: &dyn TypeMapper) -> Result<Self> {
        let flags = RowSetMetadataFlags::from_bits_retain(reader.read_i32()? as u32);
        let raw_count = reader.read_i32()?;

        let paging_state = if flags.contains(RowSetMetadataFlags::HAS_MORE_PAGES) {
            reader.read_bytes()?
        } else {
            None
        };

        if flags.contains(RowSetMetadataFlags::NO_METADATA) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                column_count = raw_count,
                has_paging_state = paging_state.is_some(),
                "decoded result metadata without column specs"
            );
            return Ok(Self {
                flags,
                column_count: raw_count,
                columns: None,
                column_indexes: None,
                paging_state,
            });
        }

        let column_count = usize::try_from(raw_count)
            .map_err(|_| CqlError::malformed(format!("negative column count {raw_count}")))?;

        let global_spec = if flags.contains(RowSetMetadataFlags::GLOBAL_TABLES_SPEC) {
            Some((reader.read_string()?, reader.read_string()?))
        } else {
            None
        };

        // Each column needs at least a type code; don't trust the count for allocation.
        let mut columns = Vec::with_capacity(column_count.min(reader.remaining() / 2));
        for index in 0..column_count {
            let (keyspace, table) = match &global_spec {
                Some((keyspace, table)) => (keyspace.clone(), table.clone()),
                None => (reader.read_string()?, reader.read_string()?),
            };
            let name = reader.read_string()?;
            let type_code = ColumnTypeCode::from(reader.read_u16()?);
            let type_info = decode::decode_type_info(reader, type_code)?;
            let native_type = mapper.native_type_of(type_code, type_info.as_ref());
            columns.push(CqlColumn {
                keyspace,
                table,
                name,
                index,
                type_code,
                type_info,
                native_type,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            column_count,
            has_paging_state = paging_state.is_some(),
            "decoded result metadata"
        );

        let mut metadata = Self::from_columns(columns);
        metadata.flags = flags;
        metadata.column_count = raw_count;
        metadata.paging_state = paging_state;
        Ok(metadata)
    }

    /// Builds metadata from already-resolved columns.
    ///
    /// Column indexes are reassigned from list position. When names repeat,
    /// the name index keeps the first position.
    pub fn from_columns(columns: Vec<CqlColumn>) -> Self {
        let mut column_indexes = HashMap::with_capacity(columns.len());
        let columns: Vec<CqlColumn> = columns
            .into_iter()
            .enumerate()
            .map(|(index, mut column)| {
                column.index = index;
                column_indexes.entry(column.name.clone()).or_insert(index);
                column
            })
            .collect();

        Self {
            flags: RowSetMetadataFlags::empty(),
            column_count: i32::try_from(columns.len()).unwrap_or(i32::MAX),
            columns: Some(columns),
            column_indexes: Some(column_indexes),
            paging_state: None,
        }
    }

    pub fn flags(&self) -> RowSetMetadataFlags {
        self.flags
    }

    /// Column count as sent by the server, even when no specs followed.
    ///
    /// Without metadata the value is not validated and may be negative.
    pub fn column_count(&self) -> i32 {
        self.column_count
    }

    /// Columns in wire order, or `None` when the section carried no metadata.
    pub fn columns(&self) -> Option<&[CqlColumn]> {
        self.columns.as_deref()
    }

    /// Name to position lookup, or `None` when the section carried no metadata.
    pub fn column_indexes(&self) -> Option<&HashMap<String, usize>> {
        self.column_indexes.as_ref()
    }

    /// Opaque token for fetching the next page.
    pub fn paging_state(&self) -> Option<&Bytes> {
        self.paging_state.as_ref()
    }

    pub fn has_metadata(&self) -> bool {
        self.columns.is_some()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.column_indexes.as_ref()?.get(name).copied()
    }

    pub fn column(&self, name: &str) -> Option<&CqlColumn> {
        let index = self.index_of(name)?;
        self.columns.as_ref()?.get(index)
    }
}
