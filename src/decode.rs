//! Decoder for nested column type descriptors.
//!
//! Descriptors are recursive: a list carries its element type, a map its key
//! and value types, a UDT or tuple one type per field. Nesting is bounded by
//! [`MAX_TYPE_DEPTH`]; anything deeper is rejected as malformed instead of
//! recursing on whatever the server sent.

use crate::{
    types::{ColumnType, ColumnTypeCode, TypeInfo, UdtField, UdtInfo},
    wire::ProtocolReader,
    CqlError, Result,
};

/// Deepest nesting of type descriptors accepted below a column's own type.
pub const MAX_TYPE_DEPTH: usize = 64;

/// Reads a 2-byte type code and the descriptor that follows it.
pub fn decode_column_type(reader: &mut ProtocolReader) -> Result<ColumnType> {
    column_type_at(reader, 0)
}

/// Reads the descriptor for `code`, which the caller has already consumed.
///
/// Primitive and unknown codes consume nothing and yield `None`.
pub fn decode_type_info(
    reader: &mut ProtocolReader,
    code: ColumnTypeCode,
) -> Result<Option<TypeInfo>> {
    type_info_at(reader, code, 0)
}

fn column_type_at(reader: &mut ProtocolReader, depth: usize) -> Result<ColumnType> {
    if depth > MAX_TYPE_DEPTH {
        return Err(CqlError::malformed(format!(
            "type descriptor nested deeper than {MAX_TYPE_DEPTH} levels"
        )));
    }
    let code = ColumnTypeCode::from(reader.read_u16()?);
    let info = type_info_at(reader, code, depth)?;
    Ok(ColumnType::new(code, info))
}

fn type_info_at(
    reader: &mut ProtocolReader,
    code: ColumnTypeCode,
    depth: usize,
) -> Result<Option<TypeInfo>> {
    let info = match code {
        ColumnTypeCode::Custom => TypeInfo::Custom(reader.read_string()?),
        ColumnTypeCode::List => TypeInfo::List(Box::new(column_type_at(reader, depth + 1)?)),
        ColumnTypeCode::Set => TypeInfo::Set(Box::new(column_type_at(reader, depth + 1)?)),
        ColumnTypeCode::Map => {
            let key = column_type_at(reader, depth + 1)?;
            let value = column_type_at(reader, depth + 1)?;
            TypeInfo::Map {
                key: Box::new(key),
                value: Box::new(value),
            }
        }
        ColumnTypeCode::Udt => {
            let keyspace = reader.read_string()?;
            let type_name = reader.read_string()?;
            let count = element_count(reader, "UDT field")?;
            let mut fields = Vec::with_capacity(count);
            for _ in 0..count {
                let name = reader.read_string()?;
                let field_type = column_type_at(reader, depth + 1)?;
                fields.push(UdtField { name, field_type });
            }
            TypeInfo::Udt(UdtInfo {
                name: format!("{keyspace}.{type_name}"),
                fields,
            })
        }
        ColumnTypeCode::Tuple => {
            let count = element_count(reader, "tuple element")?;
            let mut elements = Vec::with_capacity(count);
            for _ in 0..count {
                elements.push(column_type_at(reader, depth + 1)?);
            }
            TypeInfo::Tuple(elements)
        }
        _ => return Ok(None),
    };
    Ok(Some(info))
}

fn element_count(reader: &mut ProtocolReader, what: &str) -> Result<usize> {
    let count = reader.read_i16()?;
    usize::try_from(count)
        .map_err(|_| CqlError::malformed(format!("negative {what} count {count}")))
}
