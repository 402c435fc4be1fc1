use bytes::{BufMut, BytesMut};
use cql_statements::{
    decode, ColumnType, ColumnTypeCode, CqlError, NativeType, ProtocolReader, RowSetMetadata,
    RowSetMetadataFlags, TypeInfo, TypeMapper,
};

fn put_string(buf: &mut BytesMut, value: &str) {
    buf.put_u16(value.len() as u16);
    buf.put_slice(value.as_bytes());
}

fn reader(buf: BytesMut) -> ProtocolReader {
    ProtocolReader::new(buf.freeze())
}

#[test]
fn global_spec_section_round_trips() {
    let mut buf = BytesMut::new();
    buf.put_i32(RowSetMetadataFlags::GLOBAL_TABLES_SPEC.bits() as i32);
    buf.put_i32(2);
    put_string(&mut buf, "ks");
    put_string(&mut buf, "t");
    put_string(&mut buf, "a");
    buf.put_u16(ColumnTypeCode::Int.code());
    put_string(&mut buf, "b");
    buf.put_u16(ColumnTypeCode::Varchar.code());
    let mut reader = reader(buf);

    let metadata = RowSetMetadata::decode(&mut reader).expect("must decode");

    let columns = metadata.columns().expect("columns present");
    let names: Vec<_> = columns
        .iter()
        .map(|column| (column.keyspace.as_str(), column.table.as_str(), column.name.as_str()))
        .collect();
    assert_eq!(names, [("ks", "t", "a"), ("ks", "t", "b")]);
    assert_eq!(columns[0].type_code, ColumnTypeCode::Int);
    assert_eq!(columns[1].type_code, ColumnTypeCode::Varchar);

    let indexes = metadata.column_indexes().expect("indexes present");
    assert_eq!(indexes.len(), 2);
    assert_eq!(indexes["a"], 0);
    assert_eq!(indexes["b"], 1);
    assert!(metadata.paging_state().is_none());
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn nested_column_types_and_paging_state() {
    let mut buf = BytesMut::new();
    let flags = RowSetMetadataFlags::GLOBAL_TABLES_SPEC | RowSetMetadataFlags::HAS_MORE_PAGES;
    buf.put_i32(flags.bits() as i32);
    buf.put_i32(2);
    buf.put_i32(3);
    buf.put_slice(b"\x0a\x0b\x0c");
    put_string(&mut buf, "shop");
    put_string(&mut buf, "orders");

    // items map<text, frozen<list<bigint>>>
    put_string(&mut buf, "items");
    buf.put_u16(ColumnTypeCode::Map.code());
    buf.put_u16(ColumnTypeCode::Text.code());
    buf.put_u16(ColumnTypeCode::List.code());
    buf.put_u16(ColumnTypeCode::Bigint.code());

    // shipping frozen<address> where address is (street text, geo tuple<double, double>)
    put_string(&mut buf, "shipping");
    buf.put_u16(ColumnTypeCode::Udt.code());
    put_string(&mut buf, "shop");
    put_string(&mut buf, "address");
    buf.put_i16(2);
    put_string(&mut buf, "street");
    buf.put_u16(ColumnTypeCode::Text.code());
    put_string(&mut buf, "geo");
    buf.put_u16(ColumnTypeCode::Tuple.code());
    buf.put_i16(2);
    buf.put_u16(ColumnTypeCode::Double.code());
    buf.put_u16(ColumnTypeCode::Double.code());

    let metadata = RowSetMetadata::decode(&mut reader(buf)).expect("must decode");

    assert_eq!(
        metadata.paging_state().map(|state| state.to_vec()),
        Some(vec![0x0a, 0x0b, 0x0c])
    );

    let items = metadata.column("items").expect("items column");
    assert_eq!(
        items.native_type,
        NativeType::Map(
            Box::new(NativeType::String),
            Box::new(NativeType::List(Box::new(NativeType::I64)))
        )
    );

    let shipping = metadata.column("shipping").expect("shipping column");
    assert_eq!(shipping.index, 1);
    assert_eq!(shipping.native_type, NativeType::Udt("shop.address".to_owned()));
    let Some(TypeInfo::Udt(address)) = &shipping.type_info else {
        panic!("expected udt type info");
    };
    assert_eq!(address.fields[1].name, "geo");
    assert_eq!(
        address.fields[1].field_type.info,
        Some(TypeInfo::Tuple(vec![
            ColumnType::primitive(ColumnTypeCode::Double),
            ColumnType::primitive(ColumnTypeCode::Double),
        ]))
    );
}

#[test]
fn no_metadata_has_neither_columns_nor_index() {
    let mut buf = BytesMut::new();
    buf.put_i32(RowSetMetadataFlags::NO_METADATA.bits() as i32);
    buf.put_i32(12);

    let metadata = RowSetMetadata::decode(&mut reader(buf)).expect("must decode");

    assert!(metadata.columns().is_none());
    assert!(metadata.column_indexes().is_none());
    assert_eq!(metadata.index_of("anything"), None);
}

#[test]
fn truncated_nested_type_fails_cleanly() {
    let mut buf = BytesMut::new();
    buf.put_i32(RowSetMetadataFlags::GLOBAL_TABLES_SPEC.bits() as i32);
    buf.put_i32(1);
    put_string(&mut buf, "ks");
    put_string(&mut buf, "t");
    put_string(&mut buf, "m");
    buf.put_u16(ColumnTypeCode::Map.code());
    buf.put_u16(ColumnTypeCode::Text.code());

    let err = RowSetMetadata::decode(&mut reader(buf)).expect_err("must fail");
    assert!(matches!(err, CqlError::MalformedProtocolData(_)));
}

#[test]
fn deeply_nested_payload_is_rejected() {
    let mut buf = BytesMut::new();
    for _ in 0..10_000 {
        buf.put_u16(ColumnTypeCode::List.code());
    }
    buf.put_u16(ColumnTypeCode::Int.code());

    let err = decode::decode_column_type(&mut reader(buf)).expect_err("must fail");
    assert!(matches!(err, CqlError::MalformedProtocolData(_)));
}

struct CustomOnlyMapper;

impl TypeMapper for CustomOnlyMapper {
    fn native_type_of(&self, code: ColumnTypeCode, _info: Option<&TypeInfo>) -> NativeType {
        NativeType::Custom(format!("code-{:#06x}", code.code()))
    }
}

#[test]
fn injected_type_mapper_resolves_native_types() {
    let mut buf = BytesMut::new();
    buf.put_i32(0);
    buf.put_i32(1);
    put_string(&mut buf, "ks");
    put_string(&mut buf, "t");
    put_string(&mut buf, "ts");
    buf.put_u16(ColumnTypeCode::Timestamp.code());

    let metadata =
        RowSetMetadata::decode_with(&mut reader(buf), &CustomOnlyMapper).expect("must decode");

    let column = metadata.column("ts").expect("ts column");
    assert_eq!(column.native_type, NativeType::Custom("code-0x000b".to_owned()));
}
