//! Column type codes, nested type descriptors, and native type mapping.

/// Type code of a column as sent on the wire (native protocol v4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnTypeCode {
    Custom,
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Int,
    Text,
    Timestamp,
    Uuid,
    Varchar,
    Varint,
    Timeuuid,
    Inet,
    Date,
    Time,
    Smallint,
    Tinyint,
    Duration,
    List,
    Map,
    Set,
    /// User defined type.
    Udt,
    Tuple,
    /// A code this crate does not know. Its type info is always absent.
    Unknown(u16),
}

impl ColumnTypeCode {
    /// Numeric value used on the wire.
    pub fn code(self) -> u16 {
        match self {
            Self::Custom => 0x0000,
            Self::Ascii => 0x0001,
            Self::Bigint => 0x0002,
            Self::Blob => 0x0003,
            Self::Boolean => 0x0004,
            Self::Counter => 0x0005,
            Self::Decimal => 0x0006,
            Self::Double => 0x0007,
            Self::Float => 0x0008,
            Self::Int => 0x0009,
            Self::Text => 0x000A,
            Self::Timestamp => 0x000B,
            Self::Uuid => 0x000C,
            Self::Varchar => 0x000D,
            Self::Varint => 0x000E,
            Self::Timeuuid => 0x000F,
            Self::Inet => 0x0010,
            Self::Date => 0x0011,
            Self::Time => 0x0012,
            Self::Smallint => 0x0013,
            Self::Tinyint => 0x0014,
            Self::Duration => 0x0015,
            Self::List => 0x0020,
            Self::Map => 0x0021,
            Self::Set => 0x0022,
            Self::Udt => 0x0030,
            Self::Tuple => 0x0031,
            Self::Unknown(code) => code,
        }
    }

    /// True for codes that never carry nested type info.
    pub fn is_primitive(self) -> bool {
        !matches!(
            self,
            Self::Custom
                | Self::List
                | Self::Map
                | Self::Set
                | Self::Udt
                | Self::Tuple
                | Self::Unknown(_)
        )
    }
}

impl From<u16> for ColumnTypeCode {
    fn from(code: u16) -> Self {
        match code {
            0x0000 => Self::Custom,
            0x0001 => Self::Ascii,
            0x0002 => Self::Bigint,
            0x0003 => Self::Blob,
            0x0004 => Self::Boolean,
            0x0005 => Self::Counter,
            0x0006 => Self::Decimal,
            0x0007 => Self::Double,
            0x0008 => Self::Float,
            0x0009 => Self::Int,
            0x000A => Self::Text,
            0x000B => Self::Timestamp,
            0x000C => Self::Uuid,
            0x000D => Self::Varchar,
            0x000E => Self::Varint,
            0x000F => Self::Timeuuid,
            0x0010 => Self::Inet,
            0x0011 => Self::Date,
            0x0012 => Self::Time,
            0x0013 => Self::Smallint,
            0x0014 => Self::Tinyint,
            0x0015 => Self::Duration,
            0x0020 => Self::List,
            0x0021 => Self::Map,
            0x0022 => Self::Set,
            0x0030 => Self::Udt,
            0x0031 => Self::Tuple,
            other => Self::Unknown(other),
        }
    }
}

impl From<ColumnTypeCode> for u16 {
    fn from(code: ColumnTypeCode) -> Self {
        code.code()
    }
}

/// A type code together with its nested descriptor, if it has one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnType {
    pub code: ColumnTypeCode,
    pub info: Option<TypeInfo>,
}

impl ColumnType {
    pub fn new(code: ColumnTypeCode, info: Option<TypeInfo>) -> Self {
        Self { code, info }
    }

    /// A type without nested info, such as `int` or `text`.
    pub fn primitive(code: ColumnTypeCode) -> Self {
        Self { code, info: None }
    }
}

/// Nested type descriptor for collection, custom, UDT and tuple columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeInfo {
    /// Server-side custom type, identified by its class name.
    Custom(String),
    List(Box<ColumnType>),
    Set(Box<ColumnType>),
    Map {
        key: Box<ColumnType>,
        value: Box<ColumnType>,
    },
    Udt(UdtInfo),
    /// Tuple elements in wire order.
    Tuple(Vec<ColumnType>),
}

/// Definition of a user defined type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UdtInfo {
    /// Fully qualified name: `keyspace.type_name`.
    pub name: String,
    /// Fields in wire order.
    pub fields: Vec<UdtField>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UdtField {
    pub name: String,
    pub field_type: ColumnType,
}

/// Value type a column decodes to on the client side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeType {
    String,
    I64,
    Bytes,
    Bool,
    Decimal,
    F64,
    F32,
    I32,
    Timestamp,
    Uuid,
    Varint,
    Inet,
    Date,
    Time,
    I16,
    I8,
    Duration,
    List(Box<NativeType>),
    Set(Box<NativeType>),
    Map(Box<NativeType>, Box<NativeType>),
    /// User defined type, by qualified name.
    Udt(String),
    Tuple(Vec<NativeType>),
    /// Custom server type, by class name.
    Custom(String),
    /// Type code unknown to this crate, or a container missing its type info.
    Unknown,
}

/// Resolves the client value type of a column from its wire type.
pub trait TypeMapper: Send + Sync {
    fn native_type_of(&self, code: ColumnTypeCode, info: Option<&TypeInfo>) -> NativeType;
}

/// Built-in mapping for every code in [`ColumnTypeCode`].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultTypeMapper;

impl DefaultTypeMapper {
    fn of(&self, column_type: &ColumnType) -> NativeType {
        self.native_type_of(column_type.code, column_type.info.as_ref())
    }
}

impl TypeMapper for DefaultTypeMapper {
    fn native_type_of(&self, code: ColumnTypeCode, info: Option<&TypeInfo>) -> NativeType {
        match (code, info) {
            (ColumnTypeCode::Ascii | ColumnTypeCode::Text | ColumnTypeCode::Varchar, _) => {
                NativeType::String
            }
            (ColumnTypeCode::Bigint | ColumnTypeCode::Counter, _) => NativeType::I64,
            (ColumnTypeCode::Blob, _) => NativeType::Bytes,
            (ColumnTypeCode::Boolean, _) => NativeType::Bool,
            (ColumnTypeCode::Decimal, _) => NativeType::Decimal,
            (ColumnTypeCode::Double, _) => NativeType::F64,
            (ColumnTypeCode::Float, _) => NativeType::F32,
            (ColumnTypeCode::Int, _) => NativeType::I32,
            (ColumnTypeCode::Timestamp, _) => NativeType::Timestamp,
            (ColumnTypeCode::Uuid | ColumnTypeCode::Timeuuid, _) => NativeType::Uuid,
            (ColumnTypeCode::Varint, _) => NativeType::Varint,
            (ColumnTypeCode::Inet, _) => NativeType::Inet,
            (ColumnTypeCode::Date, _) => NativeType::Date,
            (ColumnTypeCode::Time, _) => NativeType::Time,
            (ColumnTypeCode::Smallint, _) => NativeType::I16,
            (ColumnTypeCode::Tinyint, _) => NativeType::I8,
            (ColumnTypeCode::Duration, _) => NativeType::Duration,
            (ColumnTypeCode::Custom, Some(TypeInfo::Custom(name))) => {
                NativeType::Custom(name.clone())
            }
            (ColumnTypeCode::List, Some(TypeInfo::List(element))) => {
                NativeType::List(Box::new(self.of(element)))
            }
            (ColumnTypeCode::Set, Some(TypeInfo::Set(element))) => {
                NativeType::Set(Box::new(self.of(element)))
            }
            (ColumnTypeCode::Map, Some(TypeInfo::Map { key, value })) => {
                NativeType::Map(Box::new(self.of(key)), Box::new(self.of(value)))
            }
            (ColumnTypeCode::Udt, Some(TypeInfo::Udt(udt))) => NativeType::Udt(udt.name.clone()),
            (ColumnTypeCode::Tuple, Some(TypeInfo::Tuple(elements))) => {
                NativeType::Tuple(elements.iter().map(|element| self.of(element)).collect())
            }
            _ => NativeType::Unknown,
        }
    }
}
