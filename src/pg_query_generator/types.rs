use std::fmt;

use serde::Serialize;

/// Fixed relational schema the translator writes against.
pub mod schema {
    pub const TABLE_NODE: &str = "node";
    pub const TABLE_EDGE: &str = "edge";

    pub const COLUMN_ID: &str = "id";
    pub const COLUMN_KIND_IDS: &str = "kind_ids";
    pub const COLUMN_KIND_ID: &str = "kind_id";
    pub const COLUMN_START_ID: &str = "start_id";
    pub const COLUMN_END_ID: &str = "end_id";
    pub const COLUMN_PROPERTIES: &str = "properties";

    pub const NODE_TABLE_COLUMNS: [&str; 3] = [COLUMN_ID, COLUMN_KIND_IDS, COLUMN_PROPERTIES];
    pub const EDGE_TABLE_COLUMNS: [&str; 5] = [
        COLUMN_ID,
        COLUMN_START_ID,
        COLUMN_END_ID,
        COLUMN_KIND_ID,
        COLUMN_PROPERTIES,
    ];
}

/// Target-language data types, used for literal casting and array-element
/// typing. The composite types are the projected graph-entity tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Unknown,
    Boolean,
    Int2,
    Int4,
    Int8,
    Float8,
    Text,
    JSONB,
    Int2Array,
    Int4Array,
    Int8Array,
    Float8Array,
    TextArray,
    NodeComposite,
    NodeCompositeArray,
    EdgeComposite,
    EdgeCompositeArray,
    PathComposite,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Unknown => "unknown",
            DataType::Boolean => "bool",
            DataType::Int2 => "int2",
            DataType::Int4 => "int4",
            DataType::Int8 => "int8",
            DataType::Float8 => "float8",
            DataType::Text => "text",
            DataType::JSONB => "jsonb",
            DataType::Int2Array => "int2[]",
            DataType::Int4Array => "int4[]",
            DataType::Int8Array => "int8[]",
            DataType::Float8Array => "float8[]",
            DataType::TextArray => "text[]",
            DataType::NodeComposite => "nodecomposite",
            DataType::NodeCompositeArray => "nodecomposite[]",
            DataType::EdgeComposite => "edgecomposite",
            DataType::EdgeCompositeArray => "edgecomposite[]",
            DataType::PathComposite => "pathcomposite",
        }
    }

    /// The array type whose elements are of this type, if one exists.
    pub fn to_array_type(&self) -> Option<DataType> {
        match self {
            DataType::Int2 => Some(DataType::Int2Array),
            DataType::Int4 => Some(DataType::Int4Array),
            DataType::Int8 => Some(DataType::Int8Array),
            DataType::Float8 => Some(DataType::Float8Array),
            DataType::Text => Some(DataType::TextArray),
            DataType::NodeComposite => Some(DataType::NodeCompositeArray),
            DataType::EdgeComposite => Some(DataType::EdgeCompositeArray),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar values carried by literals and parameters. Serializes untagged so
/// a parameter side table renders as plain JSON values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float64(f64),
    Text(String),
}

impl Value {
    pub fn type_hint(&self) -> DataType {
        match self {
            Value::Null => DataType::Unknown,
            Value::Boolean(_) => DataType::Boolean,
            Value::Int16(_) => DataType::Int2,
            Value::Int32(_) => DataType::Int4,
            Value::Int64(_) => DataType::Int8,
            Value::Float64(_) => DataType::Float8,
            Value::Text(_) => DataType::Text,
        }
    }

}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int16(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}
