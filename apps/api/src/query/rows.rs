//! Dynamic result decoding — turns rows from arbitrary caller SQL into JSON
//! without compile-time knowledge of the statement.
//!
//! Dispatch is on the Postgres type name reported per column. Types outside
//! the table degrade to a string decode where compatible, then to null.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use uuid::Uuid;

/// Column descriptor returned alongside rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub data_type: String,
}

/// Describes the columns of a result set. Empty when the statement
/// returned no rows.
pub fn describe_fields(rows: &[PgRow]) -> Vec<FieldDescriptor> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };

    first
        .columns()
        .iter()
        .map(|column| FieldDescriptor {
            name: column.name().to_string(),
            data_type: column.type_info().name().to_string(),
        })
        .collect()
}

/// Renders every row as a JSON object keyed by column name, column order
/// preserved.
pub fn rows_to_json(rows: &[PgRow]) -> Vec<Value> {
    rows.iter().map(row_to_json).collect()
}

fn row_to_json(row: &PgRow) -> Value {
    let mut object = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        object.insert(
            column.name().to_string(),
            column_to_json(row, index, column.type_info().name()),
        );
    }
    Value::Object(object)
}

fn column_to_json(row: &PgRow, index: usize, type_name: &str) -> Value {
    // NULL of any type, and any decode mismatch, lands on Value::Null.
    macro_rules! decode {
        ($ty:ty, $render:expr) => {
            match row.try_get::<Option<$ty>, _>(index) {
                Ok(Some(v)) => $render(v),
                _ => Value::Null,
            }
        };
    }

    match type_name {
        "BOOL" => decode!(bool, |v: bool| json!(v)),
        "INT2" => decode!(i16, |v: i16| json!(v)),
        "INT4" => decode!(i32, |v: i32| json!(v)),
        "INT8" => decode!(i64, |v: i64| json!(v)),
        "FLOAT4" => decode!(f32, |v: f32| json!(v)),
        "FLOAT8" => decode!(f64, |v: f64| json!(v)),
        // NUMERIC keeps full precision by rendering as a string, matching
        // what node-postgres clients already expect.
        "NUMERIC" => decode!(Decimal, |v: Decimal| json!(v.to_string())),
        "TEXT" | "VARCHAR" | "CHAR" | "NAME" => decode!(String, |v: String| json!(v)),
        "UUID" => decode!(Uuid, |v: Uuid| json!(v.to_string())),
        "TIMESTAMPTZ" => decode!(DateTime<Utc>, |v: DateTime<Utc>| json!(v.to_rfc3339())),
        "TIMESTAMP" => decode!(NaiveDateTime, |v: NaiveDateTime| json!(v.to_string())),
        "DATE" => decode!(NaiveDate, |v: NaiveDate| json!(v.to_string())),
        "TIME" => decode!(NaiveTime, |v: NaiveTime| json!(v.to_string())),
        "JSON" | "JSONB" => decode!(Value, |v: Value| v),
        "BYTEA" => decode!(Vec<u8>, |v: Vec<u8>| json!(hex_literal(&v))),
        "TEXT[]" | "VARCHAR[]" => decode!(Vec<String>, |v: Vec<String>| json!(v)),
        "INT4[]" => decode!(Vec<i32>, |v: Vec<i32>| json!(v)),
        "INT8[]" => decode!(Vec<i64>, |v: Vec<i64>| json!(v)),
        "vector" => decode!(pgvector::Vector, |v: pgvector::Vector| json!(v.to_vec())),
        _ => decode!(String, |v: String| json!(v)),
    }
}

/// Postgres hex form (`\x...`) for binary columns.
fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + bytes.len() * 2);
    out.push_str("\\x");
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
