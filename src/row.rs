// row.rs - Turning SQLite rows into column -> scalar mappings
//
// Rows are decoded by the storage class of each value, not by the declared
// column type, so expressions like `COUNT(*)` or `ROUND(AVG(x), 2)` come
// back as the number SQLite actually produced.

use serde_json::{Map, Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

use crate::error::{Error, Result};

/// One result row: column name (as aliased in the query) to scalar value
pub type Row = Map<String, Value>;

pub fn decode_row(row: &SqliteRow) -> Result<Row> {
    let mut out = Map::new();
    for column in row.columns() {
        let value = decode_value(row, column.ordinal(), column.name())?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn decode_value(row: &SqliteRow, index: usize, name: &str) -> Result<Value> {
    let decode_err = |_: sqlx::Error| Error::Decode {
        column: name.to_string(),
        type_name: "unknown".to_string(),
    };

    let raw = row.try_get_raw(index).map_err(decode_err)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let value = match raw.type_info().name() {
        "INTEGER" => Value::from(row.try_get_unchecked::<i64, _>(index).map_err(decode_err)?),
        // NaN and infinities have no JSON representation
        "REAL" => {
            let real = row.try_get_unchecked::<f64, _>(index).map_err(decode_err)?;
            Number::from_f64(real).map(Value::Number).unwrap_or(Value::Null)
        }
        "TEXT" => Value::String(row.try_get_unchecked::<String, _>(index).map_err(decode_err)?),
        "BLOB" => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index).map_err(decode_err)?;
            Value::Array(bytes.into_iter().map(Value::from).collect())
        }
        other => {
            return Err(Error::Decode {
                column: name.to_string(),
                type_name: other.to_string(),
            })
        }
    };
    Ok(value)
}
