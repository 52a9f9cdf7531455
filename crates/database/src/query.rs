use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgColumn, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Postgres, Row, TypeInfo};

/// A single result row, keyed by column name.
pub type JsonRow = serde_json::Map<String, Value>;

/// A scalar value bound positionally to a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Boolean parameter
    Bool(bool),
    /// Integer parameter (ids, counts)
    Int(i64),
    /// Floating point parameter (prices)
    Float(f64),
    /// Text parameter
    Text(String),
    /// Calendar date parameter
    Date(NaiveDate),
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Int(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Float(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

/// Executes parameterized statements and returns their result rows.
///
/// Statements that modify data are expected to carry a `RETURNING` clause when the
/// caller needs to know how many rows were touched.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs `statement` with `params` bound to `$1..$n` and returns every result row.
    async fn execute(
        &self,
        statement: &str,
        params: &[SqlValue],
    ) -> Result<Vec<JsonRow>, sqlx::Error>;
}

/// Binds every parameter to `query` in order.
pub fn bind_params<'q>(
    query: Query<'q, Postgres, PgArguments>,
    params: &[SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    params.iter().fold(query, |query, param| match param {
        SqlValue::Bool(v) => query.bind(*v),
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Date(v) => query.bind(*v),
    })
}

/// Converts a driver row into a column-name keyed JSON object.
pub fn row_to_json(row: &PgRow) -> Result<JsonRow, sqlx::Error> {
    let mut object = JsonRow::new();
    for column in row.columns() {
        object.insert(column.name().to_string(), column_value(row, column)?);
    }
    Ok(object)
}

/// How a column of a given Postgres type is turned into JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDecoder {
    /// `BOOL`
    Bool,
    /// `INT2`
    Int2,
    /// `INT4`
    Int4,
    /// `INT8`
    Int8,
    /// `FLOAT4`
    Float4,
    /// `FLOAT8`
    Float8,
    /// `DATE`, rendered as `YYYY-MM-DD`
    Date,
    /// `TIMESTAMP`, rendered as RFC 3339 in UTC
    Timestamp,
    /// `TIMESTAMPTZ`, rendered as RFC 3339
    Timestamptz,
    /// `UUID`
    Uuid,
    /// `JSON` and `JSONB`, passed through
    Json,
    /// Text-like types (`TEXT`, `VARCHAR`, `BPCHAR`, `NAME`, ...)
    Text,
    /// Types with no lossless JSON mapping here (`NUMERIC`, `BYTEA`, ...)
    Unsupported,
}

impl ColumnDecoder {
    /// Picks the decoder for a Postgres type name as reported by the driver.
    pub fn for_type(type_name: &str) -> Self {
        match type_name {
            "BOOL" => ColumnDecoder::Bool,
            "INT2" => ColumnDecoder::Int2,
            "INT4" => ColumnDecoder::Int4,
            "INT8" => ColumnDecoder::Int8,
            "FLOAT4" => ColumnDecoder::Float4,
            "FLOAT8" => ColumnDecoder::Float8,
            "DATE" => ColumnDecoder::Date,
            "TIMESTAMP" => ColumnDecoder::Timestamp,
            "TIMESTAMPTZ" => ColumnDecoder::Timestamptz,
            "UUID" => ColumnDecoder::Uuid,
            "JSON" | "JSONB" => ColumnDecoder::Json,
            "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" | "CITEXT" => ColumnDecoder::Text,
            _ => ColumnDecoder::Unsupported,
        }
    }
}

fn column_value(row: &PgRow, column: &PgColumn) -> Result<Value, sqlx::Error> {
    let index = column.ordinal();
    let type_name = column.type_info().name();

    let value = match ColumnDecoder::for_type(type_name) {
        ColumnDecoder::Bool => row.try_get::<Option<bool>, _>(index)?.map(Value::from),
        ColumnDecoder::Int2 => row.try_get::<Option<i16>, _>(index)?.map(Value::from),
        ColumnDecoder::Int4 => row.try_get::<Option<i32>, _>(index)?.map(Value::from),
        ColumnDecoder::Int8 => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        ColumnDecoder::Float4 => row
            .try_get::<Option<f32>, _>(index)?
            .map(|v| float_value(column.name(), f64::from(v)))
            .transpose()?,
        ColumnDecoder::Float8 => row
            .try_get::<Option<f64>, _>(index)?
            .map(|v| float_value(column.name(), v))
            .transpose()?,
        ColumnDecoder::Date => row
            .try_get::<Option<NaiveDate>, _>(index)?
            .map(|v| Value::from(v.to_string())),
        ColumnDecoder::Timestamp => row
            .try_get::<Option<NaiveDateTime>, _>(index)?
            .map(|v| Value::from(v.and_utc().to_rfc3339())),
        ColumnDecoder::Timestamptz => row
            .try_get::<Option<DateTime<Utc>>, _>(index)?
            .map(|v| Value::from(v.to_rfc3339())),
        ColumnDecoder::Uuid => row
            .try_get::<Option<uuid::Uuid>, _>(index)?
            .map(|v| Value::from(v.to_string())),
        ColumnDecoder::Json => row.try_get::<Option<Value>, _>(index)?,
        ColumnDecoder::Text => row.try_get::<Option<String>, _>(index)?.map(Value::from),
        ColumnDecoder::Unsupported => {
            return Err(unsupported_type(column.name(), type_name));
        }
    };

    Ok(value.unwrap_or(Value::Null))
}

/// JSON number for a float column; NaN and infinities have no JSON form and are rejected.
pub fn float_value(column: &str, value: f64) -> Result<Value, sqlx::Error> {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: format!("non-finite value {} cannot be represented in JSON", value).into(),
        })
}

fn unsupported_type(column: &str, type_name: &str) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!(
            "column type {} is not supported; cast it in the query (e.g. ::float8 or ::text)",
            type_name
        )
        .into(),
    }
}

/// Deserializes a result row into a typed record.
pub fn decode_row<T: DeserializeOwned>(row: JsonRow) -> Result<T, serde_json::Error> {
    serde_json::from_value(Value::Object(row))
}

/// Deserializes every row, stopping at the first malformed one.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<JsonRow>) -> Result<Vec<T>, serde_json::Error> {
    rows.into_iter().map(decode_row).collect()
}
