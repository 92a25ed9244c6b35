//! Coercion of raw criteria values into typed bind values.
//!
//! Every value taken from a criteria document is cast to a [`sea_orm::Value`]
//! matching the target field's declared [`FieldType`] before it is bound into
//! an expression, so the database always sees a parameter of the storage
//! type, not whatever JSON happened to carry.

use chrono::{DateTime as ChronoDateTime, NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::Value;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::FilterError;
use crate::metadata::{FieldDef, FieldType};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Default)]
pub struct Typecaster;

impl Typecaster {
    /// Cast `raw` to the bind value family of `field`.
    ///
    /// A JSON `null` casts to the typed NULL of that family. `format`
    /// overrides the chrono parse format for date/time fields.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Typecast`] when the value cannot represent the
    /// field's type.
    pub fn cast(
        &self,
        field: &FieldDef,
        raw: &JsonValue,
        format: Option<&str>,
    ) -> Result<Value, FilterError> {
        if raw.is_null() {
            return Ok(Self::typed_null(field.field_type));
        }

        match field.field_type {
            FieldType::Integer => self.cast_integer(field, raw),
            FieldType::Float => self.cast_float(field, raw),
            FieldType::Boolean => self.cast_boolean(field, raw),
            FieldType::Uuid => self.cast_uuid(field, raw),
            FieldType::String | FieldType::Enum => self.cast_string(field, raw),
            FieldType::Date => self.cast_date(field, raw, format),
            FieldType::Time => self.cast_time(field, raw, format),
            FieldType::DateTime => self.cast_datetime(field, raw, format),
            FieldType::Json => Ok(Value::Json(Some(Box::new(raw.clone())))),
        }
    }

    fn typed_null(field_type: FieldType) -> Value {
        match field_type {
            FieldType::Integer => Value::BigInt(None),
            FieldType::Float => Value::Double(None),
            FieldType::Boolean => Value::Bool(None),
            FieldType::Uuid => Value::Uuid(None),
            FieldType::String | FieldType::Enum => Value::String(None),
            FieldType::Date => Value::ChronoDate(None),
            FieldType::Time => Value::ChronoTime(None),
            FieldType::DateTime => Value::ChronoDateTime(None),
            FieldType::Json => Value::Json(None),
        }
    }

    fn cast_integer(&self, field: &FieldDef, raw: &JsonValue) -> Result<Value, FilterError> {
        if let Some(int) = raw.as_i64() {
            return Ok(Value::BigInt(Some(int)));
        }
        if let Some(text) = raw.as_str() {
            if let Ok(int) = text.trim().parse::<i64>() {
                return Ok(Value::BigInt(Some(int)));
            }
        }
        Err(cast_error(field, raw, "expected an integer"))
    }

    fn cast_float(&self, field: &FieldDef, raw: &JsonValue) -> Result<Value, FilterError> {
        if let Some(float) = raw.as_f64() {
            return Ok(Value::Double(Some(float)));
        }
        if let Some(text) = raw.as_str() {
            if let Ok(float) = text.trim().parse::<f64>() {
                return Ok(Value::Double(Some(float)));
            }
        }
        Err(cast_error(field, raw, "expected a number"))
    }

    fn cast_boolean(&self, field: &FieldDef, raw: &JsonValue) -> Result<Value, FilterError> {
        if let Some(flag) = raw.as_bool() {
            return Ok(Value::Bool(Some(flag)));
        }
        match raw.as_i64() {
            Some(0) => return Ok(Value::Bool(Some(false))),
            Some(1) => return Ok(Value::Bool(Some(true))),
            _ => {}
        }
        if let Some(text) = raw.as_str() {
            match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => return Ok(Value::Bool(Some(true))),
                "false" | "0" => return Ok(Value::Bool(Some(false))),
                _ => {}
            }
        }
        Err(cast_error(field, raw, "expected a boolean"))
    }

    fn cast_uuid(&self, field: &FieldDef, raw: &JsonValue) -> Result<Value, FilterError> {
        let text = raw
            .as_str()
            .ok_or_else(|| cast_error(field, raw, "expected a UUID string"))?;
        let uuid = Uuid::parse_str(text.trim())
            .map_err(|err| cast_error(field, raw, &format!("invalid UUID: {err}")))?;
        Ok(Value::Uuid(Some(Box::new(uuid))))
    }

    fn cast_string(&self, field: &FieldDef, raw: &JsonValue) -> Result<Value, FilterError> {
        let text = match raw {
            JsonValue::String(text) => text.clone(),
            JsonValue::Number(number) => number.to_string(),
            JsonValue::Bool(flag) => flag.to_string(),
            _ => return Err(cast_error(field, raw, "expected a string")),
        };
        Ok(Value::String(Some(Box::new(text))))
    }

    fn cast_date(
        &self,
        field: &FieldDef,
        raw: &JsonValue,
        format: Option<&str>,
    ) -> Result<Value, FilterError> {
        let text = raw
            .as_str()
            .ok_or_else(|| cast_error(field, raw, "expected a date string"))?;
        let date = NaiveDate::parse_from_str(text.trim(), format.unwrap_or(DATE_FORMAT))
            .map_err(|err| cast_error(field, raw, &format!("invalid date: {err}")))?;
        Ok(Value::ChronoDate(Some(Box::new(date))))
    }

    fn cast_time(
        &self,
        field: &FieldDef,
        raw: &JsonValue,
        format: Option<&str>,
    ) -> Result<Value, FilterError> {
        let text = raw
            .as_str()
            .ok_or_else(|| cast_error(field, raw, "expected a time string"))?;
        let time = NaiveTime::parse_from_str(text.trim(), format.unwrap_or(TIME_FORMAT))
            .map_err(|err| cast_error(field, raw, &format!("invalid time: {err}")))?;
        Ok(Value::ChronoTime(Some(Box::new(time))))
    }

    fn cast_datetime(
        &self,
        field: &FieldDef,
        raw: &JsonValue,
        format: Option<&str>,
    ) -> Result<Value, FilterError> {
        let text = raw
            .as_str()
            .ok_or_else(|| cast_error(field, raw, "expected a datetime string"))?
            .trim();

        let parsed = match format {
            Some(format) => NaiveDateTime::parse_from_str(text, format).ok(),
            None => parse_datetime_lenient(text),
        };

        parsed
            .map(|datetime| Value::ChronoDateTime(Some(Box::new(datetime))))
            .ok_or_else(|| cast_error(field, raw, "invalid datetime"))
    }
}

/// RFC 3339 first, then the bare `YYYY-MM-DD HH:MM:SS` form, then a plain
/// date taken as midnight.
fn parse_datetime_lenient(text: &str) -> Option<NaiveDateTime> {
    if let Ok(datetime) = ChronoDateTime::parse_from_rfc3339(text) {
        return Some(datetime.naive_utc());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT) {
        return Some(datetime);
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn cast_error(field: &FieldDef, raw: &JsonValue, reason: &str) -> FilterError {
    tracing::debug!(field = %field.name, value = %raw, reason, "typecast failed");
    FilterError::Typecast {
        field: field.name.clone(),
        reason: reason.to_string(),
    }
}
