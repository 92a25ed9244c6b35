//! The declarative criteria document.
//!
//! A [`Criteria`] value is the wire format consumed by the
//! [`QueryFilterManager`](crate::manager::QueryFilterManager): a list of named
//! filter specifications plus a list of sort specifications. Criteria are
//! usually parsed from a JSON query parameter but can equally be built in
//! code with the constructor helpers.
//!
//! ```json
//! {
//!   "filters": [
//!     {"name": "eq", "field": "status", "value": "active"},
//!     {"name": "or", "conditions": [
//!       {"name": "gte", "field": "age", "value": 18},
//!       {"name": "isnull", "field": "deleted_at"}
//!     ]},
//!     {"name": "leftjoin", "field": "orders", "alias": "o", "conditions": [
//!       {"name": "gt", "field": "total", "value": 100}
//!     ]}
//!   ],
//!   "sort": [{"field": "created_at", "direction": "desc"}]
//! }
//! ```

use sea_orm::Order;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::FilterError;

/// A complete filter/sort specification for one query.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Criteria {
    pub filters: Vec<FilterSpec>,
    pub sort: Vec<SortSpec>,
}

impl Criteria {
    /// Parse a criteria document from its JSON wire format.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidCriteria`] when the document is not
    /// valid JSON or does not match the criteria shape.
    pub fn parse(json: &str) -> Result<Self, FilterError> {
        serde_json::from_str(json).map_err(|err| FilterError::InvalidCriteria(err.to_string()))
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort.push(sort);
        self
    }

    /// True when the criteria neither filter nor sort, i.e. compiling it is
    /// a no-op.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.sort.is_empty()
    }
}

/// One filter item: the registered filter name plus its options.
///
/// Which options are required depends on the filter: comparisons need
/// `field` and `value`, `between` needs `from`/`to`, composites and joins
/// carry nested `conditions`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterSpec {
    /// Short name the filter is registered under, e.g. `eq` or `leftjoin`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Scope alias for join filters; generated when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<JsonValue>,
    /// Override for the chrono parse format of date/time values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<FilterSpec>,
}

impl FilterSpec {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
            alias: None,
            value: None,
            from: None,
            to: None,
            format: None,
            conditions: Vec::new(),
        }
    }

    /// Shorthand for a field comparison, e.g. `FilterSpec::comparison("eq", "age", 21.into())`.
    #[must_use]
    pub fn comparison(name: impl Into<String>, field: impl Into<String>, value: JsonValue) -> Self {
        Self::new(name).with_field(field).with_value(value)
    }

    /// Shorthand for a composite group, e.g. `FilterSpec::group("or", vec![..])`.
    #[must_use]
    pub fn group(name: impl Into<String>, conditions: Vec<FilterSpec>) -> Self {
        Self::new(name).with_conditions(conditions)
    }

    /// Shorthand for a join on a named association.
    #[must_use]
    pub fn join(
        name: impl Into<String>,
        association: impl Into<String>,
        conditions: Vec<FilterSpec>,
    ) -> Self {
        Self::new(name)
            .with_field(association)
            .with_conditions(conditions)
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: JsonValue) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_range(mut self, from: JsonValue, to: JsonValue) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    #[must_use]
    pub fn with_conditions(mut self, conditions: Vec<FilterSpec>) -> Self {
        self.conditions = conditions;
        self
    }

    pub(crate) fn require_field(&self) -> Result<&str, FilterError> {
        self.field
            .as_deref()
            .ok_or_else(|| self.missing("field"))
    }

    pub(crate) fn require_value(&self) -> Result<&JsonValue, FilterError> {
        self.value.as_ref().ok_or_else(|| self.missing("value"))
    }

    pub(crate) fn require_range(&self) -> Result<(&JsonValue, &JsonValue), FilterError> {
        let from = self.from.as_ref().ok_or_else(|| self.missing("from"))?;
        let to = self.to.as_ref().ok_or_else(|| self.missing("to"))?;
        Ok((from, to))
    }

    fn missing(&self, option: &'static str) -> FilterError {
        FilterError::MissingOption {
            filter: self.name.clone(),
            option,
        }
    }
}

/// One ORDER BY item, dispatched through the sort factory by `name`
/// (defaulting to the built-in `field` sorter).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SortSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default)]
    pub direction: Direction,
}

impl SortSpec {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            name: None,
            field: field.into(),
            alias: None,
            direction: Direction::Asc,
        }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            direction: Direction::Desc,
            ..Self::asc(field)
        }
    }

    #[must_use]
    pub fn sorter_name(&self) -> &str {
        self.name.as_deref().unwrap_or("field")
    }
}

/// Sort direction, parsed case-insensitively (`asc`/`ASC`, `desc`/`DESC`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub fn order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort direction `{other}`")),
        }
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Asc => "asc".to_string(),
            Direction::Desc => "desc".to_string(),
        }
    }
}

/// A field reference inside a criteria document: either bare (`total`,
/// resolved against the current scope) or dot-qualified (`o.total`, resolved
/// against the entity joined under alias `o`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldPath<'a> {
    pub alias: Option<&'a str>,
    pub field: &'a str,
}

impl<'a> FieldPath<'a> {
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('.') {
            Some((alias, field)) if !alias.is_empty() && !field.is_empty() => Self {
                alias: Some(alias),
                field,
            },
            _ => Self {
                alias: None,
                field: raw,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_minimal_document() {
        let criteria = Criteria::parse(r#"{"filters":[{"name":"eq","field":"a","value":1}]}"#)
            .expect("criteria should parse");
        assert_eq!(criteria.filters.len(), 1);
        assert_eq!(criteria.filters[0].name, "eq");
        assert_eq!(criteria.filters[0].value, Some(json!(1)));
        assert!(criteria.sort.is_empty());
    }

    #[test]
    fn rejects_malformed_documents() {
        let err = Criteria::parse("{not json").unwrap_err();
        assert!(matches!(err, FilterError::InvalidCriteria(_)));

        let err = Criteria::parse(r#"{"filters":[{"field":"a"}]}"#).unwrap_err();
        assert!(matches!(err, FilterError::InvalidCriteria(_)));
    }

    #[test]
    fn direction_is_case_insensitive() {
        let spec: SortSpec =
            serde_json::from_value(json!({"field": "age", "direction": "DESC"})).unwrap();
        assert_eq!(spec.direction, Direction::Desc);

        let spec: SortSpec = serde_json::from_value(json!({"field": "age"})).unwrap();
        assert_eq!(spec.direction, Direction::Asc);

        let err = serde_json::from_value::<SortSpec>(json!({"field": "age", "direction": "up"}));
        assert!(err.is_err());
    }

    #[test]
    fn field_path_splits_on_first_dot() {
        assert_eq!(
            FieldPath::parse("o.total"),
            FieldPath {
                alias: Some("o"),
                field: "total"
            }
        );
        assert_eq!(
            FieldPath::parse("total"),
            FieldPath {
                alias: None,
                field: "total"
            }
        );
        // A leading or trailing dot is not a scope reference.
        assert_eq!(FieldPath::parse(".total").alias, None);
        assert_eq!(FieldPath::parse("total.").alias, None);
    }

    #[test]
    fn missing_options_name_the_filter() {
        let spec = FilterSpec::new("between").with_field("age");
        let err = spec.require_range().unwrap_err();
        assert_eq!(
            err.to_string(),
            "filter `between` requires the `from` option"
        );
    }
}
