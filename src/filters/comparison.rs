//! Field-level filters: comparisons, null tests, patterns, membership and
//! ranges.

use sea_orm::Condition;
use sea_orm::sea_query::ExprTrait;
use serde_json::Value as JsonValue;

use crate::criteria::FilterSpec;
use crate::error::FilterError;
use crate::filters::Filter;
use crate::manager::FilterContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// Binary comparison of a field against a typecast value.
pub struct Comparison {
    op: ComparisonOp,
}

impl Comparison {
    #[must_use]
    pub fn new(op: ComparisonOp) -> Self {
        Self { op }
    }
}

impl Filter for Comparison {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError> {
        let resolved = ctx.resolve(spec.require_field()?)?;
        let value = ctx.cast(&resolved, spec.require_value()?, spec.format.as_deref())?;
        let column = resolved.expr();
        let expr = match self.op {
            ComparisonOp::Eq => column.eq(value),
            ComparisonOp::Neq => column.ne(value),
            ComparisonOp::Gt => column.gt(value),
            ComparisonOp::Gte => column.gte(value),
            ComparisonOp::Lt => column.lt(value),
            ComparisonOp::Lte => column.lte(value),
        };
        Ok(Condition::all().add(expr))
    }
}

/// IS NULL / IS NOT NULL.
pub struct NullCheck {
    negate: bool,
}

impl NullCheck {
    #[must_use]
    pub fn new(negate: bool) -> Self {
        Self { negate }
    }
}

impl Filter for NullCheck {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError> {
        let resolved = ctx.resolve(spec.require_field()?)?;
        let column = resolved.expr();
        let expr = if self.negate {
            column.is_not_null()
        } else {
            column.is_null()
        };
        Ok(Condition::all().add(expr))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeMatch {
    /// The value is the complete LIKE pattern, wildcards included.
    Pattern,
    /// Anchor at the start: `value%`.
    Begins,
    /// Anchor at the end: `%value`.
    Ends,
}

/// LIKE patterns, with optional negation.
pub struct Like {
    matching: LikeMatch,
    negate: bool,
}

impl Like {
    #[must_use]
    pub fn new(matching: LikeMatch, negate: bool) -> Self {
        Self { matching, negate }
    }

    fn pattern(&self, spec: &FilterSpec) -> Result<String, FilterError> {
        let raw = spec.require_value()?;
        let text = match raw {
            JsonValue::String(text) => text.clone(),
            JsonValue::Number(number) => number.to_string(),
            _ => {
                return Err(FilterError::Typecast {
                    field: spec.field.clone().unwrap_or_default(),
                    reason: "expected a string pattern".to_string(),
                });
            }
        };
        Ok(match self.matching {
            LikeMatch::Pattern => text,
            LikeMatch::Begins => format!("{text}%"),
            LikeMatch::Ends => format!("%{text}"),
        })
    }
}

impl Filter for Like {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError> {
        let resolved = ctx.resolve(spec.require_field()?)?;
        let pattern = self.pattern(spec)?;
        let column = resolved.expr();
        let expr = if self.negate {
            column.not_like(pattern)
        } else {
            column.like(pattern)
        };
        Ok(Condition::all().add(expr))
    }
}

/// IN / NOT IN over a JSON array, each element typecast individually.
pub struct InList {
    negate: bool,
}

impl InList {
    #[must_use]
    pub fn new(negate: bool) -> Self {
        Self { negate }
    }
}

impl Filter for InList {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError> {
        let resolved = ctx.resolve(spec.require_field()?)?;
        let raw = spec.require_value()?;
        let items = raw.as_array().ok_or_else(|| FilterError::Typecast {
            field: resolved.def.name.clone(),
            reason: "expected an array of values".to_string(),
        })?;
        let values = items
            .iter()
            .map(|item| ctx.cast(&resolved, item, spec.format.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;
        let column = resolved.expr();
        let expr = if self.negate {
            column.is_not_in(values)
        } else {
            column.is_in(values)
        };
        Ok(Condition::all().add(expr))
    }
}

/// BETWEEN `from` AND `to`, both bounds typecast.
pub struct Between;

impl Filter for Between {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError> {
        let resolved = ctx.resolve(spec.require_field()?)?;
        let (from, to) = spec.require_range()?;
        let from = ctx.cast(&resolved, from, spec.format.as_deref())?;
        let to = ctx.cast(&resolved, to, spec.format.as_deref())?;
        Ok(Condition::all().add(resolved.expr().between(from, to)))
    }
}
