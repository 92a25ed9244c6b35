//! Composite filters: AND / OR / NOT groupings over nested conditions.
//!
//! Composites recurse within the current scope, so a nested condition sees
//! the same entity and the same live join aliases as its parent.

use sea_orm::Condition;

use crate::criteria::FilterSpec;
use crate::error::FilterError;
use crate::filters::Filter;
use crate::manager::FilterContext;

/// AND group. An empty group is a no-op.
pub struct AndX;

impl Filter for AndX {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError> {
        ctx.compile(&spec.conditions)
    }
}

/// OR group.
pub struct OrX;

impl Filter for OrX {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError> {
        let mut condition = Condition::any();
        for sub in &spec.conditions {
            let fragment = ctx.apply_one(sub)?;
            if !fragment.is_empty() {
                condition = condition.add(fragment);
            }
        }
        Ok(condition)
    }
}

/// Negated AND group.
pub struct Not;

impl Filter for Not {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError> {
        Ok(ctx.compile(&spec.conditions)?.not())
    }
}
