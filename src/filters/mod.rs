//! The filter hierarchy and its factory.
//!
//! Each filter turns one [`FilterSpec`] into a [`Condition`] fragment;
//! composite and join filters recurse through the [`FilterContext`] they are
//! handed. The [`FilterFactory`] maps the short names used in criteria
//! documents to filter instances and accepts custom registrations.

mod comparison;
mod composite;
mod join;

pub use comparison::{Between, Comparison, ComparisonOp, InList, Like, LikeMatch, NullCheck};
pub use composite::{AndX, Not, OrX};
pub use join::Join;

use sea_orm::Condition;
use std::collections::HashMap;
use std::sync::Arc;

use crate::criteria::FilterSpec;
use crate::error::FilterError;
use crate::manager::FilterContext;

/// A single clause type applicable to a query.
pub trait Filter: Send + Sync {
    /// Build the condition fragment for `spec` in the given scope.
    ///
    /// # Errors
    ///
    /// Implementations return [`FilterError`] for missing options, unknown
    /// fields and failing typecasts.
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError>;
}

/// Short filter name to instance lookup table.
///
/// `FilterFactory::default()` registers the standard set:
///
/// | names | clause |
/// |---|---|
/// | `eq` `neq` `gt` `gte` `lt` `lte` | comparisons |
/// | `isnull` `isnotnull` | null tests |
/// | `like` `notlike` `beginswith` `endswith` | patterns |
/// | `in` `notin` | membership |
/// | `between` | range |
/// | `and` `or` `not` | composites |
/// | `leftjoin` `innerjoin` | joins |
pub struct FilterFactory {
    filters: HashMap<String, Arc<dyn Filter>>,
}

impl Default for FilterFactory {
    fn default() -> Self {
        let mut factory = Self::empty();
        factory.register("eq", Arc::new(Comparison::new(ComparisonOp::Eq)));
        factory.register("neq", Arc::new(Comparison::new(ComparisonOp::Neq)));
        factory.register("gt", Arc::new(Comparison::new(ComparisonOp::Gt)));
        factory.register("gte", Arc::new(Comparison::new(ComparisonOp::Gte)));
        factory.register("lt", Arc::new(Comparison::new(ComparisonOp::Lt)));
        factory.register("lte", Arc::new(Comparison::new(ComparisonOp::Lte)));
        factory.register("isnull", Arc::new(NullCheck::new(false)));
        factory.register("isnotnull", Arc::new(NullCheck::new(true)));
        factory.register("like", Arc::new(Like::new(LikeMatch::Pattern, false)));
        factory.register("notlike", Arc::new(Like::new(LikeMatch::Pattern, true)));
        factory.register("beginswith", Arc::new(Like::new(LikeMatch::Begins, false)));
        factory.register("endswith", Arc::new(Like::new(LikeMatch::Ends, false)));
        factory.register("in", Arc::new(InList::new(false)));
        factory.register("notin", Arc::new(InList::new(true)));
        factory.register("between", Arc::new(Between));
        factory.register("and", Arc::new(AndX));
        factory.register("or", Arc::new(OrX));
        factory.register("not", Arc::new(Not));
        factory.register("leftjoin", Arc::new(Join::left()));
        factory.register("innerjoin", Arc::new(Join::inner()));
        factory
    }
}

impl FilterFactory {
    /// A factory with no registrations at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, filter: Arc<dyn Filter>) {
        self.filters.insert(name.into(), filter);
    }

    /// # Errors
    ///
    /// Returns [`FilterError::UnknownFilter`] when nothing is registered
    /// under `name`.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn Filter>, FilterError> {
        self.filters
            .get(name)
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }
}
