//! ORDER BY dispatch, mirroring the filter side: a [`SortFactory`] maps
//! sorter names to [`SortFilter`] instances, with the built-in `field`
//! sorter resolving a (possibly dot-qualified) field to a column order.

use sea_orm::sea_query::SimpleExpr;
use sea_orm::Order;
use std::collections::HashMap;
use std::sync::Arc;

use crate::criteria::SortSpec;
use crate::error::FilterError;
use crate::manager::FilterContext;

/// One ORDER BY strategy.
pub trait SortFilter: Send + Sync {
    /// Resolve `spec` to an order expression in the given scope.
    ///
    /// # Errors
    ///
    /// Implementations return [`FilterError`] for unknown fields or aliases.
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &SortSpec,
    ) -> Result<(SimpleExpr, Order), FilterError>;
}

/// Orders by a resolved entity field. The `alias` option scopes a bare field
/// name to a joined entity, equivalent to dot-notation.
pub struct Field;

impl SortFilter for Field {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &SortSpec,
    ) -> Result<(SimpleExpr, Order), FilterError> {
        let reference = match &spec.alias {
            Some(alias) => format!("{alias}.{}", spec.field),
            None => spec.field.clone(),
        };
        let resolved = ctx.resolve(&reference)?;
        Ok((resolved.order_expr(), spec.direction.order()))
    }
}

/// Sorter name to instance lookup table; `field` is registered by default.
pub struct SortFactory {
    sorters: HashMap<String, Arc<dyn SortFilter>>,
}

impl Default for SortFactory {
    fn default() -> Self {
        let mut factory = Self {
            sorters: HashMap::new(),
        };
        factory.register("field", Arc::new(Field));
        factory
    }
}

impl SortFactory {
    pub fn register(&mut self, name: impl Into<String>, sorter: Arc<dyn SortFilter>) {
        self.sorters.insert(name.into(), sorter);
    }

    /// # Errors
    ///
    /// Returns [`FilterError::UnknownSort`] when nothing is registered under
    /// `name`.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn SortFilter>, FilterError> {
        self.sorters
            .get(name)
            .ok_or_else(|| FilterError::UnknownSort(name.to_string()))
    }
}
