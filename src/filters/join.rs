//! Join filters: LEFT / INNER joins on registered associations.
//!
//! The `field` option names an association on the current scope's entity.
//! Nested `conditions` are compiled against the joined entity and become part
//! of the join's ON clause; the join's alias stays live for the rest of the
//! compilation, so later filters and sorts can reference joined columns by
//! dot-notation.

use sea_orm::sea_query::{Alias, Expr};
use sea_orm::{Condition, JoinType};

use crate::criteria::FilterSpec;
use crate::error::FilterError;
use crate::filters::Filter;
use crate::manager::{FilterContext, JoinClause};

pub struct Join {
    join_type: JoinType,
}

impl Join {
    #[must_use]
    pub fn left() -> Self {
        Self {
            join_type: JoinType::LeftJoin,
        }
    }

    #[must_use]
    pub fn inner() -> Self {
        Self {
            join_type: JoinType::InnerJoin,
        }
    }
}

impl Filter for Join {
    fn apply(
        &self,
        ctx: &mut FilterContext<'_>,
        spec: &FilterSpec,
    ) -> Result<Condition, FilterError> {
        let association = ctx.metadata()?.association(spec.require_field()?)?;
        let alias = match &spec.alias {
            Some(alias) => alias.clone(),
            None => ctx.next_alias(),
        };
        let target = ctx.metadata_for(&association.target)?;

        let on = Expr::col((
            Alias::new(ctx.alias()),
            Alias::new(&association.local_column),
        ))
        .equals((Alias::new(&alias), Alias::new(&association.foreign_column)));

        // The clause goes in before its nested conditions compile, so joins
        // always render parent-first and nested joins reference aliases that
        // are already in scope.
        let index = ctx.push_join(JoinClause {
            join_type: self.join_type,
            table: target.table().to_string(),
            alias: alias.clone(),
            on: Condition::all().add(on),
        });

        let nested = ctx.compile_in_scope(&association.target, &alias, &spec.conditions)?;
        if !nested.is_empty() {
            ctx.and_join_on(index, nested);
        }

        // The join contributes no WHERE fragment of its own.
        Ok(Condition::all())
    }
}
