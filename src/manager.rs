//! Criteria compilation and application.
//!
//! [`QueryFilterManager`] is the entry point of the crate: it owns the
//! metadata registry, the filter and sort factories and the typecaster, and
//! turns a [`Criteria`] document into a [`CompiledQuery`] — a WHERE condition
//! tree, a list of join clauses and a list of order expressions — which is
//! then applied to a Sea-ORM [`Select`].
//!
//! Compilation is recursive: composite filters re-enter the compiler within
//! the same scope, join filters open a fresh scope (a new alias bound to the
//! joined entity's metadata) and merge their nested condition tree into the
//! join's ON clause. The shared [`FilterContext`] tracks which aliases are
//! live so dot-qualified field references resolve against the right entity.

use sea_orm::sea_query::{Alias, ColumnRef, Expr, IntoIden, SimpleExpr};
use sea_orm::{Condition, EntityTrait, JoinType, Order, QueryTrait, Select};
use std::collections::HashMap;
use std::sync::Arc;

use crate::criteria::{Criteria, FieldPath, FilterSpec};
use crate::error::FilterError;
use crate::filters::{Filter, FilterFactory};
use crate::metadata::{EntityMetadata, FieldDef, FieldType, MetadataRegistry};
use crate::sort::{SortFactory, SortFilter};
use crate::typecast::Typecaster;

/// Compiles criteria documents against registered entity metadata.
pub struct QueryFilterManager {
    metadata: MetadataRegistry,
    filters: FilterFactory,
    sorters: SortFactory,
    typecaster: Typecaster,
}

impl QueryFilterManager {
    #[must_use]
    pub fn new(metadata: MetadataRegistry) -> Self {
        Self {
            metadata,
            filters: FilterFactory::default(),
            sorters: SortFactory::default(),
            typecaster: Typecaster,
        }
    }

    /// Register a custom filter under `name`, replacing any existing
    /// registration.
    #[must_use]
    pub fn with_filter(mut self, name: impl Into<String>, filter: Arc<dyn Filter>) -> Self {
        self.filters.register(name, filter);
        self
    }

    /// Register a custom sorter under `name`, replacing any existing
    /// registration.
    #[must_use]
    pub fn with_sorter(mut self, name: impl Into<String>, sorter: Arc<dyn SortFilter>) -> Self {
        self.sorters.register(name, sorter);
        self
    }

    #[must_use]
    pub fn metadata(&self) -> &MetadataRegistry {
        &self.metadata
    }

    #[must_use]
    pub fn filters(&self) -> &FilterFactory {
        &self.filters
    }

    #[must_use]
    pub fn typecaster(&self) -> &Typecaster {
        &self.typecaster
    }

    /// Compile `criteria` against the metadata registered for `entity`.
    ///
    /// Compilation never touches the database. Filters are compiled before
    /// sorts so a sort can reference an alias introduced by a join filter.
    ///
    /// # Errors
    ///
    /// Any unknown entity/field/association/filter name or failing typecast
    /// aborts compilation with the corresponding [`FilterError`].
    pub fn compile(&self, entity: &str, criteria: &Criteria) -> Result<CompiledQuery, FilterError> {
        let meta = self.metadata.get(entity)?;
        let root_alias = meta.table().to_string();
        tracing::debug!(
            entity,
            filters = criteria.filters.len(),
            sorts = criteria.sort.len(),
            "compiling criteria"
        );

        let mut state = Compilation::new();
        state.aliases.insert(root_alias.clone(), entity.to_string());

        let mut ctx = FilterContext {
            manager: self,
            state: &mut state,
            entity: entity.to_string(),
            alias: root_alias,
        };

        let condition = ctx.compile(&criteria.filters)?;

        let mut order_by = Vec::with_capacity(criteria.sort.len());
        for spec in &criteria.sort {
            let sorter = self.sorters.get(spec.sorter_name())?.clone();
            order_by.push(sorter.apply(&mut ctx, spec)?);
        }

        Ok(CompiledQuery {
            condition,
            joins: state.joins,
            order_by,
        })
    }

    /// Compile `criteria` and apply the result to `select`.
    ///
    /// # Errors
    ///
    /// Propagates any compilation error; see [`Self::compile`].
    pub fn apply<E: EntityTrait>(
        &self,
        select: Select<E>,
        entity: &str,
        criteria: &Criteria,
    ) -> Result<Select<E>, FilterError> {
        Ok(self.compile(entity, criteria)?.apply_to(select))
    }
}

/// One compiled join clause.
#[derive(Debug, Clone)]
pub struct JoinClause {
    pub join_type: JoinType,
    /// Physical table of the joined entity.
    pub table: String,
    pub alias: String,
    /// Full ON condition: the association's column equality plus any nested
    /// conditions the join filter carried.
    pub on: Condition,
}

/// The output of criteria compilation, ready to apply to a select.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub condition: Condition,
    pub joins: Vec<JoinClause>,
    pub order_by: Vec<(SimpleExpr, Order)>,
}

impl CompiledQuery {
    /// Apply the compiled joins, condition and ordering to `select`.
    #[must_use]
    pub fn apply_to<E: EntityTrait>(self, mut select: Select<E>) -> Select<E> {
        let query = QueryTrait::query(&mut select);
        for join in self.joins {
            query.join_as(
                join.join_type,
                Alias::new(&join.table),
                Alias::new(&join.alias),
                join.on,
            );
        }
        query.cond_where(self.condition);
        for (expr, order) in self.order_by {
            query.order_by_expr(expr, order);
        }
        select
    }
}

/// Mutable state shared across one compilation: live aliases, collected
/// joins and the generated-alias sequence.
struct Compilation {
    /// alias -> registered entity name
    aliases: HashMap<String, String>,
    joins: Vec<JoinClause>,
    alias_seq: usize,
}

impl Compilation {
    fn new() -> Self {
        Self {
            aliases: HashMap::new(),
            joins: Vec::new(),
            alias_seq: 0,
        }
    }
}

/// A criteria field resolved to a concrete scope alias and field definition.
pub struct ResolvedField<'a> {
    pub alias: String,
    pub def: &'a FieldDef,
}

impl ResolvedField<'_> {
    #[must_use]
    pub fn column_ref(&self) -> ColumnRef {
        ColumnRef::TableColumn(
            Alias::new(&self.alias).into_iden(),
            Alias::new(&self.def.column).into_iden(),
        )
    }

    /// Column expression for comparisons. Enum-typed columns go through a
    /// text cast so native enum storage still matches string criteria.
    #[must_use]
    pub fn expr(&self) -> SimpleExpr {
        if self.def.field_type == FieldType::Enum {
            Expr::col(self.column_ref()).cast_as(Alias::new("text"))
        } else {
            SimpleExpr::Column(self.column_ref())
        }
    }

    /// Plain column expression, without the enum text cast; used for
    /// ORDER BY.
    #[must_use]
    pub fn order_expr(&self) -> SimpleExpr {
        SimpleExpr::Column(self.column_ref())
    }
}

/// The compilation scope handed to filters and sorters: the current entity
/// and alias, plus access to the manager and the shared compilation state.
pub struct FilterContext<'a> {
    manager: &'a QueryFilterManager,
    state: &'a mut Compilation,
    entity: String,
    alias: String,
}

impl<'a> FilterContext<'a> {
    /// Alias of the current scope.
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Metadata of the current scope's entity.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownEntity`] when the scope's entity is not
    /// registered.
    pub fn metadata(&self) -> Result<&'a EntityMetadata, FilterError> {
        self.manager.metadata.get(&self.entity)
    }

    /// Metadata of an arbitrary registered entity.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownEntity`] when `entity` is not
    /// registered.
    pub fn metadata_for(&self, entity: &str) -> Result<&'a EntityMetadata, FilterError> {
        self.manager.metadata.get(entity)
    }

    /// Resolve a (possibly dot-qualified) field reference against the
    /// current scope and the live join aliases.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownAlias`] for an unregistered alias and
    /// [`FilterError::UnknownField`] for a field the entity does not have.
    pub fn resolve(&self, field: &str) -> Result<ResolvedField<'a>, FilterError> {
        let path = FieldPath::parse(field);
        let (alias, entity) = match path.alias {
            Some(alias) => {
                let entity = self
                    .state
                    .aliases
                    .get(alias)
                    .ok_or_else(|| FilterError::UnknownAlias(alias.to_string()))?;
                (alias.to_string(), entity.clone())
            }
            None => (self.alias.clone(), self.entity.clone()),
        };
        let def = self.manager.metadata.get(&entity)?.field(path.field)?;
        Ok(ResolvedField { alias, def })
    }

    /// Typecast `raw` for the resolved field.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Typecast`] when the value cannot represent the
    /// field's type.
    pub fn cast(
        &self,
        resolved: &ResolvedField<'_>,
        raw: &serde_json::Value,
        format: Option<&str>,
    ) -> Result<sea_orm::Value, FilterError> {
        self.manager.typecaster.cast(resolved.def, raw, format)
    }

    /// Dispatch one filter spec through the factory.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownFilter`] for an unregistered name and
    /// whatever the filter itself produces.
    pub fn apply_one(&mut self, spec: &FilterSpec) -> Result<Condition, FilterError> {
        let filter = self.manager.filters.get(&spec.name)?.clone();
        filter.apply(self, spec)
    }

    /// Compile a list of specs in the current scope, AND-combined.
    ///
    /// # Errors
    ///
    /// Propagates the first failing spec.
    pub fn compile(&mut self, specs: &[FilterSpec]) -> Result<Condition, FilterError> {
        let mut condition = Condition::all();
        for spec in specs {
            let fragment = self.apply_one(spec)?;
            // Join filters return empty fragments; they carry their
            // conditions in the ON clause instead.
            if !fragment.is_empty() {
                condition = condition.add(fragment);
            }
        }
        Ok(condition)
    }

    /// Open a new scope under `alias` for `entity` and compile `specs`
    /// inside it. The alias becomes visible to every later field reference
    /// in this compilation.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::DuplicateAlias`] when the alias is already
    /// live; otherwise propagates compilation errors.
    pub fn compile_in_scope(
        &mut self,
        entity: &str,
        alias: &str,
        specs: &[FilterSpec],
    ) -> Result<Condition, FilterError> {
        if self.state.aliases.contains_key(alias) {
            return Err(FilterError::DuplicateAlias(alias.to_string()));
        }
        self.state
            .aliases
            .insert(alias.to_string(), entity.to_string());

        let mut child = FilterContext {
            manager: self.manager,
            state: &mut *self.state,
            entity: entity.to_string(),
            alias: alias.to_string(),
        };
        child.compile(specs)
    }

    /// Allocate the next generated join alias. Generated aliases never
    /// collide within a compilation.
    pub fn next_alias(&mut self) -> String {
        loop {
            self.state.alias_seq += 1;
            let alias = format!("j{}", self.state.alias_seq);
            if !self.state.aliases.contains_key(&alias) {
                return alias;
            }
        }
    }

    /// Append a join clause, returning its index so nested conditions can be
    /// merged into the ON clause afterwards. Joins are appended parent-first
    /// so every ON clause only references aliases already in scope.
    pub fn push_join(&mut self, join: JoinClause) -> usize {
        tracing::debug!(alias = %join.alias, table = %join.table, "join allocated");
        self.state.joins.push(join);
        self.state.joins.len() - 1
    }

    /// AND `condition` into the ON clause of the join at `index`.
    pub fn and_join_on(&mut self, index: usize, condition: Condition) {
        if let Some(join) = self.state.joins.get_mut(index) {
            let on = std::mem::replace(&mut join.on, Condition::all());
            join.on = on.add(condition);
        }
    }
}
