//! Declarative filter, sort and join criteria compiled into Sea-ORM queries.
//!
//! A criteria document — usually a JSON query parameter — names filters by
//! short name (`eq`, `between`, `or`, `leftjoin`, …) and is compiled against
//! registered entity metadata into a Sea-ORM condition tree, join clauses
//! and ordering. Values are typecast to the target column's storage type
//! before binding.
//!
//! ```rust,ignore
//! use filtercrate::{Criteria, EntityMetadata, MetadataRegistry, QueryFilterManager};
//!
//! let registry = MetadataRegistry::default()
//!     .with_entity(EntityMetadata::from_entity::<accounts::Entity>("account"));
//! let manager = QueryFilterManager::new(registry);
//!
//! let criteria = Criteria::parse(
//!     r#"{"filters": [{"name": "gte", "field": "age", "value": 18}],
//!         "sort": [{"field": "name"}]}"#,
//! )?;
//! let select = manager.apply(accounts::Entity::find(), "account", &criteria)?;
//! ```

pub mod criteria;
pub mod error;
pub mod filters;
pub mod manager;
pub mod metadata;
pub mod pagination;
pub mod params;
pub mod routes;
pub mod sort;
pub mod traits;
pub mod typecast;

pub use criteria::{Criteria, Direction, FilterSpec, SortSpec};
pub use error::FilterError;
pub use filters::{Filter, FilterFactory};
pub use manager::{CompiledQuery, FilterContext, JoinClause, QueryFilterManager, ResolvedField};
pub use metadata::{AssociationDef, EntityMetadata, FieldDef, FieldType, MetadataRegistry};
pub use params::CriteriaParams;
pub use routes::FilterState;
pub use sort::{SortFactory, SortFilter};
pub use traits::FilterableResource;
pub use typecast::Typecaster;
