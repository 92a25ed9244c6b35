//! Entity metadata the compiler resolves criteria against.
//!
//! Field tables are derived from Sea-ORM's column reflection
//! ([`EntityMetadata::from_entity`]); associations are registered explicitly
//! since Sea-ORM relations carry no stable runtime names.

use sea_orm::{ColumnTrait, ColumnType, EntityName, EntityTrait, IdenStatic, Iterable};
use std::collections::HashMap;

use crate::error::FilterError;

/// The storage-type vocabulary the typecaster understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Uuid,
    Date,
    Time,
    DateTime,
    Json,
    /// Native enum or custom column types; compared through a text cast.
    Enum,
}

impl FieldType {
    #[must_use]
    pub fn from_column_type(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => Self::String,
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned
            | ColumnType::Year => Self::Integer,
            ColumnType::Float
            | ColumnType::Double
            | ColumnType::Decimal(_)
            | ColumnType::Money(_) => Self::Float,
            ColumnType::Boolean => Self::Boolean,
            ColumnType::Date => Self::Date,
            ColumnType::Time => Self::Time,
            ColumnType::DateTime
            | ColumnType::Timestamp
            | ColumnType::TimestampWithTimeZone => Self::DateTime,
            ColumnType::Uuid => Self::Uuid,
            ColumnType::Json | ColumnType::JsonBinary => Self::Json,
            ColumnType::Enum { .. } | ColumnType::Custom(_) => Self::Enum,
            _ => Self::String,
        }
    }
}

/// A filterable/sortable field on an entity.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Name the criteria document uses.
    pub name: String,
    /// Physical column name.
    pub column: String,
    pub field_type: FieldType,
}

impl FieldDef {
    #[must_use]
    pub fn new(name: impl Into<String>, column: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            field_type,
        }
    }
}

/// A joinable association to another registered entity.
#[derive(Debug, Clone)]
pub struct AssociationDef {
    /// Name the criteria document uses.
    pub name: String,
    /// Registry name of the joined entity.
    pub target: String,
    /// Join column on the owning entity.
    pub local_column: String,
    /// Join column on the target entity.
    pub foreign_column: String,
}

impl AssociationDef {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        target: impl Into<String>,
        local_column: impl Into<String>,
        foreign_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            local_column: local_column.into(),
            foreign_column: foreign_column.into(),
        }
    }
}

/// Field and association tables for one entity.
#[derive(Debug, Clone)]
pub struct EntityMetadata {
    name: String,
    table: String,
    fields: HashMap<String, FieldDef>,
    associations: HashMap<String, AssociationDef>,
}

impl EntityMetadata {
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            fields: HashMap::new(),
            associations: HashMap::new(),
        }
    }

    /// Build metadata from a Sea-ORM entity: the table name and one
    /// [`FieldDef`] per column, typed from the column definition.
    #[must_use]
    pub fn from_entity<E: EntityTrait>(name: impl Into<String>) -> Self {
        let mut meta = Self::new(name, E::default().table_name().to_string());
        for column in E::Column::iter() {
            let field_type = FieldType::from_column_type(column.def().get_column_type());
            meta.fields.insert(
                column.as_str().to_string(),
                FieldDef::new(column.as_str(), column.as_str(), field_type),
            );
        }
        meta
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    #[must_use]
    pub fn with_association(mut self, association: AssociationDef) -> Self {
        self.associations
            .insert(association.name.clone(), association);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn has_association(&self, name: &str) -> bool {
        self.associations.contains_key(name)
    }

    /// # Errors
    ///
    /// Returns [`FilterError::UnknownField`] when no field of that name is
    /// registered.
    pub fn field(&self, name: &str) -> Result<&FieldDef, FilterError> {
        self.fields.get(name).ok_or_else(|| FilterError::UnknownField {
            entity: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns [`FilterError::UnknownAssociation`] when no association of
    /// that name is registered.
    pub fn association(&self, name: &str) -> Result<&AssociationDef, FilterError> {
        self.associations
            .get(name)
            .ok_or_else(|| FilterError::UnknownAssociation {
                entity: self.name.clone(),
                association: name.to_string(),
            })
    }
}

/// Logical entity name to metadata lookup table.
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    entities: HashMap<String, EntityMetadata>,
}

impl MetadataRegistry {
    pub fn register(&mut self, metadata: EntityMetadata) {
        self.entities.insert(metadata.name().to_string(), metadata);
    }

    #[must_use]
    pub fn with_entity(mut self, metadata: EntityMetadata) -> Self {
        self.register(metadata);
        self
    }

    /// # Errors
    ///
    /// Returns [`FilterError::UnknownEntity`] when the name was never
    /// registered.
    pub fn get(&self, name: &str) -> Result<&EntityMetadata, FilterError> {
        self.entities
            .get(name)
            .ok_or_else(|| FilterError::UnknownEntity(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_metadata_round_trips() {
        let meta = EntityMetadata::new("ticket", "tickets")
            .with_field(FieldDef::new("state", "state", FieldType::Enum))
            .with_association(AssociationDef::new("owner", "user", "owner_id", "id"));

        assert_eq!(meta.table(), "tickets");
        assert!(meta.has_field("state"));
        assert!(!meta.has_field("missing"));
        assert_eq!(meta.field("state").unwrap().field_type, FieldType::Enum);
        assert_eq!(meta.association("owner").unwrap().target, "user");

        let err = meta.field("missing").unwrap_err();
        assert_eq!(
            err.to_string(),
            "field `missing` does not exist on entity `ticket`"
        );
    }

    #[test]
    fn registry_reports_unknown_entities() {
        let registry = MetadataRegistry::default();
        assert!(matches!(
            registry.get("nope"),
            Err(FilterError::UnknownEntity(_))
        ));
    }

    #[test]
    fn column_types_map_to_field_types() {
        assert_eq!(
            FieldType::from_column_type(&ColumnType::BigInteger),
            FieldType::Integer
        );
        assert_eq!(
            FieldType::from_column_type(&ColumnType::Text),
            FieldType::String
        );
        assert_eq!(
            FieldType::from_column_type(&ColumnType::TimestampWithTimeZone),
            FieldType::DateTime
        );
        assert_eq!(
            FieldType::from_column_type(&ColumnType::Uuid),
            FieldType::Uuid
        );
    }
}
