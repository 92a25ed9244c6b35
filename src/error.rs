use sea_orm::DbErr;
use thiserror::Error;

/// Errors produced while compiling or applying criteria.
///
/// Every failure in the compilation pipeline is typed: unknown names surface
/// the offending identifier, cast failures name the field, and database
/// errors raised while executing a filtered query pass through transparently.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("entity `{0}` is not registered")]
    UnknownEntity(String),

    #[error("field `{field}` does not exist on entity `{entity}`")]
    UnknownField { entity: String, field: String },

    #[error("association `{association}` does not exist on entity `{entity}`")]
    UnknownAssociation { entity: String, association: String },

    #[error("alias `{0}` does not reference a joined entity")]
    UnknownAlias(String),

    #[error("alias `{0}` is already in use")]
    DuplicateAlias(String),

    #[error("no filter is registered under the name `{0}`")]
    UnknownFilter(String),

    #[error("no sorter is registered under the name `{0}`")]
    UnknownSort(String),

    #[error("filter `{filter}` requires the `{option}` option")]
    MissingOption {
        filter: String,
        option: &'static str,
    },

    #[error("cannot cast value for field `{field}`: {reason}")]
    Typecast { field: String, reason: String },

    #[error("invalid criteria document: {0}")]
    InvalidCriteria(String),

    #[error(transparent)]
    Database(#[from] DbErr),
}

impl FilterError {
    /// True when the error was caused by the criteria document itself rather
    /// than by the database, which lets HTTP layers pick a 4xx status.
    #[must_use]
    pub fn is_criteria_error(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}
