//! Generic axum handlers for criteria-driven list endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use hyper::HeaderMap;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::Serialize;
use std::sync::Arc;

use crate::error::FilterError;
use crate::manager::QueryFilterManager;
use crate::pagination::calculate_content_range;
use crate::params::CriteriaParams;
use crate::traits::FilterableResource;

/// Shared state for the criteria handlers: the database connection plus the
/// compiler.
#[derive(Clone)]
pub struct FilterState {
    pub db: DatabaseConnection,
    pub manager: Arc<QueryFilterManager>,
}

impl FilterState {
    #[must_use]
    pub fn new(db: DatabaseConnection, manager: Arc<QueryFilterManager>) -> Self {
        Self { db, manager }
    }
}

/// List resources matching the request's criteria, with a Content-Range
/// header describing the returned page.
///
/// # Errors
///
/// Criteria errors (unknown fields, bad casts, malformed documents) map to
/// 400; database errors map to a sanitized 500.
pub async fn list_all<T>(
    Query(params): Query<CriteriaParams>,
    State(state): State<FilterState>,
) -> Result<(HeaderMap, Json<Vec<T>>), (StatusCode, Json<String>)>
where
    T: FilterableResource + Serialize,
    <T::Entity as EntityTrait>::Model: Send + Sync,
{
    let criteria = params.criteria().map_err(error_response)?;
    let (offset, limit) = params.pagination();

    let items = T::list(&state.db, &state.manager, &criteria, offset, limit)
        .await
        .map_err(error_response)?;
    let total = T::total(&state.db, &state.manager, &criteria)
        .await
        .map_err(error_response)?;

    let headers = calculate_content_range(offset, limit, total, T::RESOURCE_NAME_PLURAL);
    Ok((headers, Json(items)))
}

fn error_response(err: FilterError) -> (StatusCode, Json<String>) {
    if err.is_criteria_error() {
        (StatusCode::BAD_REQUEST, Json(err.to_string()))
    } else {
        tracing::error!(error = %err, "list query failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json("Internal Server Error".to_string()),
        )
    }
}
