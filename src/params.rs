//! HTTP query-parameter surface for criteria-driven list endpoints.

use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::criteria::Criteria;
use crate::error::FilterError;

const DEFAULT_LIMIT: u64 = 10;

/// Query parameters accepted by criteria-driven list endpoints.
///
/// # Criteria
///
/// The `criteria` parameter is a JSON-encoded criteria document:
///
/// ```json
/// {"filters": [{"name": "eq", "field": "status", "value": "active"}],
///  "sort": [{"field": "created_at", "direction": "desc"}]}
/// ```
///
/// # Pagination
///
/// Either `range` as an inclusive `[start, end]` index pair, or 1-based
/// `page`/`per_page`. Without both, the first ten items are returned.
#[derive(Deserialize, IntoParams, ToSchema, Default)]
#[into_params(parameter_in = Query)]
pub struct CriteriaParams {
    /// JSON-encoded criteria document with `filters` and `sort`.
    #[param(example = json!({
        "filters": [{"name": "eq", "field": "status", "value": "active"}],
        "sort": [{"field": "created_at", "direction": "desc"}]
    }))]
    pub criteria: Option<String>,
    /// Inclusive pagination range in the format "[start, end]".
    #[param(example = "[0,24]")]
    pub range: Option<String>,
    /// 1-based page number; used together with `per_page`.
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl CriteriaParams {
    /// Parse the `criteria` parameter, defaulting to empty criteria when
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidCriteria`] for a malformed document.
    pub fn criteria(&self) -> Result<Criteria, FilterError> {
        match &self.criteria {
            Some(json) => Criteria::parse(json),
            None => Ok(Criteria::default()),
        }
    }

    /// Resolve the pagination parameters to an `(offset, limit)` pair.
    #[must_use]
    pub fn pagination(&self) -> (u64, u64) {
        if let (Some(page), Some(per_page)) = (self.page, self.per_page) {
            return (page.saturating_sub(1) * per_page, per_page);
        }
        if let Some(range) = &self.range {
            if let Ok([start, end]) = serde_json::from_str::<[u64; 2]>(range) {
                return (start, end.saturating_sub(start) + 1);
            }
        }
        (0, DEFAULT_LIMIT)
    }
}
