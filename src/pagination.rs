use axum::http::header::HeaderMap;

/// Build the Content-Range header for a paginated list response.
///
/// The range is reported as `resource start-end/total`, with `end` clamped
/// to the last available item.
///
/// # Panics
///
/// Panics if the formatted range is not a valid header value, which cannot
/// happen for numeric offsets and identifier-like resource names.
#[must_use]
pub fn calculate_content_range(
    offset: u64,
    limit: u64,
    total_count: u64,
    resource_name: &str,
) -> HeaderMap {
    let last = (offset + limit).saturating_sub(1).min(total_count);
    let content_range = format!("{resource_name} {offset}-{last}/{total_count}");

    let mut headers = HeaderMap::new();
    headers.insert("Content-Range", content_range.parse().unwrap());
    headers
}
