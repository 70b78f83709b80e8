//! Query-string serialization of filter state
//!
//! Produces the canonical query string the sites endpoints expect. The output
//! is a pure function of the state: fields are walked in a fixed order so the
//! same state always yields the same bytes.

use crate::filters::{FilterState, RangeExactEntry, SearchField};

/// Serialize filter state into a query string (without a leading `?`)
///
/// Order: `site_name`, `region`, `land_type`, `limit`, `offset`, then one
/// `q=` segment per range/exact entry. Absent and empty values are skipped,
/// zero is kept. Each `q=` segment lists `col` followed by whichever of
/// `score`, `min_score` and `max_score` are set, as `name:value` pairs
/// joined by commas. The entry's mode is never sent.
pub fn serialize_filters(state: &FilterState) -> String {
    let mut parts: Vec<String> = Vec::new();

    for field in SearchField::ALL {
        if let Some(value) = state.search.get(field).filter(|v| !v.is_empty()) {
            parts.push(encode_pair(field.as_str(), value));
        }
    }

    if let Some(limit) = state.pagination.limit {
        parts.push(encode_pair("limit", &limit.to_string()));
    }
    if let Some(offset) = state.pagination.offset {
        parts.push(encode_pair("offset", &offset.to_string()));
    }

    parts.extend(state.range_exact.iter().map(range_segment));

    parts.join("&")
}

/// Build a request URL from a base, an endpoint path and a query string
///
/// The `?` separator is only added when the query is non-empty.
pub fn build_url(base_url: &str, path: &str, query: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if query.is_empty() {
        format!("{base}/{path}")
    } else {
        format!("{base}/{path}?{query}")
    }
}

fn encode_pair(key: &str, value: &str) -> String {
    format!(
        "{}={}",
        urlencoding::encode(key),
        urlencoding::encode(value)
    )
}

fn range_segment(entry: &RangeExactEntry) -> String {
    let mut pairs = vec![format!("col:{}", entry.column.as_str())];

    let values = [
        ("score", entry.filter.score()),
        ("min_score", entry.filter.min_score()),
        ("max_score", entry.filter.max_score()),
    ];
    for (name, value) in values {
        if let Some(value) = value {
            pairs.push(format!("{name}:{value}"));
        }
    }

    format!("q={}", pairs.join(","))
}
