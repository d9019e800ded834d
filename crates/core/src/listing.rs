//! Recipe listing filters and pagination.
//!
//! Query strings arrive as raw text and are coerced here, never rejected:
//! a malformed `page` becomes 1, a malformed `limit` the default. A present
//! but malformed `max_time` becomes 0 and still filters.

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// First page number.
pub const DEFAULT_PAGE: i64 = 1;

/// Default page size for `GET /api/recipes`.
pub const DEFAULT_LIST_LIMIT: i64 = 12;

/// Maximum page size for `GET /api/recipes`.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Default page size for `GET /api/favorites`.
pub const DEFAULT_FAVORITES_LIMIT: i64 = 12;

/// Maximum page size for `GET /api/favorites`.
pub const MAX_FAVORITES_LIMIT: i64 = 50;

/// Default number of entries for `GET /api/recipes/videos`.
pub const DEFAULT_VIDEOS_LIMIT: i64 = 8;

/// Maximum number of entries for `GET /api/recipes/videos`.
pub const MAX_VIDEOS_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Raw query parameters
// ---------------------------------------------------------------------------

/// Query string of `GET /api/recipes`, kept as raw text so that bad values
/// are coerced instead of failing extraction.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RecipeListQuery {
    pub q: Option<String>,
    pub ingredients: Option<String>,
    pub cuisine: Option<String>,
    pub max_time: Option<String>,
    pub has_video: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// `page`/`limit` query string shared by the other paginated endpoints.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Normalized listing predicate.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive title substring.
    pub title: Option<String>,
    /// Case-insensitive ingredient substrings, OR-combined.
    pub ingredients: Vec<String>,
    /// Exact cuisine label.
    pub cuisine: Option<String>,
    /// Upper bound on prep time; only set for positive values.
    pub max_prep_minutes: Option<i32>,
    /// Require a non-blank video URL (ignored when the column is absent).
    pub has_video: bool,
}

/// Resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl RecipeListQuery {
    /// Split the raw query into a filter and a page window.
    pub fn into_parts(self) -> (RecipeFilter, Pagination) {
        let pagination = resolve_pagination(
            self.page.as_deref(),
            self.limit.as_deref(),
            DEFAULT_LIST_LIMIT,
            MAX_LIST_LIMIT,
        );

        let max_prep_minutes = non_blank(self.max_time.as_deref()).map(|raw| {
            parse_int_prefix(&raw)
                .unwrap_or(0)
                .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        });

        let filter = RecipeFilter {
            title: non_blank(self.q.as_deref()),
            ingredients: self
                .ingredients
                .as_deref()
                .map(split_ingredient_terms)
                .unwrap_or_default(),
            cuisine: non_blank(self.cuisine.as_deref()),
            max_prep_minutes,
            has_video: self.has_video.as_deref().is_some_and(is_truthy),
        };

        (filter, pagination)
    }
}

impl PageQuery {
    /// Resolve against endpoint-specific limits.
    pub fn resolve(&self, default_limit: i64, max_limit: i64) -> Pagination {
        resolve_pagination(
            self.page.as_deref(),
            self.limit.as_deref(),
            default_limit,
            max_limit,
        )
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Coerce raw `page`/`limit` values into a valid window.
pub fn resolve_pagination(
    page: Option<&str>,
    limit: Option<&str>,
    default_limit: i64,
    max_limit: i64,
) -> Pagination {
    let page = page
        .and_then(parse_int_prefix)
        .unwrap_or(DEFAULT_PAGE)
        .max(1);
    let limit = clamp_limit(limit.and_then(parse_int_prefix), default_limit, max_limit);
    Pagination { page, limit }
}

/// Clamp a requested limit to `[1, max]`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, max)
}

/// Integer prefix of `raw`, the way browsers' form parsers read numbers:
/// leading whitespace and a sign are allowed, trailing junk is ignored.
///
/// Returns `None` when no digit leads the value or it overflows.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -value } else { value })
}

/// Comma-separated ingredient terms: trimmed, blanks dropped.
pub fn split_ingredient_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Escape `LIKE` metacharacters so `term` matches literally.
///
/// Uses backslash, PostgreSQL's default `LIKE` escape character.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%term%` with metacharacters escaped.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

/// Flag values that enable a boolean query parameter.
pub fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
