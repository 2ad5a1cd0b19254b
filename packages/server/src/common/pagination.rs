//! Offset pagination and allow-listed sorting for list endpoints.
//!
//! Query strings arrive as raw text (`?limit=10&offset=20&sort=+title`) and are
//! parsed here into a [`ListQuery`]. The sort column is resolved against a
//! per-entity enum implementing [`SortColumn`], so only known column names can
//! ever be rendered into SQL.
//!
//! # Usage
//!
//! ```rust,ignore
//! let query = params.into_list_query(Sort::desc(MovieSortColumn::Title))?;
//! let movies = Movie::find_paginated(&query, pool).await?;
//! ```

use serde::Deserialize;
use thiserror::Error;

/// Page size used when the client does not send `limit`.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page a client may request.
pub const MAX_LIMIT: i64 = 100;

// ============================================================================
// Errors
// ============================================================================

/// Rejected list/search query parameters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryParamError {
    #[error("Failed to parse limit")]
    InvalidLimit,

    #[error("limit must be between 1 and 100")]
    LimitOutOfRange,

    #[error("Failed to parse offset")]
    InvalidOffset,

    #[error("Unknown sort column: {0}")]
    UnknownSortColumn(String),
}

// ============================================================================
// Sorting
// ============================================================================

/// A column a list endpoint may be ordered by.
///
/// Implementors are closed enums; `as_sql` returns a static, qualified column
/// reference, never client text.
pub trait SortColumn: Copy + Send + Sync + 'static {
    /// Resolves a client-supplied column name against the allow-list.
    fn from_name(name: &str) -> Option<Self>;

    /// Column reference to render into `ORDER BY`.
    fn as_sql(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Asc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: SortColumn> Sort<C> {
    pub fn asc(column: C) -> Self {
        Sort {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: C) -> Self {
        Sort {
            column,
            direction: SortDirection::Desc,
        }
    }

    /// Parses `[+|-]<column>`. `+` sorts ascending; `-` or no sign sorts descending.
    ///
    /// An unescaped `+` in a query string decodes to a space, so a leading
    /// space also selects ascending order.
    pub fn parse(raw: &str) -> Result<Self, QueryParamError> {
        let raw = raw.trim_end();
        let (direction, name) = match raw.strip_prefix(['+', ' ']) {
            Some(rest) => (SortDirection::Asc, rest.trim_start()),
            None => (SortDirection::Desc, raw.strip_prefix('-').unwrap_or(raw)),
        };

        let column = C::from_name(name)
            .ok_or_else(|| QueryParamError::UnknownSortColumn(name.to_string()))?;

        Ok(Sort { column, direction })
    }

    /// `ORDER BY` body with `tiebreak` appended so pages stay stable.
    pub fn order_by_sql(&self, tiebreak: &str) -> String {
        let dir = self.direction.as_sql();
        format!("{} {}, {} {}", self.column.as_sql(), dir, tiebreak, dir)
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Validated limit/offset pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Page {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self, QueryParamError> {
        let limit = match non_empty(limit) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| QueryParamError::InvalidLimit)?,
            None => DEFAULT_LIMIT,
        };
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(QueryParamError::LimitOutOfRange);
        }

        let offset = match non_empty(offset) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| QueryParamError::InvalidOffset)?,
            None => 0,
        };
        if offset < 0 {
            return Err(QueryParamError::InvalidOffset);
        }

        Ok(Page { limit, offset })
    }
}

/// Everything a paginated, sorted list query needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery<C> {
    pub page: Page,
    pub sort: Sort<C>,
}

/// Raw `?limit=&offset=&sort=` parameters as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    pub fn into_list_query<C: SortColumn>(
        self,
        default_sort: Sort<C>,
    ) -> Result<ListQuery<C>, QueryParamError> {
        let page = Page::parse(self.limit.as_deref(), self.offset.as_deref())?;
        // Untrimmed: the leading character carries the direction
        let sort = match self.sort.as_deref().filter(|v| !v.trim().is_empty()) {
            Some(raw) => Sort::parse(raw)?,
            None => default_sort,
        };
        Ok(ListQuery { page, sort })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Col {
        Name,
        Age,
    }

    impl SortColumn for Col {
        fn from_name(name: &str) -> Option<Self> {
            match name {
                "name" => Some(Col::Name),
                "age" => Some(Col::Age),
                _ => None,
            }
        }

        fn as_sql(&self) -> &'static str {
            match self {
                Col::Name => "t.name",
                Col::Age => "t.age",
            }
        }
    }

    #[test]
    fn sort_prefix_selects_direction() {
        assert_eq!(Sort::<Col>::parse("+name").unwrap(), Sort::asc(Col::Name));
        assert_eq!(Sort::<Col>::parse("-age").unwrap(), Sort::desc(Col::Age));
        assert_eq!(Sort::<Col>::parse("age").unwrap(), Sort::desc(Col::Age));
    }

    #[test]
    fn decoded_plus_sorts_ascending() {
        assert_eq!(Sort::<Col>::parse(" name").unwrap(), Sort::asc(Col::Name));

        let query = ListParams {
            sort: Some(" age".to_string()),
            ..Default::default()
        }
        .into_list_query(Sort::desc(Col::Name))
        .unwrap();
        assert_eq!(query.sort, Sort::asc(Col::Age));
    }

    #[test]
    fn sort_rejects_columns_outside_the_allow_list() {
        let err = Sort::<Col>::parse("+name; DROP TABLE movies").unwrap_err();
        assert_eq!(
            err,
            QueryParamError::UnknownSortColumn("name; DROP TABLE movies".to_string())
        );
        assert!(Sort::<Col>::parse("+").is_err());
    }

    #[test]
    fn order_by_appends_tiebreak_in_same_direction() {
        let sort = Sort::asc(Col::Name);
        assert_eq!(sort.order_by_sql("t.id"), "t.name ASC, t.id ASC");
    }

    #[test]
    fn page_defaults_and_bounds() {
        assert_eq!(Page::parse(None, None).unwrap(), Page::default());
        assert_eq!(
            Page::parse(Some("25"), Some("50")).unwrap(),
            Page {
                limit: 25,
                offset: 50
            }
        );
        assert_eq!(Page::parse(Some(""), Some(" ")).unwrap(), Page::default());
        assert_eq!(
            Page::parse(Some("abc"), None),
            Err(QueryParamError::InvalidLimit)
        );
        assert_eq!(
            Page::parse(Some("0"), None),
            Err(QueryParamError::LimitOutOfRange)
        );
        assert_eq!(
            Page::parse(Some("101"), None),
            Err(QueryParamError::LimitOutOfRange)
        );
        assert_eq!(
            Page::parse(None, Some("-1")),
            Err(QueryParamError::InvalidOffset)
        );
    }

    #[test]
    fn list_params_fall_back_to_default_sort() {
        let query = ListParams::default()
            .into_list_query(Sort::desc(Col::Name))
            .unwrap();
        assert_eq!(query.sort, Sort::desc(Col::Name));
        assert_eq!(query.page, Page::default());
    }
}
