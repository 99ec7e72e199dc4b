//! Navigational parameters: page, page size and status filter.
//!
//! Clamping to valid values happens here so the pagination functions
//! only ever see positive numbers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Default page number.
pub const DEFAULT_PAGE: usize = 1;

/// Default page size.
pub const DEFAULT_PER_PAGE: usize = 10;

/// Completion-status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Every todo
    #[default]
    All,
    /// Only completed todos
    Completed,
    /// Only todos not yet completed
    Pending,
}

impl StatusFilter {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }

    /// Whether an item with this completion flag passes the filter.
    #[must_use]
    pub const fn matches(&self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Completed => completed,
            Self::Pending => !completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(Error::InvalidArgument(format!("unknown status '{other}'"))),
        }
    }
}

/// The three navigational parameters honored by filter/paginate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    page: usize,
    per_page: usize,
    status: StatusFilter,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            status: StatusFilter::All,
        }
    }
}

impl PageQuery {
    /// Build a query, replacing non-positive numbers with defaults.
    #[must_use]
    pub fn new(page: usize, per_page: usize, status: StatusFilter) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            per_page: if per_page == 0 { DEFAULT_PER_PAGE } else { per_page },
            status,
        }
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    #[must_use]
    pub const fn status(&self) -> StatusFilter {
        self.status
    }

    /// Same filter, different page.
    #[must_use]
    pub fn with_page(self, page: usize) -> Self {
        Self::new(page, self.per_page, self.status)
    }

    /// Change the status filter. Resets to the first page.
    #[must_use]
    pub fn with_status(self, status: StatusFilter) -> Self {
        Self::new(DEFAULT_PAGE, self.per_page, status)
    }

    /// Change the page size. Resets to the first page.
    #[must_use]
    pub fn with_per_page(self, per_page: usize) -> Self {
        Self::new(DEFAULT_PAGE, per_page, self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("completed".parse::<StatusFilter>().unwrap(), StatusFilter::Completed);
        assert_eq!("PENDING".parse::<StatusFilter>().unwrap(), StatusFilter::Pending);
        assert!("done".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_new_replaces_zero_with_defaults() {
        let query = PageQuery::new(0, 0, StatusFilter::Pending);
        assert_eq!(query, PageQuery::default().with_status(StatusFilter::Pending));
        let query = PageQuery::new(3, 15, StatusFilter::Completed);
        assert_eq!(query.page(), 3);
        assert_eq!(query.per_page(), 15);
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let query = PageQuery::new(4, 5, StatusFilter::All);
        assert_eq!(query.with_status(StatusFilter::Completed).page(), 1);
        assert_eq!(query.with_per_page(20).page(), 1);
        assert_eq!(query.with_page(2).per_page(), 5);
    }
}
