//! Pagination and ordering helpers for topic listings.
//!
//! `ORDER BY` cannot be bound as a query parameter, so the sortable columns
//! and directions are closed enums that render to fixed SQL fragments.

use std::str::FromStr;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of topics per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of topics per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Columns a topic listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicOrderColumn {
    Name,
    #[default]
    CreatedAt,
    UpdatedAt,
    Version,
}

impl TopicOrderColumn {
    pub fn as_sql(self) -> &'static str {
        match self {
            TopicOrderColumn::Name => "name",
            TopicOrderColumn::CreatedAt => "created_at",
            TopicOrderColumn::UpdatedAt => "updated_at",
            TopicOrderColumn::Version => "version",
        }
    }
}

impl FromStr for TopicOrderColumn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(TopicOrderColumn::Name),
            "created_at" | "createdAt" => Ok(TopicOrderColumn::CreatedAt),
            "updated_at" | "updatedAt" => Ok(TopicOrderColumn::UpdatedAt),
            "version" => Ok(TopicOrderColumn::Version),
            other => Err(CoreError::Validation(format!(
                "Invalid order_by '{other}'. Must be one of: name, created_at, updated_at, version"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

impl OrderDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

impl FromStr for OrderDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(OrderDirection::Asc),
            "desc" => Ok(OrderDirection::Desc),
            _ => Err(CoreError::Validation(format!(
                "Invalid order_direction '{s}'. Must be 'asc' or 'desc'"
            ))),
        }
    }
}

/// A fully-resolved page request for topic listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicPageRequest {
    pub limit: i64,
    pub offset: i64,
    pub order_by: TopicOrderColumn,
    pub direction: OrderDirection,
}

impl TopicPageRequest {
    /// Resolve raw query values, clamping numbers and rejecting unknown
    /// ordering keys.
    pub fn parse(
        limit: Option<i64>,
        offset: Option<i64>,
        order_by: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            limit: clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT),
            offset: clamp_offset(offset),
            order_by: order_by
                .map(str::parse::<TopicOrderColumn>)
                .transpose()?
                .unwrap_or_default(),
            direction: direction
                .map(str::parse::<OrderDirection>)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// The `ORDER BY` clause body. `id` breaks ties so pages are stable.
    pub fn order_clause(&self) -> String {
        format!(
            "{} {} NULLS LAST, id {}",
            self.order_by.as_sql(),
            self.direction.as_sql(),
            self.direction.as_sql()
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
