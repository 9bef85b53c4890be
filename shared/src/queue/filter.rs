//! Listing filters: date range, status view and paging

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AppError, ErrorCode};
use crate::models::ComplaintStatus;
use crate::util::start_of_days_ago_millis;

/// Default page size of the dashboard tables
pub const DEFAULT_PER_PAGE: u32 = 5;
/// Upper bound on a requested page size
pub const MAX_PER_PAGE: u32 = 100;

/// Date range filter, relative to today in the business zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFilter {
    Today,
    Last7Days,
    Last30Days,
    #[default]
    All,
}

impl DateFilter {
    /// Inclusive lower bound on `created_at`, `None` for no bound
    pub fn lower_bound(&self, now: i64, tz: Tz) -> Option<i64> {
        let days_back = match self {
            Self::Today => 0,
            Self::Last7Days => 6,
            Self::Last30Days => 29,
            Self::All => return None,
        };
        Some(start_of_days_ago_millis(now, days_back, tz))
    }
}

impl FromStr for DateFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "today" => Ok(Self::Today),
            "last7days" => Ok(Self::Last7Days),
            "last30days" => Ok(Self::Last30Days),
            "all" | "" => Ok(Self::All),
            other => Err(AppError::with_message(
                ErrorCode::InvalidFilter,
                format!("Invalid date filter: {other}"),
            )
            .with_detail("filter", other)),
        }
    }
}

/// Which part of the queue to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueView {
    /// Menunggu and Diproses
    Active,
    /// Selesai
    History,
    #[default]
    All,
}

impl QueueView {
    pub fn includes(&self, status: ComplaintStatus) -> bool {
        match self {
            Self::Active => status.is_active(),
            Self::History => !status.is_active(),
            Self::All => true,
        }
    }
}

impl FromStr for QueueView {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(Self::Active),
            "history" => Ok(Self::History),
            "all" | "" => Ok(Self::All),
            other => Err(AppError::with_message(
                ErrorCode::InvalidFilter,
                format!("Invalid view: {other}"),
            )
            .with_detail("view", other)),
        }
    }
}

/// Raw list query string
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub filter: Option<String>,
    pub view: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn offset(&self) -> u32 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Validated list parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListParams {
    pub filter: DateFilter,
    pub view: QueueView,
    /// No paging when absent
    pub page: Option<Page>,
}

impl ListQuery {
    pub fn validate(self) -> Result<ListParams, AppError> {
        let filter = self
            .filter
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();
        let view = self
            .view
            .as_deref()
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();

        let page = match (self.page, self.per_page) {
            (None, None) => None,
            (page, per_page) => Some(Page {
                page: page.unwrap_or(1).max(1),
                per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
            }),
        };

        Ok(ListParams { filter, view, page })
    }
}
