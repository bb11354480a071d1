//! Enumerated request parameters accepted by listing and search calls

use crate::error::RedditClientError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recency window for top and search queries
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeFilter {
    pub const ALL_VALUES: [TimeFilter; 6] = [
        TimeFilter::Hour,
        TimeFilter::Day,
        TimeFilter::Week,
        TimeFilter::Month,
        TimeFilter::Year,
        TimeFilter::All,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFilter::Hour => "hour",
            TimeFilter::Day => "day",
            TimeFilter::Week => "week",
            TimeFilter::Month => "month",
            TimeFilter::Year => "year",
            TimeFilter::All => "all",
        }
    }
}

impl FromStr for TimeFilter {
    type Err = RedditClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TimeFilter::ALL_VALUES
            .iter()
            .copied()
            .find(|filter| filter.as_str() == value)
            .ok_or_else(|| {
                RedditClientError::invalid(
                    "time_filter",
                    format!(
                        "'{}' is not one of hour, day, week, month, year, all",
                        value
                    ),
                )
            })
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering of search results
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    #[default]
    Relevance,
    Hot,
    Top,
    New,
    Comments,
}

impl SearchSort {
    pub const ALL_VALUES: [SearchSort; 5] = [
        SearchSort::Relevance,
        SearchSort::Hot,
        SearchSort::Top,
        SearchSort::New,
        SearchSort::Comments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchSort::Relevance => "relevance",
            SearchSort::Hot => "hot",
            SearchSort::Top => "top",
            SearchSort::New => "new",
            SearchSort::Comments => "comments",
        }
    }
}

impl FromStr for SearchSort {
    type Err = RedditClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SearchSort::ALL_VALUES
            .iter()
            .copied()
            .find(|sort| sort.as_str() == value)
            .ok_or_else(|| {
                RedditClientError::invalid(
                    "sort",
                    format!(
                        "'{}' is not one of relevance, hot, top, new, comments",
                        value
                    ),
                )
            })
    }
}

impl fmt::Display for SearchSort {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which subreddit listing to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Hot,
    New,
    Top(TimeFilter),
}

impl ListingKind {
    /// Path segment of the listing endpoint
    pub fn path(&self) -> &'static str {
        match self {
            ListingKind::Hot => "hot",
            ListingKind::New => "new",
            ListingKind::Top(_) => "top",
        }
    }

    pub fn time_filter(&self) -> Option<TimeFilter> {
        match self {
            ListingKind::Top(filter) => Some(*filter),
            _ => None,
        }
    }
}
