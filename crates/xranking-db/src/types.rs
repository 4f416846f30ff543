use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

/// Tweet row returned from SELECT queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct TweetRow {
    pub id: String,
    pub tweet_id: String,
    #[ts(optional)]
    pub content: Option<String>,
    #[ts(optional)]
    pub video_url: Option<String>,
    #[ts(optional)]
    pub likes: Option<i32>,
    #[ts(optional)]
    pub retweets: Option<i32>,
    #[ts(optional)]
    pub views: Option<i32>,
    pub timestamp: DateTime<Utc>,
    #[ts(optional)]
    pub author_id: Option<String>,
    #[ts(optional)]
    pub author_name: Option<String>,
    #[ts(optional)]
    pub author_username: Option<String>,
    #[ts(optional)]
    pub author_profile_image_url: Option<String>,
    #[ts(optional)]
    pub original_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Slim row for the video list
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct VideoRow {
    pub id: String,
    #[ts(optional)]
    pub content: Option<String>,
    pub video_url: String,
    #[ts(optional)]
    pub views: Option<i32>,
    #[ts(optional)]
    pub author_name: Option<String>,
    #[ts(optional)]
    pub author_username: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Ranking time window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Period {
    Day,
    #[default]
    Week,
    Month,
    All,
}

impl Period {
    /// Earliest eligible tweet timestamp, or `None` for no window
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Period::Day => Some(now - TimeDelta::days(1)),
            Period::Week => Some(now - TimeDelta::days(7)),
            Period::Month => Some(
                now.checked_sub_months(Months::new(1))
                    .unwrap_or(now - TimeDelta::days(30)),
            ),
            Period::All => None,
        }
    }
}

impl FromStr for Period {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "all" => Ok(Period::All),
            other => Err(UnknownValue {
                field: "period",
                value: other.to_string(),
            }),
        }
    }
}

/// Ranking order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SortKey {
    #[default]
    Likes,
    Retweets,
    Views,
    Latest,
}

impl SortKey {
    /// ORDER BY clause, metric first, then newest, then id for a stable order
    pub fn order_by(&self) -> &'static str {
        match self {
            SortKey::Likes => "likes DESC NULLS LAST, \"timestamp\" DESC, id ASC",
            SortKey::Retweets => "retweets DESC NULLS LAST, \"timestamp\" DESC, id ASC",
            SortKey::Views => "views DESC NULLS LAST, \"timestamp\" DESC, id ASC",
            SortKey::Latest => "\"timestamp\" DESC, id ASC",
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "likes" => Ok(SortKey::Likes),
            "retweets" => Ok(SortKey::Retweets),
            "views" => Ok(SortKey::Views),
            "latest" | "timestamp" => Ok(SortKey::Latest),
            other => Err(UnknownValue {
                field: "sort",
                value: other.to_string(),
            }),
        }
    }
}

/// A query parameter outside its allowed set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.field, self.value)
    }
}

impl std::error::Error for UnknownValue {}

/// Options for ranked tweet queries
#[derive(Debug, Clone)]
pub struct TweetListOptions {
    pub period: Period,
    pub sort: SortKey,
    /// 1-based
    pub page: i64,
    pub limit: i64,
}

impl TweetListOptions {
    /// Row offset for the page, saturating for pages past any real table
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit.max(0))
    }
}

impl Default for TweetListOptions {
    fn default() -> Self {
        Self {
            period: Period::default(),
            sort: SortKey::default(),
            page: 1,
            limit: 20,
        }
    }
}

/// One page of ranked tweets
#[derive(Debug, Clone)]
pub struct TweetPage {
    pub rows: Vec<TweetRow>,
    pub total: i64,
}

impl TweetPage {
    pub fn page_count(&self, limit: i64) -> i64 {
        if limit <= 0 {
            return 0;
        }
        (self.total + limit - 1) / limit
    }
}

/// Parameters for inserting a tweet
#[derive(Debug, Clone)]
pub struct CreateTweetParams {
    pub tweet_id: String,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub likes: i32,
    pub retweets: i32,
    pub views: i32,
    pub timestamp: DateTime<Utc>,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub author_username: Option<String>,
    pub author_profile_image_url: Option<String>,
    pub original_url: Option<String>,
}
