use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use xranking_db::{CreateTweetParams, Period, SortKey, TweetListOptions, TweetRow};

use crate::constants::{
    DEFAULT_TWEET_LIMIT, MAX_TWEET_LIMIT, MAX_TWEET_PAGE, VIDEO_BY_TWEET_PATH, VIDEO_PROXY_PATH,
};
use crate::error::AppError;
use crate::state::AppState;

/// A tweet as the UI consumes it: the row plus a same-origin video URL
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    #[serde(flatten)]
    tweet: TweetRow,
    processed_video_url: Option<String>,
}

impl From<TweetRow> for TweetView {
    fn from(tweet: TweetRow) -> Self {
        let processed_video_url = tweet.video_url.as_deref().map(processed_video_url);
        Self {
            tweet,
            processed_video_url,
        }
    }
}

/// Route a source video URL through the proxy
pub fn processed_video_url(video_url: &str) -> String {
    format!("{}?url={}", VIDEO_PROXY_PATH, urlencoding::encode(video_url))
}

#[derive(Deserialize)]
pub struct ListParams {
    period: Option<String>,
    sort: Option<String>,
    page: Option<i64>,
    limit: Option<i64>,
}

fn list_options(params: &ListParams) -> Result<TweetListOptions, AppError> {
    let period = match params.period.as_deref() {
        Some(p) => p.parse::<Period>()?,
        None => Period::default(),
    };
    let sort = match params.sort.as_deref() {
        Some(s) => s.parse::<SortKey>()?,
        None => SortKey::default(),
    };

    Ok(TweetListOptions {
        period,
        sort,
        page: params.page.unwrap_or(1).clamp(1, MAX_TWEET_PAGE),
        limit: params
            .limit
            .unwrap_or(DEFAULT_TWEET_LIMIT)
            .clamp(1, MAX_TWEET_LIMIT),
    })
}

/// GET /api/tweets?period=&sort=&page=&limit=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, AppError> {
    let options = list_options(&params)?;
    let page = xranking_db::tweets::list_ranked(&state.pool, &options).await?;
    let page_count = page.page_count(options.limit);

    let tweets: Vec<TweetView> = page.rows.into_iter().map(TweetView::from).collect();

    Ok(Json(json!({
        "tweets": tweets,
        "meta": {
            "total": page.total,
            "page": options.page,
            "limit": options.limit,
            "pageCount": page_count,
        }
    })))
}

/// GET /api/tweets/single/{id}
pub async fn get_single(
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let tweet = xranking_db::tweets::get_by_tweet_id(&state.pool, &tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".into()))?;

    Ok(Json(json!({ "tweet": TweetView::from(tweet) })))
}

/// GET /api/tweets/{id}
///
/// The bare row, with `videoUrl` pointing at this service's per-tweet video
/// route instead of the source.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(tweet_id): Path<String>,
) -> Result<Json<TweetRow>, AppError> {
    let tweet = xranking_db::tweets::get_by_tweet_id(&state.pool, &tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".into()))?;

    Ok(Json(with_video_route(tweet)))
}

fn with_video_route(mut tweet: TweetRow) -> TweetRow {
    if tweet.video_url.is_some() {
        tweet.video_url = Some(format!(
            "{}/{}",
            VIDEO_BY_TWEET_PATH,
            urlencoding::encode(&tweet.tweet_id)
        ));
    }
    tweet
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTweetBody {
    tweet_id: Option<String>,
    content: Option<String>,
    video_url: Option<String>,
    likes: Option<i32>,
    retweets: Option<i32>,
    views: Option<i32>,
    timestamp: Option<DateTime<Utc>>,
    author_id: Option<String>,
    author_name: Option<String>,
    author_username: Option<String>,
    author_profile_image_url: Option<String>,
    original_url: Option<String>,
}

/// POST /api/tweets
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateTweetBody>,
) -> Result<Json<Value>, AppError> {
    let tweet_id = body
        .tweet_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("tweetId is required".into()))?;

    let params = CreateTweetParams {
        tweet_id,
        content: body.content,
        video_url: body.video_url.filter(|u| !u.is_empty()),
        likes: body.likes.unwrap_or(0),
        retweets: body.retweets.unwrap_or(0),
        views: body.views.unwrap_or(0),
        timestamp: body.timestamp.unwrap_or_else(Utc::now),
        author_id: body.author_id,
        author_name: body.author_name,
        author_username: body.author_username,
        author_profile_image_url: body.author_profile_image_url,
        original_url: body.original_url,
    };

    let row = xranking_db::tweets::create(&state.pool, &params)
        .await
        .map_err(|e| {
            if xranking_db::tweets::is_unique_violation(&e) {
                AppError::Conflict(format!("Tweet {} already exists", params.tweet_id))
            } else {
                AppError::Database(e)
            }
        })?;

    info!(tweet_id = %row.tweet_id, "Created tweet");
    Ok(Json(json!(TweetView::from(row))))
}

/// DELETE /api/tweets/clear
pub async fn clear(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let deleted = xranking_db::tweets::clear_all(&state.pool).await?;
    info!(deleted, "Cleared tweet table");

    Ok(Json(json!({
        "success": true,
        "message": format!("Deleted {deleted} tweets"),
        "deleted": deleted,
    })))
}
