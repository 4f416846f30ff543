use crate::types::{CreateTweetParams, TweetListOptions, TweetPage, TweetRow, VideoRow};
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

const TWEET_COLUMNS: &str = r#"
    id, tweet_id, content, video_url, likes, retweets, views, "timestamp",
    author_id, author_name, author_username, author_profile_image_url, original_url,
    created_at, updated_at
"#;

/// Push the ranking predicates: tweets with a video, inside the period window
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, options: &TweetListOptions, now: DateTime<Utc>) {
    qb.push(" WHERE video_url IS NOT NULL");

    if let Some(cutoff) = options.period.cutoff(now) {
        qb.push(r#" AND "timestamp" >= "#);
        qb.push_bind(cutoff);
    }
}

/// Build the page query for a ranked listing
pub fn build_list_query(options: &TweetListOptions, now: DateTime<Utc>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {TWEET_COLUMNS} FROM tweets"));
    push_filters(&mut qb, options, now);

    qb.push(" ORDER BY ");
    qb.push(options.sort.order_by());
    qb.push(" LIMIT ");
    qb.push_bind(options.limit);
    qb.push(" OFFSET ");
    qb.push_bind(options.offset());
    qb
}

/// Build the total-count query matching [`build_list_query`]
pub fn build_count_query(options: &TweetListOptions, now: DateTime<Utc>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM tweets");
    push_filters(&mut qb, options, now);
    qb
}

/// List tweets with a video, ranked and paginated, with the total match count
pub async fn list_ranked(pool: &PgPool, options: &TweetListOptions) -> Result<TweetPage, sqlx::Error> {
    let now = Utc::now();

    let (total,): (i64,) = build_count_query(options, now)
        .build_query_as()
        .fetch_one(pool)
        .await?;

    let rows = build_list_query(options, now)
        .build_query_as::<TweetRow>()
        .fetch_all(pool)
        .await?;

    Ok(TweetPage { rows, total })
}

/// Get a tweet by its upstream tweet id
pub async fn get_by_tweet_id(pool: &PgPool, tweet_id: &str) -> Result<Option<TweetRow>, sqlx::Error> {
    sqlx::query_as::<_, TweetRow>(&format!(
        "SELECT {TWEET_COLUMNS} FROM tweets WHERE tweet_id = $1"
    ))
    .bind(tweet_id)
    .fetch_optional(pool)
    .await
}

/// Insert a tweet, returning the stored row
pub async fn create(pool: &PgPool, p: &CreateTweetParams) -> Result<TweetRow, sqlx::Error> {
    sqlx::query_as::<_, TweetRow>(&format!(
        r#"
        INSERT INTO tweets (
            tweet_id, content, video_url, likes, retweets, views, "timestamp",
            author_id, author_name, author_username, author_profile_image_url, original_url
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {TWEET_COLUMNS}
        "#
    ))
    .bind(&p.tweet_id)
    .bind(&p.content)
    .bind(&p.video_url)
    .bind(p.likes)
    .bind(p.retweets)
    .bind(p.views)
    .bind(p.timestamp)
    .bind(&p.author_id)
    .bind(&p.author_name)
    .bind(&p.author_username)
    .bind(&p.author_profile_image_url)
    .bind(&p.original_url)
    .fetch_one(pool)
    .await
}

/// Delete every tweet, returning how many were removed
pub async fn clear_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tweets").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Most-viewed tweets that carry a video
pub async fn list_videos(pool: &PgPool, limit: i64) -> Result<Vec<VideoRow>, sqlx::Error> {
    sqlx::query_as::<_, VideoRow>(
        r#"
        SELECT id, content, video_url, views, author_name, author_username, "timestamp"
        FROM tweets
        WHERE video_url IS NOT NULL
        ORDER BY views DESC NULLS LAST, "timestamp" DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Whether a unique constraint rejected the write
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|e| e.is_unique_violation())
}

/// Round-trip to the database
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Period, SortKey};

    fn normalize(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_list_query_with_period() {
        let options = TweetListOptions {
            period: Period::Week,
            sort: SortKey::Views,
            page: 2,
            limit: 10,
        };
        let qb = build_list_query(&options, Utc::now());
        let sql = normalize(qb.sql());

        assert!(sql.contains("FROM tweets WHERE video_url IS NOT NULL AND \"timestamp\" >= $1"));
        assert!(sql.contains("ORDER BY views DESC NULLS LAST, \"timestamp\" DESC, id ASC"));
        assert!(sql.ends_with("LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn test_list_query_all_time_has_no_window() {
        let options = TweetListOptions {
            period: Period::All,
            sort: SortKey::Latest,
            ..TweetListOptions::default()
        };
        let qb = build_list_query(&options, Utc::now());
        let sql = normalize(qb.sql());

        assert!(!sql.contains(">="));
        assert!(sql.contains("WHERE video_url IS NOT NULL ORDER BY \"timestamp\" DESC, id ASC"));
        assert!(sql.ends_with("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn test_count_query_matches_filters() {
        let options = TweetListOptions {
            period: Period::Day,
            ..TweetListOptions::default()
        };
        let qb = build_count_query(&options, Utc::now());

        assert_eq!(
            normalize(qb.sql()),
            "SELECT COUNT(*) FROM tweets WHERE video_url IS NOT NULL AND \"timestamp\" >= $1"
        );
    }

    #[test]
    fn test_columns_cover_tweet_row() {
        let columns = normalize(TWEET_COLUMNS);
        for column in ["tweet_id", "video_url", "\"timestamp\"", "author_profile_image_url", "updated_at"] {
            assert!(columns.contains(column), "missing {column}");
        }
    }
}
