//! Saved route search persistence.
//!
//! Searches are always scoped to their owner; a lookup with another user's
//! id behaves exactly like a missing row.

use anyhow::{Context, Result};
use carbon_core::{Coordinates, ModeComparison, RouteAnalysis, RouteInfo, RouteRequest, TransportMode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::db::{parse_timestamp, timestamp};

const SEARCH_COLUMNS: &str = "id, user_id, origin_name, origin_lat, origin_lon, \
     destination_name, destination_lat, destination_lon, weight_kg, \
     shortest_route, efficient_route, mode_comparison, created_at";

/// A stored search. Route geometry is not kept.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRecord {
    pub id: String,
    #[serde(skip)]
    pub user_id: String,
    pub origin_name: String,
    pub origin_coordinates: Coordinates,
    pub destination_name: String,
    pub destination_coordinates: Coordinates,
    pub weight_kg: f64,
    pub shortest_route: RouteInfo,
    pub efficient_route: RouteInfo,
    pub mode_comparison: Vec<ModeComparison>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub shortest_mode: Option<TransportMode>,
    pub efficient_mode: Option<TransportMode>,
    /// Case-insensitive substring, matched against the Unicode-folded column.
    pub origin_name: Option<String>,
    pub destination_name: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

pub async fn insert_search(
    pool: &SqlitePool,
    user_id: &str,
    request: &RouteRequest,
    analysis: &RouteAnalysis,
) -> Result<SearchRecord> {
    let record = SearchRecord {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        origin_name: request.origin_name.clone(),
        origin_coordinates: request.origin_coordinates,
        destination_name: request.destination_name.clone(),
        destination_coordinates: request.destination_coordinates,
        weight_kg: request.weight_kg,
        shortest_route: analysis.shortest_route.without_geometry(),
        efficient_route: analysis.efficient_route.without_geometry(),
        mode_comparison: analysis.mode_comparison.clone(),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO searches (
            id, user_id,
            origin_name, origin_name_folded, origin_lat, origin_lon,
            destination_name, destination_name_folded, destination_lat, destination_lon,
            weight_kg, shortest_mode, efficient_mode,
            shortest_route, efficient_route, mode_comparison, created_at
        )
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)
        "#,
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(&record.origin_name)
    .bind(record.origin_name.to_lowercase())
    .bind(record.origin_coordinates.latitude)
    .bind(record.origin_coordinates.longitude)
    .bind(&record.destination_name)
    .bind(record.destination_name.to_lowercase())
    .bind(record.destination_coordinates.latitude)
    .bind(record.destination_coordinates.longitude)
    .bind(record.weight_kg)
    .bind(record.shortest_route.transport_mode.as_str())
    .bind(record.efficient_route.transport_mode.as_str())
    .bind(serde_json::to_string(&record.shortest_route)?)
    .bind(serde_json::to_string(&record.efficient_route)?)
    .bind(serde_json::to_string(&record.mode_comparison)?)
    .bind(timestamp(record.created_at))
    .execute(pool)
    .await
    .context("inserting search")?;

    Ok(record)
}

/// One page of a user's searches, newest first, plus the total match count.
pub async fn list_searches(
    pool: &SqlitePool,
    user_id: &str,
    filter: &SearchFilter,
    page: u32,
    page_size: u32,
) -> Result<(Vec<SearchRecord>, i64)> {
    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM searches");
    push_filters(&mut count, user_id, filter);
    let (total,) = count.build_query_as::<(i64,)>().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {SEARCH_COLUMNS} FROM searches"));
    push_filters(&mut select, user_id, filter);
    let offset = i64::from(page.max(1) - 1) * i64::from(page_size);
    select
        .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
        .push_bind(i64::from(page_size))
        .push(" OFFSET ")
        .push_bind(offset);

    let rows = select.build_query_as::<SearchRow>().fetch_all(pool).await?;
    let items = rows
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<_>>>()?;

    Ok((items, total))
}

pub async fn get_search(pool: &SqlitePool, user_id: &str, id: &str) -> Result<Option<SearchRecord>> {
    let row = sqlx::query_as::<_, SearchRow>(&format!(
        "SELECT {SEARCH_COLUMNS} FROM searches WHERE id = ?1 AND user_id = ?2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(TryInto::try_into).transpose()
}

pub async fn delete_search(pool: &SqlitePool, user_id: &str, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM searches WHERE id = ?1 AND user_id = ?2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_all_searches(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM searches WHERE user_id = ?1")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, user_id: &str, filter: &SearchFilter) {
    builder.push(" WHERE user_id = ").push_bind(user_id.to_string());

    if let Some(mode) = filter.shortest_mode {
        builder.push(" AND shortest_mode = ").push_bind(mode.as_str());
    }
    if let Some(mode) = filter.efficient_mode {
        builder.push(" AND efficient_mode = ").push_bind(mode.as_str());
    }
    if let Some(name) = non_empty(&filter.origin_name) {
        builder
            .push(" AND origin_name_folded LIKE ")
            .push_bind(contains_pattern(&name.to_lowercase()))
            .push(" ESCAPE '\\'");
    }
    if let Some(name) = non_empty(&filter.destination_name) {
        builder
            .push(" AND destination_name_folded LIKE ")
            .push_bind(contains_pattern(&name.to_lowercase()))
            .push(" ESCAPE '\\'");
    }
    if let Some(from) = filter.date_from {
        builder.push(" AND created_at >= ").push_bind(timestamp(from));
    }
    if let Some(to) = filter.date_to {
        builder.push(" AND created_at <= ").push_bind(timestamp(to));
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// `%needle%` with LIKE metacharacters escaped.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(sqlx::FromRow)]
struct SearchRow {
    id: String,
    user_id: String,
    origin_name: String,
    origin_lat: f64,
    origin_lon: f64,
    destination_name: String,
    destination_lat: f64,
    destination_lon: f64,
    weight_kg: f64,
    shortest_route: String,
    efficient_route: String,
    mode_comparison: String,
    created_at: String,
}

impl TryFrom<SearchRow> for SearchRecord {
    type Error = anyhow::Error;

    fn try_from(row: SearchRow) -> Result<Self> {
        Ok(SearchRecord {
            shortest_route: serde_json::from_str(&row.shortest_route)
                .context("decoding shortest_route")?,
            efficient_route: serde_json::from_str(&row.efficient_route)
                .context("decoding efficient_route")?,
            mode_comparison: serde_json::from_str(&row.mode_comparison)
                .context("decoding mode_comparison")?,
            created_at: parse_timestamp(&row.created_at)?,
            origin_coordinates: Coordinates::new(row.origin_lat, row.origin_lon),
            destination_coordinates: Coordinates::new(row.destination_lat, row.destination_lon),
            id: row.id,
            user_id: row.user_id,
            origin_name: row.origin_name,
            destination_name: row.destination_name,
            weight_kg: row.weight_kg,
        })
    }
}
