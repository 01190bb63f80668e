//! Saved search history: compute-and-store, list, fetch, delete.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use carbon_core::{RouteRequest, TransportMode};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::analysis::{analyse, RouteResponse};
use crate::api::auth::AuthUser;
use crate::api::error::{ApiError, ApiJson, ApiQuery};
use crate::persistence::searches::{self, SearchFilter, SearchRecord};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Serialize)]
pub struct CreatedSearch {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub route: RouteResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub shortest_mode: Option<TransportMode>,
    pub efficient_mode: Option<TransportMode>,
    pub origin_name: Option<String>,
    pub destination_name: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Pagination {
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(total: i64, page: u32, page_size: u32) -> Self {
        let size = i64::from(page_size.max(1));
        let total_pages = if total > 0 { (total + size - 1) / size } else { 1 };
        Self {
            total,
            page,
            page_size,
            total_pages,
            has_next: i64::from(page) < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchList {
    pub items: Vec<SearchRecord>,
    pub pagination: Pagination,
}

pub async fn create_search(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(request): ApiJson<RouteRequest>,
) -> Result<(StatusCode, Json<CreatedSearch>), ApiError> {
    let analysis = analyse(&state, &request).await?;
    let record = searches::insert_search(state.db().pool(), &user.id, &request, &analysis).await?;
    tracing::info!(user_id = %user.id, search_id = %record.id, "Saved search");

    Ok((
        StatusCode::CREATED,
        Json(CreatedSearch {
            id: record.id,
            created_at: record.created_at,
            route: RouteResponse { request, analysis },
        }),
    ))
}

pub async fn list_searches(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<SearchList>, ApiError> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page < 1 {
        return Err(ApiError::Validation("page must be at least 1".to_string()));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(ApiError::Validation(format!(
            "page_size must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }

    let filter = SearchFilter {
        shortest_mode: query.shortest_mode,
        efficient_mode: query.efficient_mode,
        origin_name: query.origin_name,
        destination_name: query.destination_name,
        date_from: parse_date_param("date_from", query.date_from.as_deref())?,
        date_to: parse_date_param("date_to", query.date_to.as_deref())?,
    };

    let (items, total) =
        searches::list_searches(state.db().pool(), &user.id, &filter, page, page_size).await?;

    Ok(Json(SearchList {
        items,
        pagination: Pagination::new(total, page, page_size),
    }))
}

pub async fn get_search(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SearchRecord>, ApiError> {
    searches::get_search(state.db().pool(), &user.id, &id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(&id))
}

pub async fn delete_search(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if searches::delete_search(state.db().pool(), &user.id, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}

pub async fn delete_all_searches(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let deleted = searches::delete_all_searches(state.db().pool(), &user.id).await?;
    tracing::info!(user_id = %user.id, deleted, "Cleared search history");
    Ok(Json(json!({ "deleted_count": deleted })))
}

fn not_found(id: &str) -> ApiError {
    ApiError::NotFound(format!("Search with ID {id} not found"))
}

/// RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC, or a bare date
/// meaning midnight UTC.
fn parse_date_param(field: &str, value: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    let Some(raw) = value.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(naive.and_utc()));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Some(midnight.and_utc()));
    }

    Err(ApiError::Validation(format!("{field} is not a valid datetime")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn pagination_edges() {
        assert_eq!(
            Pagination::new(0, 1, 10),
            Pagination {
                total: 0,
                page: 1,
                page_size: 10,
                total_pages: 1,
                has_next: false,
                has_prev: false,
            }
        );

        let middle = Pagination::new(25, 2, 10);
        assert_eq!(middle.total_pages, 3);
        assert!(middle.has_next);
        assert!(middle.has_prev);

        let last = Pagination::new(20, 2, 10);
        assert_eq!(last.total_pages, 2);
        assert!(!last.has_next);
    }

    #[test]
    fn date_params() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(
            parse_date_param("d", Some("2024-05-01T12:30:00Z")).unwrap(),
            Some(expected)
        );
        assert_eq!(
            parse_date_param("d", Some("2024-05-01T14:30:00+02:00")).unwrap(),
            Some(expected)
        );
        assert_eq!(
            parse_date_param("d", Some("2024-05-01T12:30:00")).unwrap(),
            Some(expected)
        );
        assert_eq!(
            parse_date_param("d", Some("2024-05-01")).unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date_param("d", Some("  ")).unwrap(), None);
        assert!(parse_date_param("d", Some("yesterday")).is_err());
    }
}
