//! Database query helpers shared by the repositories and services.
//!
//! - Fetching a required record (NotFound if missing)
//! - Ensuring a record doesn't exist (Conflict if it does)
//! - Running a filtered, sorted and paginated list query
//!
//! # Usage
//! ```ignore
//! let team = require_record(teams::find_live(pool, id).await, "Team not found")?;
//! ```

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::error::{AppError, AppResult};
use crate::models::common::{PaginatedResponse, PaginationInfo};
use crate::utils::query::{compile, push_ordering, push_predicates, FilterField, QueryParams};

/// Unwrap an optional database result, returning NotFound if None.
pub fn require_record<T>(
    result: Result<Option<T>, sqlx::Error>,
    not_found_message: &str,
) -> AppResult<T> {
    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(AppError::not_found(not_found_message)),
        Err(e) => Err(e.into()),
    }
}

/// Ensure a record does NOT exist, returning Conflict if it does.
pub fn ensure_not_exists<T>(
    result: Result<Option<T>, sqlx::Error>,
    conflict_message: &str,
) -> AppResult<()> {
    match result {
        Ok(Some(_)) => Err(AppError::conflict(conflict_message)),
        Ok(None) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// SQL fragments of a list endpoint. Both statements must end inside a
/// WHERE clause so that filter predicates can be appended with `AND`.
pub struct ListQuery {
    pub select: &'static str,
    pub count: &'static str,
    pub fields: &'static [FilterField],
}

/// Run the count and page queries for a list endpoint.
pub async fn fetch_page<T>(
    pool: &PgPool,
    list: &ListQuery,
    params: &QueryParams,
) -> AppResult<PaginatedResponse<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let compiled = compile(params, list.fields)?;

    let mut count_query: QueryBuilder<Postgres> = QueryBuilder::new(list.count);
    push_predicates(&mut count_query, &compiled.predicates);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut page_query: QueryBuilder<Postgres> = QueryBuilder::new(list.select);
    push_predicates(&mut page_query, &compiled.predicates);
    push_ordering(&mut page_query, &compiled);
    let items = page_query.build_query_as::<T>().fetch_all(pool).await?;

    Ok(PaginatedResponse {
        items,
        pagination: PaginationInfo::new(params.page, params.limit, total),
    })
}
