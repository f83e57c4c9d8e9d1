//! List-endpoint query parameters: pagination, sorting and
//! `filter[field][op]=value` filters compiled into bound SQL predicates.
//!
//! Every entity declares the fields it exposes as a `&[FilterField]`
//! whitelist; field names never reach the SQL text, only the whitelisted
//! column expressions do.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::error::AppError;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;
pub const DEFAULT_SORT: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Like,
    In,
}

impl FilterOperator {
    fn sql(&self) -> &'static str {
        match self {
            FilterOperator::Eq => " = ",
            FilterOperator::Ne => " <> ",
            FilterOperator::Gt => " > ",
            FilterOperator::Lt => " < ",
            FilterOperator::Gte => " >= ",
            FilterOperator::Lte => " <= ",
            FilterOperator::Like => " LIKE ",
            FilterOperator::In => " = ANY(",
        }
    }
}

impl FromStr for FilterOperator {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "eq" => Ok(FilterOperator::Eq),
            "ne" => Ok(FilterOperator::Ne),
            "gt" => Ok(FilterOperator::Gt),
            "lt" => Ok(FilterOperator::Lt),
            "gte" => Ok(FilterOperator::Gte),
            "lte" => Ok(FilterOperator::Lte),
            "like" => Ok(FilterOperator::Like),
            "in" => Ok(FilterOperator::In),
            other => Err(AppError::validation(format!("Unknown filter operator '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("ASC"),
            SortOrder::Desc => f.write_str("DESC"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Timestamp,
}

/// A field a list endpoint accepts in `filter[...]` and `sort`
#[derive(Debug, Clone, Copy)]
pub struct FilterField {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
}

impl FilterField {
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self { name, column, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
    IntegerList(Vec<i64>),
    TextList(Vec<String>),
    TimestampList(Vec<DateTime<Utc>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: &'static str,
    pub operator: FilterOperator,
    pub value: FilterValue,
}

/// A `filter[field][op]=value` triple as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFilter {
    pub field: String,
    pub operator: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub page: i64,
    pub limit: i64,
    pub sort: String,
    pub order: SortOrder,
    pub filters: Vec<RawFilter>,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: DEFAULT_SORT.to_string(),
            order: SortOrder::Asc,
            filters: Vec::new(),
        }
    }
}

impl QueryParams {
    /// Build from decoded query-string pairs. Unparseable or non-positive
    /// page/limit values fall back to the defaults; limit is capped. A page
    /// whose offset does not fit in an `i64` is rejected.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let mut params = QueryParams::default();

        for (key, value) in pairs {
            match key.as_str() {
                "page" => {
                    if let Some(page) = value.parse::<i64>().ok().filter(|p| *p > 0) {
                        params.page = page;
                    }
                }
                "limit" => {
                    if let Some(limit) = value.parse::<i64>().ok().filter(|l| *l > 0) {
                        params.limit = limit.min(MAX_LIMIT);
                    }
                }
                "sort" if !value.trim().is_empty() => params.sort = value.trim().to_string(),
                "order" => match value.to_uppercase().as_str() {
                    "DESC" => params.order = SortOrder::Desc,
                    "ASC" => params.order = SortOrder::Asc,
                    _ => {}
                },
                _ if key.starts_with("filter[") => {
                    params.filters.push(parse_filter_key(&key, value)?);
                }
                _ => {}
            }
        }

        if (params.page - 1).checked_mul(params.limit).is_none() {
            return Err(AppError::validation(format!("Page {} is out of range", params.page)));
        }

        Ok(params)
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

fn parse_filter_key(key: &str, value: String) -> Result<RawFilter, AppError> {
    let malformed = || AppError::validation(format!("Malformed filter parameter '{}'", key));
    let inner = key
        .strip_prefix("filter[")
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(malformed)?;
    let mut parts = inner.split("][");
    match (parts.next(), parts.next(), parts.next()) {
        (Some(field), Some(operator), None) if !field.is_empty() && !operator.is_empty() => {
            Ok(RawFilter {
                field: field.to_string(),
                operator: operator.to_string(),
                value,
            })
        }
        _ => Err(malformed()),
    }
}

/// Filters and ordering resolved against an entity's whitelist
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub predicates: Vec<Predicate>,
    pub sort_column: &'static str,
    pub order: SortOrder,
    pub limit: i64,
    pub offset: i64,
}

pub fn compile(params: &QueryParams, fields: &[FilterField]) -> Result<CompiledQuery, AppError> {
    let lookup = |name: &str| fields.iter().find(|f| f.name == name);

    let sort_field = lookup(&params.sort)
        .ok_or_else(|| AppError::validation(format!("Cannot sort by '{}'", params.sort)))?;

    let predicates = params
        .filters
        .iter()
        .map(|raw| {
            let field = lookup(&raw.field).ok_or_else(|| {
                AppError::validation(format!("Cannot filter by '{}'", raw.field))
            })?;
            let operator: FilterOperator = raw.operator.parse()?;
            compile_predicate(field, operator, &raw.value)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledQuery {
        predicates,
        sort_column: sort_field.column,
        order: params.order,
        limit: params.limit,
        offset: params.offset(),
    })
}

fn compile_predicate(
    field: &FilterField,
    operator: FilterOperator,
    raw: &str,
) -> Result<Predicate, AppError> {
    let value = match (operator, field.kind) {
        (FilterOperator::Like, FieldKind::Text) => FilterValue::Text(format!("%{}%", escape_like(raw))),
        (FilterOperator::Like, _) => {
            return Err(AppError::validation(format!(
                "Operator 'like' is only supported on text fields, not '{}'",
                field.name
            )));
        }
        (FilterOperator::In, kind) => {
            let items = raw.split(',').map(str::trim).filter(|s| !s.is_empty());
            match kind {
                FieldKind::Integer => FilterValue::IntegerList(
                    items.map(|s| parse_integer(field, s)).collect::<Result<_, _>>()?,
                ),
                FieldKind::Text => FilterValue::TextList(items.map(str::to_string).collect()),
                FieldKind::Timestamp => FilterValue::TimestampList(
                    items.map(|s| parse_timestamp(field, s)).collect::<Result<_, _>>()?,
                ),
            }
        }
        (_, FieldKind::Integer) => FilterValue::Integer(parse_integer(field, raw)?),
        (_, FieldKind::Text) => FilterValue::Text(raw.to_string()),
        (_, FieldKind::Timestamp) => FilterValue::Timestamp(parse_timestamp(field, raw)?),
    };

    Ok(Predicate {
        column: field.column,
        operator,
        value,
    })
}

/// Make `%`, `_` and the escape character itself match literally
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn parse_integer(field: &FilterField, raw: &str) -> Result<i64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::validation(format!("Filter value '{}' for '{}' is not an integer", raw, field.name))
    })
}

/// RFC 3339, or a bare `YYYY-MM-DD` meaning midnight UTC
fn parse_timestamp(field: &FilterField, raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            AppError::validation(format!("Filter value '{}' for '{}' is not a timestamp", raw, field.name))
        })
}

/// Append `AND <predicate>` for every predicate; the builder must already
/// contain a WHERE clause.
pub fn push_predicates(builder: &mut QueryBuilder<'_, Postgres>, predicates: &[Predicate]) {
    for predicate in predicates {
        builder.push(" AND ");
        builder.push(predicate.column);
        builder.push(predicate.operator.sql());
        match &predicate.value {
            FilterValue::Integer(v) => {
                builder.push_bind(*v);
            }
            FilterValue::Text(v) => {
                builder.push_bind(v.clone());
            }
            FilterValue::Timestamp(v) => {
                builder.push_bind(*v);
            }
            FilterValue::IntegerList(v) => {
                builder.push_bind(v.clone());
            }
            FilterValue::TextList(v) => {
                builder.push_bind(v.clone());
            }
            FilterValue::TimestampList(v) => {
                builder.push_bind(v.clone());
            }
        }
        match predicate.operator {
            FilterOperator::In => {
                builder.push(")");
            }
            FilterOperator::Like => {
                builder.push(" ESCAPE '\\'");
            }
            _ => {}
        }
    }
}

/// Append `ORDER BY ... LIMIT ... OFFSET ...`
pub fn push_ordering(builder: &mut QueryBuilder<'_, Postgres>, query: &CompiledQuery) {
    builder.push(" ORDER BY ");
    builder.push(query.sort_column);
    builder.push(format!(" {}", query.order));
    builder.push(" LIMIT ");
    builder.push_bind(query.limit);
    builder.push(" OFFSET ");
    builder.push_bind(query.offset);
}
