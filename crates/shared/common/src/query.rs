//! Translation of specification filters into SQL conditions.
//!
//! Column names are the persisted record keys. Array columns (`Contains`)
//! use the Postgres `= ANY(...)` form.

use domain::{Filter, FilterValue};
use sea_orm::sea_query::{
    Alias, Asterisk, Condition, Expr, Func, LikeExpr, Order, PostgresQueryBuilder, Query,
    QueryStatementWriter, SelectStatement,
};
use sea_orm::Value;

fn sql_value(value: &FilterValue) -> Value {
    match value {
        FilterValue::Text(text) => text.clone().into(),
        FilterValue::Number(number) => (*number).into(),
        FilterValue::Bool(flag) => (*flag).into(),
        FilterValue::Uuid(id) => (*id).into(),
    }
}

/// `%term%` with LIKE wildcards escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn column(field: &str) -> Expr {
    Expr::col(Alias::new(field))
}

/// Build a [`Condition`] equivalent to `filter`.
pub fn to_condition(filter: &Filter) -> Condition {
    match filter {
        Filter::All => Condition::all().add(Expr::value(true)),
        Filter::Eq { field, value } => Condition::all().add(column(field).eq(sql_value(value))),
        Filter::Gte { field, value } => Condition::all().add(column(field).gte(*value)),
        Filter::Lte { field, value } => Condition::all().add(column(field).lte(*value)),
        Filter::In { field, values } => {
            Condition::all().add(column(field).is_in(values.iter().map(sql_value)))
        }
        Filter::IsNull { field } => Condition::all().add(column(field).is_null()),
        Filter::Contains { field, value } => Condition::all().add(Expr::cust_with_values(
            format!("? = ANY(\"{}\")", field.replace('"', "")),
            [sql_value(value)],
        )),
        Filter::Like { field, term } => Condition::all().add(
            Expr::expr(Func::lower(column(field))).like(LikeExpr::new(like_pattern(term)).escape('\\')),
        ),
        Filter::And { filters } => filters
            .iter()
            .fold(Condition::all(), |acc, f| acc.add(to_condition(f))),
        Filter::Or { filters } => filters
            .iter()
            .fold(Condition::any(), |acc, f| acc.add(to_condition(f))),
        Filter::Not { filter } => to_condition(filter).not(),
    }
}

/// `SELECT * FROM table WHERE <filter>`, optionally ordered and limited.
pub fn select_statement(
    table: &str,
    filter: &Filter,
    order_by: Option<(&str, bool)>,
    limit: Option<(u64, u64)>,
) -> SelectStatement {
    let mut select = Query::select();
    select
        .column(Asterisk)
        .from(Alias::new(table))
        .cond_where(to_condition(filter));

    if let Some((column, ascending)) = order_by {
        let order = if ascending { Order::Asc } else { Order::Desc };
        select.order_by(Alias::new(column), order);
    }
    if let Some((offset, count)) = limit {
        select.offset(offset).limit(count);
    }
    select
}

/// Render a select for Postgres with inlined values, for logging.
pub fn to_sql(table: &str, filter: &Filter) -> String {
    select_statement(table, filter, None, None).to_string(PostgresQueryBuilder)
}
