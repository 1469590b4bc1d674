//! Persistence-side face of a specification.
//!
//! A [`Filter`] is a backend-neutral WHERE fragment over persisted column
//! names. [`Filter::evaluate`] applies it to an entity record with SQL
//! three-valued logic, so the result is exactly what a database would return.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

static NULL: Value = Value::Null;

/// Column value of a record; absent columns read as NULL.
fn cell<'a>(record: &'a Value, field: &str) -> &'a Value {
    record.get(field).unwrap_or(&NULL)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Uuid(Uuid),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Uuid(value)
    }
}

impl FilterValue {
    /// SQL equality against a record cell; `None` when the cell is NULL.
    fn equals(&self, cell: &Value) -> Option<bool> {
        if cell.is_null() {
            return None;
        }
        Some(match self {
            FilterValue::Text(text) => cell.as_str() == Some(text.as_str()),
            FilterValue::Number(number) => cell.as_f64() == Some(*number),
            FilterValue::Bool(flag) => cell.as_bool() == Some(*flag),
            FilterValue::Uuid(id) => cell
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .map_or(false, |stored| stored == *id),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// Matches every row
    All,
    Eq { field: String, value: FilterValue },
    Gte { field: String, value: f64 },
    Lte { field: String, value: f64 },
    In { field: String, values: Vec<FilterValue> },
    IsNull { field: String },
    /// Array column holds `value`
    Contains { field: String, value: FilterValue },
    /// Case-insensitive substring match
    Like { field: String, term: String },
    And { filters: Vec<Filter> },
    Or { filters: Vec<Filter> },
    Not { filter: Box<Filter> },
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<FilterValue>) -> Self {
        Filter::Eq {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn gte(field: &str, value: f64) -> Self {
        Filter::Gte {
            field: field.to_string(),
            value,
        }
    }

    pub fn lte(field: &str, value: f64) -> Self {
        Filter::Lte {
            field: field.to_string(),
            value,
        }
    }

    pub fn is_in<V: Into<FilterValue>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(field: &str) -> Self {
        Filter::IsNull {
            field: field.to_string(),
        }
    }

    pub fn contains(field: &str, value: impl Into<FilterValue>) -> Self {
        Filter::Contains {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn like(field: &str, term: &str) -> Self {
        Filter::Like {
            field: field.to_string(),
            term: term.to_string(),
        }
    }

    /// Conjunction, flattening nested `And`s.
    pub fn and(self, other: Filter) -> Self {
        let mut filters = Vec::new();
        for filter in [self, other] {
            match filter {
                Filter::And { filters: inner } => filters.extend(inner),
                Filter::All => {}
                other => filters.push(other),
            }
        }
        match filters.len() {
            0 => Filter::All,
            1 => filters.remove(0),
            _ => Filter::And { filters },
        }
    }

    /// Disjunction, flattening nested `Or`s.
    pub fn or(self, other: Filter) -> Self {
        if self == Filter::All || other == Filter::All {
            return Filter::All;
        }
        let mut filters = Vec::new();
        for filter in [self, other] {
            match filter {
                Filter::Or { filters: inner } => filters.extend(inner),
                other => filters.push(other),
            }
        }
        Filter::Or { filters }
    }

    pub fn negate(self) -> Self {
        match self {
            Filter::Not { filter } => *filter,
            other => Filter::Not {
                filter: Box::new(other),
            },
        }
    }

    /// SQL three-valued evaluation: `None` is UNKNOWN.
    pub fn evaluate(&self, record: &Value) -> Option<bool> {
        match self {
            Filter::All => Some(true),
            Filter::Eq { field, value } => value.equals(cell(record, field)),
            Filter::Gte { field, value } => cell(record, field).as_f64().map(|v| v >= *value),
            Filter::Lte { field, value } => cell(record, field).as_f64().map(|v| v <= *value),
            Filter::In { field, values } => {
                let value = cell(record, field);
                if value.is_null() {
                    return None;
                }
                Some(values.iter().any(|v| v.equals(value) == Some(true)))
            }
            Filter::IsNull { field } => Some(cell(record, field).is_null()),
            Filter::Contains { field, value } => cell(record, field)
                .as_array()
                .map(|items| items.iter().any(|item| value.equals(item) == Some(true))),
            Filter::Like { field, term } => cell(record, field)
                .as_str()
                .map(|text| text.to_lowercase().contains(&term.to_lowercase())),
            Filter::And { filters } => {
                let mut unknown = false;
                for filter in filters {
                    match filter.evaluate(record) {
                        Some(false) => return Some(false),
                        None => unknown = true,
                        Some(true) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(true)
                }
            }
            Filter::Or { filters } => {
                let mut unknown = false;
                for filter in filters {
                    match filter.evaluate(record) {
                        Some(true) => return Some(true),
                        None => unknown = true,
                        Some(false) => {}
                    }
                }
                if unknown {
                    None
                } else {
                    Some(false)
                }
            }
            Filter::Not { filter } => filter.evaluate(record).map(|v| !v),
        }
    }

    /// True only when the row would be returned by a WHERE clause.
    pub fn matches(&self, record: &Value) -> bool {
        self.evaluate(record) == Some(true)
    }
}
