//! Translation of [`Filter`]/[`Order`] descriptors into [`Query`] parts.
//!
//! Filter values arrive as strings and are coerced by their declared
//! [`ValueType`]. A value that does not parse for its type drops the whole
//! filter: the query then runs as if that filter had never been sent, and the
//! caller gets no error. Remaining filters are AND-ed together.

use bson::{Bson, DateTime};
use chrono::NaiveDate;
use tracing::debug;

use crate::{
    payload::{Filter, Operator, Order, ValueType},
    query::{Expr, FieldOp, QueryBuilder, Sort, SortDirection},
};

/// Calendar format accepted for [`ValueType::Timestamp`] filters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

impl From<Operator> for FieldOp {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::Less => FieldOp::Lt,
            Operator::LessOrEqual => FieldOp::Lte,
            Operator::Equal => FieldOp::Eq,
            Operator::Greater => FieldOp::Gt,
            Operator::GreaterOrEqual => FieldOp::Gte,
            Operator::NotEqual => FieldOp::Ne,
            Operator::ArrayContains => FieldOp::ArrayContains,
        }
    }
}

impl From<&Order> for Sort {
    fn from(order: &Order) -> Self {
        Sort {
            field: order.field.clone(),
            direction: if order.descending { SortDirection::Desc } else { SortDirection::Asc },
        }
    }
}

/// Coerces a filter's string value into the BSON value sent to the backend.
///
/// Returns `None` when the value does not parse as its declared type.
pub fn coerce_value(filter: &Filter) -> Option<Bson> {
    match filter.r#type {
        ValueType::Boolean => parse_bool(&filter.value).map(Bson::Boolean),
        ValueType::Number => parse_number(&filter.value).map(Bson::Double),
        ValueType::Timestamp => parse_date(&filter.value)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Bson::DateTime(DateTime::from_millis(midnight.and_utc().timestamp_millis()))),
        ValueType::String => Some(Bson::String(filter.value.clone())),
    }
}

/// Builds the conjunctive filter expression for `filters`.
///
/// Returns `None` when no filter survives coercion (including an empty list),
/// meaning the unfiltered collection.
pub fn build_filter(filters: &[Filter]) -> Option<Expr> {
    let exprs = filters
        .iter()
        .filter_map(|filter| match coerce_value(filter) {
            Some(value) => Some(Expr::field(filter.field.clone(), filter.operator.into(), value)),
            None => {
                debug!(
                    field = %filter.field,
                    value = %filter.value,
                    value_type = ?filter.r#type,
                    "skipping filter with unparseable value"
                );
                None
            }
        })
        .collect::<Vec<_>>();

    if exprs.is_empty() {
        None
    } else {
        Some(Expr::And(exprs))
    }
}

/// Converts order descriptors into sort keys, preserving their sequence.
pub fn build_sort(orders: &[Order]) -> Vec<Sort> {
    orders.iter().map(Sort::from).collect()
}

impl QueryBuilder {
    /// Sets the filter expression built from `filters`.
    pub fn filters(self, filters: &[Filter]) -> Self {
        self.maybe_filter(build_filter(filters))
    }

    /// Appends the sort keys built from `orders`.
    pub fn orders(self, orders: &[Order]) -> Self {
        self.sorts(build_sort(orders))
    }
}

/// Boolean spellings accepted in filter values.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Parses a float, rejecting values that overflow to infinity.
fn parse_number(value: &str) -> Option<f64> {
    let number = value.parse::<f64>().ok()?;
    if number.is_infinite() {
        let literal = value.trim_start_matches(['+', '-']).to_ascii_lowercase();
        if literal != "inf" && literal != "infinity" {
            return None;
        }
    }

    Some(number)
}

/// Parses a date written exactly as `YYYY-MM-DD`.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });

    if !shaped {
        return None;
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}
