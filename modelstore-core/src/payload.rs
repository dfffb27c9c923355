//! Declarative list requests.
//!
//! A [`Payload`] is what the routing layer hands over after decoding a request:
//! paging, a list of [`Filter`] predicates and a list of [`Order`] keys. Filter
//! values always travel as strings and are coerced according to their
//! [`ValueType`] by the [`predicate`](crate::predicate) builder.
//!
//! Field names follow the wire format clients already send (`Page`,
//! `PageSize`, `Filters`, ...). Integers and booleans are accepted either as
//! JSON scalars or as strings (`"Page": "2"`, `"Descending": "true"`).

use serde::{Deserialize, Serialize};

/// Comparison applied by a [`Filter`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    #[serde(rename = "<")]
    Less,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "!=")]
    NotEqual,
    /// Array field holds an element equal to the value.
    #[serde(rename = "array-contains")]
    ArrayContains,
}

/// How a [`Filter`]'s string value is coerced before it reaches the backend.
///
/// Unknown tags decode as [`ValueType::String`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Boolean,
    Number,
    /// Calendar date in `YYYY-MM-DD` form.
    Timestamp,
    #[default]
    #[serde(other)]
    String,
}

/// A single field predicate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    pub field: String,
    pub operator: Operator,
    #[serde(default, rename = "Type")]
    pub r#type: ValueType,
    #[serde(default)]
    pub value: String,
}

impl Filter {
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        r#type: ValueType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            r#type,
            value: value.into(),
        }
    }

    /// A string-typed predicate.
    pub fn string(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self::new(field, operator, ValueType::String, value)
    }

    /// A boolean-typed predicate.
    pub fn boolean(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self::new(field, operator, ValueType::Boolean, value)
    }

    /// A number-typed predicate.
    pub fn number(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self::new(field, operator, ValueType::Number, value)
    }

    /// A date-typed predicate (`YYYY-MM-DD`).
    pub fn timestamp(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self::new(field, operator, ValueType::Timestamp, value)
    }
}

/// A sort key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Order {
    pub field: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub descending: bool,
}

impl Order {
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: false }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), descending: true }
    }
}

/// A list request: paging, filters and sort keys.
///
/// `page` is a zero-based page index; see
/// [`PaginationParams`](crate::page::PaginationParams) for how it becomes an
/// offset. Negative `Page`/`PageSize` values decode as zero. `search` is
/// carried along but not interpreted by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Payload {
    #[serde(default, deserialize_with = "lenient::index")]
    pub page: usize,
    #[serde(default, deserialize_with = "lenient::index")]
    pub page_size: usize,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }
}

/// Deserializers accepting scalars either natively or as strings.
mod lenient {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar<T> {
        Native(T),
        Text(String),
    }

    /// A signed integer clamped to zero.
    pub(super) fn index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
        let value = match Scalar::<i64>::deserialize(deserializer)? {
            Scalar::Native(value) => value,
            Scalar::Text(text) if text.is_empty() => 0,
            Scalar::Text(text) => text.parse::<i64>().map_err(D::Error::custom)?,
        };

        usize::try_from(value.max(0)).map_err(D::Error::custom)
    }

    pub(super) fn bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Scalar::<bool>::deserialize(deserializer)? {
            Scalar::Native(value) => Ok(value),
            Scalar::Text(text) if text.is_empty() => Ok(false),
            Scalar::Text(text) => text.parse().map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_string_encoded_paging() {
        let payload: Payload = serde_json::from_str(
            r#"{
                "Page": "1",
                "PageSize": "25",
                "Search": "ana",
                "Filters": [
                    { "Field": "active", "Operator": "==", "Type": "boolean", "Value": "true" },
                    { "Field": "tags", "Operator": "array-contains", "Value": "vip" }
                ],
                "Orders": [ { "Field": "name", "Descending": "true" } ]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.page, 1);
        assert_eq!(payload.page_size, 25);
        assert_eq!(payload.search, "ana");
        assert_eq!(payload.filters[0], Filter::boolean("active", Operator::Equal, "true"));
        assert_eq!(payload.filters[1], Filter::string("tags", Operator::ArrayContains, "vip"));
        assert_eq!(payload.orders, vec![Order::desc("name")]);
    }

    #[test]
    fn decodes_native_scalars_and_defaults() {
        let payload: Payload =
            serde_json::from_str(r#"{ "Page": 3, "Orders": [ { "Field": "age", "Descending": false } ] }"#).unwrap();

        assert_eq!(payload.page, 3);
        assert_eq!(payload.page_size, 0);
        assert!(payload.filters.is_empty());
        assert_eq!(payload.orders, vec![Order::asc("age")]);
    }

    #[test]
    fn negative_paging_decodes_as_first_page() {
        let payload: Payload = serde_json::from_str(r#"{ "Page": "-1", "PageSize": -5 }"#).unwrap();

        assert_eq!(payload.page, 0);
        assert_eq!(payload.page_size, 0);
    }

    #[test]
    fn value_type_tags_are_lowercase() {
        let encoded = serde_json::to_string(&Filter::timestamp("at", Operator::Less, "2024-01-01")).unwrap();
        assert!(encoded.contains(r#""Type":"timestamp""#));

        let filter: Filter = serde_json::from_str(r#"{ "Field": "n", "Operator": ">", "Type": "number", "Value": "1" }"#)
            .unwrap();
        assert_eq!(filter.r#type, ValueType::Number);
    }

    #[test]
    fn unknown_value_type_falls_back_to_string() {
        let filter: Filter =
            serde_json::from_str(r#"{ "Field": "code", "Operator": "!=", "Type": "uuid", "Value": "x" }"#).unwrap();

        assert_eq!(filter.r#type, ValueType::String);
        assert_eq!(filter.operator, Operator::NotEqual);
    }

    #[test]
    fn rejects_unknown_operator() {
        let result = serde_json::from_str::<Filter>(r#"{ "Field": "a", "Operator": "in", "Value": "x" }"#);
        assert!(result.is_err());
    }
}
