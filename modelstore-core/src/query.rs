//! Backend-neutral query representation.
//!
//! A [`Query`] is what storage operations hand to a
//! [`StoreBackend`](crate::backend::StoreBackend): an optional conjunctive
//! filter expression, limit, offset and an ordered list of sort keys. Backends
//! translate filter expressions through [`QueryVisitor`].
//!
//! # Query Building
//!
//! ```ignore
//! use modelstore::query::{Query, Field, SortDirection};
//!
//! let query = Query::builder()
//!     .filter(Field::new("active").eq(true).and(Field::new("age").gte(18.0)))
//!     .sort("created", SortDirection::Desc)
//!     .limit(10)
//!     .offset(20)
//!     .build();
//! ```
//!
//! Field names may be dotted paths (`"address.city"`) reaching into nested
//! documents; see [`resolve_field`].

use bson::{Bson, Document};

use crate::error::DocumentStoreError;

/// Sort direction for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (A to Z, 0 to 9, earliest to latest).
    Asc,
    /// Descending order (Z to A, 9 to 0, latest to earliest).
    Desc,
}

/// One sort key. Queries apply their keys in sequence, the first being primary.
#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    /// The field name to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// Equal to (exact match).
    Eq,
    /// Not equal to. Documents missing the field do not match.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
    /// Array field contains an element equal to the value.
    ArrayContains,
}

/// A filter expression for querying documents.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match).
    And(Vec<Expr>),
    /// Field comparison expression.
    Field {
        /// The field name (or dotted path) to compare.
        field: String,
        /// The comparison operator.
        op: FieldOp,
        /// The value to compare against.
        value: Bson,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn field(field: String, op: FieldOp, value: Bson) -> Self {
        Expr::Field { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }
}

/// A structured query for retrieving and filtering documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Optional filter expression to match documents.
    pub filter: Option<Expr>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
    /// Number of documents to skip (for pagination).
    pub offset: Option<usize>,
    /// Sort keys, primary first.
    pub sort: Vec<Sort>,
}

impl Query {
    /// Creates a new empty query with no filters or limits.
    pub fn new() -> Self {
        Query {
            filter: None,
            limit: None,
            offset: None,
            sort: Vec::new(),
        }
    }

    /// Creates a new query builder for fluent construction.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }
}

/// Helper for building field comparison expressions.
///
/// ```ignore
/// let expr = Field::new("name").eq("Alice").and(Field::new("age").gt(18));
/// ```
#[derive(Debug, Clone)]
pub struct Field(String);

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Field(name.into())
    }

    pub fn eq(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Eq, value.into())
    }

    pub fn ne(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Ne, value.into())
    }

    pub fn gt(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Gt, value.into())
    }

    pub fn gte(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Gte, value.into())
    }

    pub fn lt(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Lt, value.into())
    }

    pub fn lte(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::Lte, value.into())
    }

    pub fn array_contains(self, value: impl Into<Bson>) -> Expr {
        Expr::field(self.0, FieldOp::ArrayContains, value.into())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        QueryBuilder { query: Query::default() }
    }

    /// Sets the filter expression for this query.
    pub fn filter(mut self, filter: Expr) -> Self {
        self.query.filter = Some(filter);
        self
    }

    /// Sets the filter expression, or clears it with `None`.
    pub fn maybe_filter(mut self, filter: Option<Expr>) -> Self {
        self.query.filter = filter;
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: usize) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Sets the number of documents to skip (for pagination).
    pub fn offset(mut self, offset: usize) -> Self {
        self.query.offset = Some(offset);
        self
    }

    /// Appends a sort key after any already present.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.query.sort.push(Sort { field: field.into(), direction });
        self
    }

    /// Appends several sort keys in order.
    pub fn sorts(mut self, sorts: impl IntoIterator<Item = Sort>) -> Self {
        self.query.sort.extend(sorts);
        self
    }

    /// Builds and returns the final query.
    pub fn build(self) -> Query {
        self.query
    }
}

pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Field { field, op, value } => self.visit_field(field, op, value),
        }
    }
}

/// Looks up a field by name, following dots into nested documents.
///
/// A name that exists verbatim at the top level wins over path traversal.
pub fn resolve_field<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    if let Some(value) = document.get(path) {
        return Some(value);
    }

    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;

    for segment in segments {
        current = current.as_document()?.get(segment)?;
    }

    Some(current)
}
