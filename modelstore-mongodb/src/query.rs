//! Query translation from the modelstore AST to MongoDB query syntax.
//!
//! MongoDB's matching is looser than the semantics the store promises, so the
//! translation tightens it:
//!
//! - `$ne` alone also matches documents missing the field; it is paired with
//!   `$exists: true`.
//! - Scalar comparisons against an array field match when any element does;
//!   they are restricted to non-array fields.
//! - `ArrayContains` uses `$elemMatch`, which only matches arrays.

use bson::{Document, Bson, doc};

use modelstore_core::{
    query::{QueryVisitor, Expr, FieldOp, Sort, SortDirection},
    error::DocumentStoreError,
};


/// Translates query expressions into MongoDB query documents.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    pub fn filter(expr: Option<&Expr>) -> Result<Document, DocumentStoreError> {
        match expr {
            Some(expr) => MongoQueryTranslator.visit_expr(expr),
            None => Ok(doc! {}),
        }
    }

    /// Builds a sort document from `sort` keys, ending with `_id` so that ties
    /// and unordered queries follow document id order.
    pub fn sort(sort: &[Sort]) -> Document {
        let mut document = Document::new();

        for key in sort {
            if document.contains_key(&key.field) {
                continue;
            }

            document.insert(
                key.field.clone(),
                match key.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                },
            );
        }

        if !document.contains_key("_id") {
            document.insert("_id", 1);
        }

        document
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_field(&mut self, field: &str, op: &FieldOp, value: &Bson) -> Result<Self::Output, Self::Error> {
        let mut condition = match op {
            FieldOp::Eq => doc! { "$eq": value },
            FieldOp::Ne => doc! { "$exists": true, "$ne": value },
            FieldOp::Gt => doc! { "$gt": value },
            FieldOp::Gte => doc! { "$gte": value },
            FieldOp::Lt => doc! { "$lt": value },
            FieldOp::Lte => doc! { "$lte": value },
            FieldOp::ArrayContains => doc! { "$elemMatch": { "$eq": value } },
        };

        let scalar_comparison = !matches!(op, FieldOp::Ne | FieldOp::ArrayContains)
            && !matches!(value, Bson::Array(_));
        if scalar_comparison {
            condition.insert("$not", doc! { "$type": "array" });
        }

        Ok(doc! { field: condition })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelstore_core::query::{Field, Query};

    fn translate(expr: Expr) -> Document {
        MongoQueryTranslator::filter(Some(&expr)).unwrap()
    }

    #[test]
    fn no_filter_matches_everything() {
        assert_eq!(MongoQueryTranslator::filter(None).unwrap(), doc! {});
    }

    #[test]
    fn scalar_comparisons_exclude_arrays() {
        assert_eq!(
            translate(Field::new("age").gte(18.0)),
            doc! { "age": { "$gte": 18.0, "$not": { "$type": "array" } } },
        );
    }

    #[test]
    fn not_equal_requires_the_field() {
        assert_eq!(
            translate(Field::new("status").ne("closed")),
            doc! { "status": { "$exists": true, "$ne": "closed" } },
        );
    }

    #[test]
    fn array_contains_uses_elem_match() {
        assert_eq!(
            translate(Field::new("raw_index").array_contains("ana")),
            doc! { "raw_index": { "$elemMatch": { "$eq": "ana" } } },
        );
    }

    #[test]
    fn conjunctions_become_and() {
        let expr = Field::new("active").eq(true).and(Field::new("address.city").eq("Recife"));

        assert_eq!(
            translate(expr),
            doc! {
                "$and": [
                    { "active": { "$eq": true, "$not": { "$type": "array" } } },
                    { "address.city": { "$eq": "Recife", "$not": { "$type": "array" } } },
                ]
            },
        );
    }

    #[test]
    fn sort_keys_keep_order_and_end_with_id() {
        let query = Query::builder()
            .sort("team", SortDirection::Asc)
            .sort("score", SortDirection::Desc)
            .build();

        let sort = MongoQueryTranslator::sort(&query.sort);
        let keys = sort.keys().map(String::as_str).collect::<Vec<_>>();

        assert_eq!(keys, vec!["team", "score", "_id"]);
        assert_eq!(sort.get_i32("score").unwrap(), -1);
        assert_eq!(MongoQueryTranslator::sort(&[]), doc! { "_id": 1 });
    }
}
