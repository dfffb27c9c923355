//! The capability contract every storable entity implements.
//!
//! Storage operations are written once against [`Model`]; they never inspect a
//! concrete entity type. A model names its collection, exposes its document
//! identifier, validates itself and lists the terms that feed its search index.

use bson::{Bson, DateTime, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};

use crate::{error::DocumentStoreResult, validation::FieldError};

/// Field under which the search index is stored unless a model overrides
/// [`Model::search_index_field`]. Matches the field name of [`Record::raw_index`].
pub const SEARCH_INDEX_FIELD: &str = "raw_index";

/// Core trait that all entities stored through the model store must implement.
///
/// `Default` is required: it is the value returned by
/// [`TypedCollection::get`](crate::collection::TypedCollection::get) when a
/// document is missing or cannot be decoded.
///
/// Usually derived:
///
/// ```ignore
/// use modelstore::prelude::*;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize, Model)]
/// #[model(collection = "users")]
/// pub struct User {
///     #[serde(flatten)]
///     #[model(record)]
///     pub record: Record,
///     #[model(search)]
///     pub name: String,
/// }
/// ```
pub trait Model: Serialize + for<'de> Deserialize<'de> + Default + Send + Sync + Clone + 'static {
    /// Returns the name of the collection this model is stored in.
    fn collection_name() -> &'static str;

    /// Returns the identifier of the document holding this entity.
    fn document_id(&self) -> &str;

    /// Checks field constraints, returning one entry per violation.
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }

    /// Returns the raw terms the search index is built from.
    fn search_terms(&self) -> Vec<String> {
        Vec::new()
    }

    /// Returns the stored field that receives the expanded search index.
    fn search_index_field() -> &'static str {
        SEARCH_INDEX_FIELD
    }
}

/// BSON conversion helpers, implemented for every [`Model`].
pub trait ModelExt: Model {
    /// Converts this model to a BSON value for storage.
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Decodes a model from a stored BSON value.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;
}

impl<M: Model> ModelExt for M {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }
}

/// Bookkeeping fields shared by most entities, meant to be embedded with
/// `#[serde(flatten)]`.
///
/// `raw_index` is populated from storage but never serialized: the store writes
/// the freshly expanded index itself on every sync, and API responses built
/// from the model do not carry it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Record {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created: Option<DateTime>,
    #[serde(default)]
    pub updated: Option<DateTime>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub updated_by: String,
    #[serde(default, skip_serializing)]
    pub raw_index: Vec<String>,
}

impl Record {
    /// Creates a record for a document with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Stamps the record as written by `actor` now.
    ///
    /// The creation fields are only filled the first time.
    pub fn touch(&mut self, actor: &str) {
        let now = DateTime::now();

        if self.created.is_none() {
            self.created = Some(now);
            self.created_by = actor.to_string();
        }

        self.updated = Some(now);
        self.updated_by = actor.to_string();
    }
}
