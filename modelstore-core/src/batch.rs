//! Multi-document writes committed atomically by a backend.

use bson::Document;

/// A partial update merged into one document: listed fields are set, all other
/// fields are left untouched. Merging into a missing document creates it.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeWrite {
    pub id: String,
    pub fields: Document,
}

/// An ordered set of merge writes that a backend must apply all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    writes: Vec<MergeWrite>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a merge of `fields` into document `id`.
    pub fn merge(&mut self, id: impl Into<String>, fields: Document) -> &mut Self {
        self.writes.push(MergeWrite { id: id.into(), fields });
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn writes(&self) -> &[MergeWrite] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<MergeWrite> {
        self.writes
    }
}
