pub mod error;
mod memory;

pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use serde_json::{Map, Value};

use async_trait::async_trait;

/// Fully-qualified reference to one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocRef {
    pub collection: Box<str>,
    pub id: Box<str>,
}

impl DocRef {
    pub fn new(collection: &str, id: &str) -> Self {
        Self { collection: collection.into(), id: id.into() }
    }
}

/// Schemaless document payload.
pub type Document = Map<String, Value>;

/// Read/write handle scoped to the documents a transaction declared upfront.
///
/// Reads are the snapshots taken when the transaction began; updates are
/// staged and commit together once the operation returns successfully.
pub struct TxHandle<'a> {
    refs: &'a [DocRef],
    reads: &'a [Option<Document>],
    writes: Vec<(usize, Document)>,
}

impl<'a> TxHandle<'a> {
    /// Builds a handle over the pre-read snapshots of `refs`. Intended for
    /// [`DocumentStore`] implementations.
    pub fn new(refs: &'a [DocRef], reads: &'a [Option<Document>]) -> Self {
        Self { refs, reads, writes: Vec::new() }
    }

    fn position(&self, doc: &DocRef) -> Result<usize> {
        self.refs.iter().position(|candidate| candidate == doc).ok_or(Error::Scope)
    }

    /// Snapshot of the document as read at the start of the transaction.
    pub fn get(&self, doc: &DocRef) -> Result<Option<&Document>> {
        Ok(self.reads[self.position(doc)?].as_ref())
    }

    /// Stages a field-merge upsert to be committed with the transaction.
    pub fn update(&mut self, doc: &DocRef, fields: Document) -> Result<()> {
        let index = self.position(doc)?;
        self.writes.push((index, fields));
        Ok(())
    }

    /// Staged writes as indices into the declared `refs`, in call order.
    pub fn into_writes(self) -> Vec<(usize, Document)> {
        self.writes
    }
}

/// Read-then-conditionally-write body of a transaction.
///
/// Blanket-implemented for closures so call sites can pass `&mut |tx| ...`.
pub trait TxOp: Send {
    fn apply(&mut self, tx: &mut TxHandle<'_>) -> Result<()>;
}

impl<F> TxOp for F
where
    F: FnMut(&mut TxHandle<'_>) -> Result<()> + Send,
{
    fn apply(&mut self, tx: &mut TxHandle<'_>) -> Result<()> {
        self(tx)
    }
}

/// Capability surface of the hosted document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point read by collection and id.
    async fn get(&self, doc: &DocRef) -> Result<Option<Document>>;

    /// Creates or fully replaces a document.
    async fn set(&self, doc: &DocRef, value: Document) -> Result<()>;

    /// Merges the given fields into a document, creating it if absent.
    async fn merge(&self, doc: &DocRef, fields: Document) -> Result<()>;

    /// Deletes a document. Deleting a missing document is not an error.
    async fn delete(&self, doc: &DocRef) -> Result<()>;

    /// All documents of a collection, paired with their ids.
    async fn list(&self, collection: &str) -> Result<Vec<(Box<str>, Document)>>;

    /// Documents of a collection whose top-level `field` equals `value`.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<(Box<str>, Document)>>;

    /// Runs `op` atomically against the documents named by `refs`.
    ///
    /// The handle exposes the snapshots of `refs` taken at the start; staged
    /// updates commit together or not at all. Concurrent transactions over
    /// the same documents are serialized by the implementation.
    async fn atomically(&self, refs: &[DocRef], op: &mut dyn TxOp) -> Result<()>;
}
