use crate::{error, DocRef, Document, DocumentStore, TxHandle, TxOp, Value};
use async_trait::async_trait;
use std::{
    collections::{BTreeMap, HashMap},
    sync::{Mutex, MutexGuard, PoisonError},
};

type Collection = BTreeMap<Box<str>, Document>;
type Collections = HashMap<Box<str>, Collection>;

/// In-process [`DocumentStore`] with the same observable semantics as the
/// hosted backend. One mutex guards all collections, and transactions hold it
/// across read, apply, and commit, so concurrent profile updates are
/// serialized and cannot lose writes.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.collections.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn merge_into(target: &mut Document, fields: Document) {
    for (key, value) in fields {
        target.insert(key, value);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, doc: &DocRef) -> error::Result<Option<Document>> {
        let collections = self.lock();
        Ok(collections.get(&doc.collection).and_then(|col| col.get(&doc.id)).cloned())
    }

    async fn set(&self, doc: &DocRef, value: Document) -> error::Result<()> {
        let mut collections = self.lock();
        let collection = collections.entry(doc.collection.clone()).or_default();
        collection.insert(doc.id.clone(), value);
        Ok(())
    }

    async fn merge(&self, doc: &DocRef, fields: Document) -> error::Result<()> {
        let mut collections = self.lock();
        let collection = collections.entry(doc.collection.clone()).or_default();
        let target = collection.entry(doc.id.clone()).or_default();
        merge_into(target, fields);
        Ok(())
    }

    async fn delete(&self, doc: &DocRef) -> error::Result<()> {
        let mut collections = self.lock();
        if let Some(collection) = collections.get_mut(&doc.collection) {
            collection.remove(&doc.id);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> error::Result<Vec<(Box<str>, Document)>> {
        let collections = self.lock();
        Ok(collections
            .get(collection)
            .map(|col| col.iter().map(|(id, doc)| (id.clone(), doc.clone())).collect())
            .unwrap_or_default())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> error::Result<Vec<(Box<str>, Document)>> {
        let collections = self.lock();
        Ok(collections
            .get(collection)
            .map(|col| {
                col.iter()
                    .filter(|(_, doc)| doc.get(field) == Some(value))
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn atomically(&self, refs: &[DocRef], op: &mut dyn TxOp) -> error::Result<()> {
        let mut collections = self.lock();
        let reads: Vec<_> = refs
            .iter()
            .map(|doc| collections.get(&doc.collection).and_then(|col| col.get(&doc.id)).cloned())
            .collect();

        let mut tx = TxHandle::new(refs, &reads);
        op.apply(&mut tx)?;

        for (index, fields) in tx.into_writes() {
            let DocRef { collection, id } = &refs[index];
            let collection = collections.entry(collection.clone()).or_default();
            let target = collection.entry(id.clone()).or_default();
            merge_into(target, fields);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{DocRef, DocumentStore, MemoryStore};
    use crate::{error::Error, Document, Value};

    fn doc(pairs: &[(&str, Value)]) -> Document {
        pairs.iter().map(|(key, value)| ((*key).into(), value.clone())).collect()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn point_reads_and_writes() {
        let store = MemoryStore::new();
        let reference = DocRef::new("surveys", "s1");

        assert_eq!(store.get(&reference).await.unwrap(), None);
        store.set(&reference, doc(&[("title", Value::from("Lunch"))])).await.unwrap();
        let stored = store.get(&reference).await.unwrap().unwrap();
        assert_eq!(stored.get("title"), Some(&Value::from("Lunch")));

        store.delete(&reference).await.unwrap();
        assert_eq!(store.get(&reference).await.unwrap(), None);
        // Deleting again is fine.
        store.delete(&reference).await.unwrap();
    }

    #[tokio::test(flavor = "current_thread")]
    async fn merge_upserts_and_keeps_other_fields() {
        let store = MemoryStore::new();
        let reference = DocRef::new("users", "u1");

        // Merging into a missing document creates it.
        store.merge(&reference, doc(&[("coins", Value::from(1))])).await.unwrap();
        store.merge(&reference, doc(&[("displayName", Value::from("Ada"))])).await.unwrap();

        let stored = store.get(&reference).await.unwrap().unwrap();
        assert_eq!(stored.get("coins"), Some(&Value::from(1)));
        assert_eq!(stored.get("displayName"), Some(&Value::from("Ada")));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn query_eq_matches_top_level_fields() {
        let store = MemoryStore::new();
        store
            .set(&DocRef::new("incompleteAnswers", "u1:s1"), doc(&[("userId", Value::from("u1"))]))
            .await
            .unwrap();
        store
            .set(&DocRef::new("incompleteAnswers", "u2:s1"), doc(&[("userId", Value::from("u2"))]))
            .await
            .unwrap();

        let matches = store
            .query_eq("incompleteAnswers", "userId", &Value::from("u1"))
            .await
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].0.as_ref(), "u1:s1");

        let empty = store.query_eq("missing", "userId", &Value::from("u1")).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn transaction_reads_then_writes() {
        let store = MemoryStore::new();
        let reference = DocRef::new("users", "u1");
        store.set(&reference, doc(&[("coins", Value::from(2))])).await.unwrap();

        let refs = [reference.clone()];
        store
            .atomically(&refs, &mut |tx: &mut crate::TxHandle<'_>| {
                let coins = tx
                    .get(&reference)?
                    .and_then(|snapshot| snapshot.get("coins"))
                    .and_then(Value::as_u64)
                    .unwrap_or_default();
                tx.update(&reference, doc(&[("coins", Value::from(coins + 1))]))
            })
            .await
            .unwrap();

        let stored = store.get(&reference).await.unwrap().unwrap();
        assert_eq!(stored.get("coins"), Some(&Value::from(3)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn transaction_upserts_missing_documents() {
        let store = MemoryStore::new();
        let reference = DocRef::new("users", "fresh");

        let refs = [reference.clone()];
        store
            .atomically(&refs, &mut |tx: &mut crate::TxHandle<'_>| {
                assert!(tx.get(&reference)?.is_none());
                tx.update(&reference, doc(&[("coins", Value::from(1))]))
            })
            .await
            .unwrap();

        let stored = store.get(&reference).await.unwrap().unwrap();
        assert_eq!(stored.get("coins"), Some(&Value::from(1)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn transaction_rejects_out_of_scope_documents() {
        let store = MemoryStore::new();
        let declared = DocRef::new("users", "u1");
        let undeclared = DocRef::new("users", "u2");

        let refs = [declared.clone()];
        let result = store
            .atomically(&refs, &mut |tx: &mut crate::TxHandle<'_>| {
                tx.update(&undeclared, Document::new())
            })
            .await;
        assert_eq!(result, Err(Error::Scope));

        // The failed transaction must not have written anything.
        assert_eq!(store.get(&undeclared).await.unwrap(), None);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failed_transaction_commits_nothing() {
        let store = MemoryStore::new();
        let reference = DocRef::new("users", "u1");
        store.set(&reference, doc(&[("coins", Value::from(5))])).await.unwrap();

        let refs = [reference.clone()];
        let result = store
            .atomically(&refs, &mut |tx: &mut crate::TxHandle<'_>| {
                tx.update(&reference, doc(&[("coins", Value::from(99))]))?;
                Err(Error::Data)
            })
            .await;
        assert_eq!(result, Err(Error::Data));

        let stored = store.get(&reference).await.unwrap().unwrap();
        assert_eq!(stored.get("coins"), Some(&Value::from(5)));
    }
}
