use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ServiceError, TextEmbedder, VectorEntry, VectorStore};

const INDEX_FILE: &str = "vectors.json";

/// What the index keeps per date: the sentence shown in the browse view and
/// the embedding computed for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexedDocument {
    text: String,
    embedding: Vec<f32>,
}

/// [VectorStore] over one pretty-printed JSON document in a persist
/// directory. Entries are keyed by date, so re-logging a day replaces that
/// day's document.
pub struct FileVectorStore<E> {
    path: PathBuf,
    embedder: E,
}

impl<E: TextEmbedder> FileVectorStore<E> {
    pub fn new(persist_dir: impl Into<PathBuf>, embedder: E) -> Self {
        Self {
            path: persist_dir.into().join(INDEX_FILE),
            embedder,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole index. A missing file is an empty index; a file that
    /// exists but does not parse is an error, never silent data loss.
    async fn load_index(&self) -> Result<BTreeMap<String, IndexedDocument>, ServiceError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_index(
        &self,
        index: &BTreeMap<String, IndexedDocument>,
    ) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_vec_pretty(index)?;
        tokio::fs::write(&self.path, payload).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<E: TextEmbedder> VectorStore for FileVectorStore<E> {
    async fn upsert(&self, id: &str, text: &str) -> Result<(), ServiceError> {
        let embedding = self.embedder.embed(text).await?;
        let mut index = self.load_index().await?;
        let replaced = index
            .insert(
                id.to_owned(),
                IndexedDocument {
                    text: text.to_owned(),
                    embedding,
                },
            )
            .is_some();
        debug!("vector log upsert for {id} (replaced: {replaced})");
        self.save_index(&index).await
    }

    async fn list_all(&self) -> Result<Vec<VectorEntry>, ServiceError> {
        let index = self.load_index().await?;
        Ok(index
            .into_iter()
            .map(|(id, doc)| VectorEntry { id, text: doc.text })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::ai::{MockTextEmbedder, ServiceError, VectorStore};

    use super::FileVectorStore;

    fn fake_embedder() -> MockTextEmbedder {
        let mut embedder = MockTextEmbedder::new();
        embedder
            .expect_embed()
            .returning(|text| Ok(vec![text.len() as f32]));
        embedder
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() -> Result<()> {
        let dir = tempdir()?;
        let store = FileVectorStore::new(dir.path().join("vectors"), fake_embedder());
        assert!(store.list_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() -> Result<()> {
        let dir = tempdir()?;
        let store = FileVectorStore::new(dir.path().join("vectors"), fake_embedder());

        store
            .upsert("2025-08-20", "On 2025-08-20, habits logged: sleep=6")
            .await?;
        store
            .upsert("2025-08-20", "On 2025-08-20, habits logged: sleep=8")
            .await?;

        let entries = store.list_all().await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "2025-08-20");
        assert_eq!(entries[0].text, "On 2025-08-20, habits logged: sleep=8");
        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() -> Result<()> {
        let dir = tempdir()?;
        let store = FileVectorStore::new(dir.path().join("vectors"), fake_embedder());

        store.upsert("2025-08-21", "day two").await?;
        store.upsert("2025-08-19", "day zero").await?;
        store.upsert("2025-08-20", "day one").await?;

        let entries = store.list_all().await?;
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2025-08-19", "2025-08-20", "2025-08-21"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_entries_survive_a_new_store_instance() -> Result<()> {
        let dir = tempdir()?;
        let persist = dir.path().join("vectors");
        {
            let store = FileVectorStore::new(&persist, fake_embedder());
            store.upsert("2025-08-20", "kept across restarts").await?;
        }

        let store = FileVectorStore::new(&persist, fake_embedder());
        let entries = store.list_all().await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "kept across restarts");
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_index_is_an_error_not_a_reset() -> Result<()> {
        let dir = tempdir()?;
        let persist = dir.path().join("vectors");
        std::fs::create_dir_all(&persist)?;
        std::fs::write(persist.join("vectors.json"), "{ not json")?;

        let store = FileVectorStore::new(&persist, fake_embedder());
        let error = store.list_all().await.unwrap_err();
        assert!(matches!(error, ServiceError::Corrupt(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_embedding_failure_leaves_index_untouched() -> Result<()> {
        let dir = tempdir()?;
        let persist = dir.path().join("vectors");
        {
            let store = FileVectorStore::new(&persist, fake_embedder());
            store.upsert("2025-08-19", "first entry").await?;
        }

        let mut failing = MockTextEmbedder::new();
        failing.expect_embed().returning(|_| {
            Err(ServiceError::BadResponse("embedding went away".into()))
        });
        let store = FileVectorStore::new(&persist, failing);
        assert!(store.upsert("2025-08-20", "never stored").await.is_err());

        let entries = store.list_all().await?;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "2025-08-19");
        Ok(())
    }
}
