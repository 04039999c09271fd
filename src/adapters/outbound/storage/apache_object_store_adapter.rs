use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use object_store::{
    Attribute, Attributes, ObjectStore as ApacheObjectStore, PutPayload, path::Path as ObjectPath,
};
use std::sync::Arc;
use tracing::warn;

use crate::{
    adapters::outbound::storage::error::StoreError,
    domain::{
        errors::{GatewayResult, ValidationError},
        models::StoredObject,
        value_objects::ObjectKey,
    },
    ports::storage::ObjectStore,
};

/// Store path for a key, byte for byte.
///
/// Listings report raw locations, so keys must not be re-encoded on the way
/// back in.
fn object_path(key: &ObjectKey) -> GatewayResult<ObjectPath> {
    let path = ObjectPath::parse(key.as_str())
        .map_err(|e| ValidationError::UnstorableObjectKey(e.to_string()))?;

    // parse strips leading and trailing delimiters
    if path.to_string() != key.as_str() {
        return Err(ValidationError::UnstorableObjectKey(format!(
            "'{key}' would be stored as '{path}'"
        ))
        .into());
    }
    Ok(path)
}

/// Adapter that implements our ObjectStore port using Apache object_store
pub struct ApacheObjectStoreAdapter {
    inner: Arc<dyn ApacheObjectStore>,
}

impl ApacheObjectStoreAdapter {
    pub fn new(store: Arc<dyn ApacheObjectStore>) -> Self {
        Self { inner: store }
    }
}

#[async_trait]
impl ObjectStore for ApacheObjectStoreAdapter {
    async fn list_objects(&self, max_results: usize) -> GatewayResult<Vec<StoredObject>> {
        let mut stream = self.inner.list(None).take(max_results);
        let mut objects = Vec::new();

        while let Some(result) = stream.next().await {
            let meta = result.map_err(|e| StoreError::from(e).into_gateway("list_objects"))?;

            match ObjectKey::new(meta.location.to_string()) {
                Ok(key) => objects.push(StoredObject {
                    key,
                    size_bytes: meta.size,
                    last_modified: Some(meta.last_modified),
                }),
                Err(e) => warn!(location = %meta.location, error = %e, "Skipping unusable key"),
            }
        }

        Ok(objects)
    }

    async fn put_object(
        &self,
        key: &ObjectKey,
        data: Bytes,
        content_type: &str,
    ) -> GatewayResult<()> {
        let path = object_path(key)?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        self.inner
            .put_opts(&path, PutPayload::from(data), attributes.into())
            .await
            .map_err(|e| StoreError::from(e).into_gateway("put_object"))?;

        Ok(())
    }

    async fn delete_object(&self, key: &ObjectKey) -> GatewayResult<()> {
        let path = object_path(key)?;

        match self.inner.delete(&path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(StoreError::from(e).into_gateway("delete_object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::GatewayError;
    use object_store::memory::InMemory;

    fn key(value: &str) -> ObjectKey {
        ObjectKey::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_put_list_delete() {
        let store = Arc::new(InMemory::new());
        let adapter = ApacheObjectStoreAdapter::new(store.clone());

        adapter
            .put_object(&key("a.png"), Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        adapter
            .put_object(&key("notes/b.txt"), Bytes::from_static(b"hello"), "text/plain")
            .await
            .unwrap();

        let listed = adapter.list_objects(1000).await.unwrap();
        assert_eq!(listed.len(), 2);
        let png = listed.iter().find(|o| o.key.as_str() == "a.png").unwrap();
        assert_eq!(png.size_bytes, 3);
        assert!(png.last_modified.is_some());

        let stored = store.get(&ObjectPath::from("a.png")).await.unwrap();
        let content_type: Option<&str> = stored
            .attributes
            .get(&Attribute::ContentType)
            .map(|v| v.as_ref());
        assert_eq!(content_type, Some("image/png"));

        adapter.delete_object(&key("a.png")).await.unwrap();
        let listed = adapter.list_objects(1000).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key.as_str(), "notes/b.txt");
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let adapter = ApacheObjectStoreAdapter::new(Arc::new(InMemory::new()));
        for i in 0..5 {
            adapter
                .put_object(&key(&format!("{i}.png")), Bytes::from_static(b"x"), "image/png")
                .await
                .unwrap();
        }

        assert_eq!(adapter.list_objects(3).await.unwrap().len(), 3);
        assert_eq!(adapter.list_objects(10).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_listed_keys_round_trip_unchanged() {
        let store = Arc::new(InMemory::new());
        let adapter = ApacheObjectStoreAdapter::new(store.clone());

        for raw in ["100%.png", "photo#1.png", "a[1].png"] {
            adapter
                .put_object(&key(raw), Bytes::from_static(b"x"), "image/png")
                .await
                .unwrap();
            assert!(store.head(&ObjectPath::parse(raw).unwrap()).await.is_ok());
        }

        let listed = adapter.list_objects(10).await.unwrap();
        assert_eq!(listed.len(), 3);
        for object in &listed {
            adapter.delete_object(&object.key).await.unwrap();
        }
        assert!(adapter.list_objects(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keys_that_are_not_store_paths_are_rejected() {
        let adapter = ApacheObjectStoreAdapter::new(Arc::new(InMemory::new()));

        for raw in ["a//b.png", "/lead.png", "dir/../x.png"] {
            let err = adapter
                .put_object(&key(raw), Bytes::from_static(b"x"), "image/png")
                .await
                .unwrap_err();
            assert!(matches!(err, GatewayError::Validation { .. }), "{raw}");
        }
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let adapter = ApacheObjectStoreAdapter::new(Arc::new(InMemory::new()));
        adapter.delete_object(&key("never-existed.png")).await.unwrap();
    }
}
