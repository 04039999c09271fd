use async_trait::async_trait;
use std::{future::Future, sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    domain::{
        errors::{GatewayError, GatewayResult},
        models::{
            ImageItem, Page, PageRequest, StoreConfig, UploadImageRequest, UploadedImage,
            filter_images, paginate, sort_newest_first, upload_extension,
        },
        value_objects::{ImageMimeType, ObjectKey},
    },
    ports::{services::ImageService, storage::ObjectStore},
};

/// Upper bound of objects fetched by one listing; larger buckets are truncated
pub const MAX_LIST_KEYS: usize = 1000;

/// Default bound for a single store call
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(30);

/// Implementation of ImageService on top of an ObjectStore port
#[derive(Clone)]
pub struct ImageServiceImpl {
    store: Arc<dyn ObjectStore>,
    config: Arc<StoreConfig>,
    store_timeout: Duration,
}

impl ImageServiceImpl {
    /// Create a new ImageServiceImpl instance
    pub fn new(store: Arc<dyn ObjectStore>, config: StoreConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Run a store call under the configured timeout, logging any failure
    async fn call_store<T, F>(&self, operation: &'static str, call: F) -> GatewayResult<T>
    where
        F: Future<Output = GatewayResult<T>> + Send,
    {
        let result = match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::store_unavailable(
                operation,
                format!("no response within {:?}", self.store_timeout),
            )),
        };

        if let Err(e) = &result {
            error!(operation, error = %e, "Object store call failed");
        }
        result
    }
}

#[async_trait]
impl ImageService for ImageServiceImpl {
    async fn list_images(&self, request: PageRequest) -> GatewayResult<Page<ImageItem>> {
        let objects = self
            .call_store("list_images", self.store.list_objects(MAX_LIST_KEYS))
            .await?;
        if objects.len() >= MAX_LIST_KEYS {
            warn!(
                limit = MAX_LIST_KEYS,
                "Bucket listing reached the key limit; older images are not listed"
            );
        }

        let mut images = filter_images(objects);
        sort_newest_first(&mut images);

        let config = &self.config;
        let page = paginate(images, request).map(|obj| ImageItem {
            url: config.public_url(obj.key.as_str()),
            key: obj.key.into_string(),
            size: Some(obj.size_bytes),
            last_modified: obj.last_modified,
        });

        debug!(
            page = page.page_number,
            returned = page.items.len(),
            total = page.total_count,
            "Listed images"
        );
        Ok(page)
    }

    async fn upload_image(&self, request: UploadImageRequest) -> GatewayResult<UploadedImage> {
        let mime_type: ImageMimeType = request
            .declared_mime_type
            .parse()
            .inspect_err(|e: &GatewayError| warn!(error = %e, "Rejected image upload"))?;

        let extension = upload_extension(request.original_filename.as_deref());
        let key = ObjectKey::new(format!("{}{}", Uuid::new_v4(), extension))?;
        let size = request.data.len();

        self.call_store(
            "upload_image",
            self.store.put_object(&key, request.data, mime_type.as_str()),
        )
        .await?;

        let url = self.config.public_url(key.as_str());
        info!(key = %key, size, content_type = %mime_type, "Image uploaded");

        Ok(UploadedImage { key, url })
    }

    async fn delete_image(&self, encoded_key: &str) -> GatewayResult<ObjectKey> {
        let key = ObjectKey::from_encoded(encoded_key)?;

        self.call_store("delete_image", self.store.delete_object(&key))
            .await?;

        info!(key = %key, "Image deleted");
        Ok(key)
    }
}

/// Builder for ImageServiceImpl
#[derive(Default)]
pub struct ImageServiceBuilder {
    store: Option<Arc<dyn ObjectStore>>,
    config: Option<StoreConfig>,
    store_timeout: Option<Duration>,
}

impl ImageServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = Some(store_timeout);
        self
    }

    pub fn build(self) -> GatewayResult<ImageServiceImpl> {
        let store = self
            .store
            .ok_or_else(|| GatewayError::configuration("object store is required"))?;
        let config = self
            .config
            .ok_or_else(|| GatewayError::configuration("store configuration is required"))?;

        Ok(ImageServiceImpl::new(store, config)
            .with_store_timeout(self.store_timeout.unwrap_or(DEFAULT_STORE_TIMEOUT)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{StoredObject, UrlStyle};
    use bytes::Bytes;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    /// In-process store with controllable timestamps and failures
    #[derive(Default)]
    struct StubStore {
        objects: Mutex<Vec<StoredObject>>,
        puts: Mutex<Vec<(String, Bytes, String)>>,
        deletes: Mutex<Vec<String>>,
        list_limits: Mutex<Vec<usize>>,
        fail: bool,
        stall: bool,
    }

    impl StubStore {
        fn with_objects(objects: Vec<(&str, i64)>) -> Self {
            let objects = objects
                .into_iter()
                .map(|(key, secs)| StoredObject {
                    key: ObjectKey::new(key.to_string()).unwrap(),
                    size_bytes: 42,
                    last_modified: Some(Utc.timestamp_opt(secs, 0).unwrap()),
                })
                .collect();
            Self {
                objects: Mutex::new(objects),
                ..Default::default()
            }
        }

        async fn maybe_fail(&self, operation: &str) -> GatewayResult<()> {
            if self.stall {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            if self.fail {
                return Err(GatewayError::store_unavailable(operation, "connection refused"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ObjectStore for StubStore {
        async fn list_objects(&self, max_results: usize) -> GatewayResult<Vec<StoredObject>> {
            self.maybe_fail("list_objects").await?;
            self.list_limits.lock().unwrap().push(max_results);
            Ok(self.objects.lock().unwrap().clone())
        }

        async fn put_object(
            &self,
            key: &ObjectKey,
            data: Bytes,
            content_type: &str,
        ) -> GatewayResult<()> {
            self.maybe_fail("put_object").await?;
            self.puts
                .lock()
                .unwrap()
                .push((key.to_string(), data, content_type.to_string()));
            Ok(())
        }

        async fn delete_object(&self, key: &ObjectKey) -> GatewayResult<()> {
            self.maybe_fail("delete_object").await?;
            self.deletes.lock().unwrap().push(key.to_string());
            Ok(())
        }
    }

    fn config() -> StoreConfig {
        StoreConfig::builder()
            .endpoint("http://minio:9000")
            .access_key("access")
            .secret_key("secret")
            .bucket("imgs")
            .public_url_base("http://store/")
            .url_style(UrlStyle::BucketInPath)
            .build()
    }

    fn service(store: Arc<StubStore>) -> ImageServiceImpl {
        ImageServiceImpl::new(store, config())
    }

    fn upload(mime: &str, filename: Option<&str>) -> UploadImageRequest {
        UploadImageRequest {
            data: Bytes::from_static(b"\x89PNG fake"),
            declared_mime_type: mime.to_string(),
            original_filename: filename.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_list_filters_sorts_and_builds_urls() {
        let store = Arc::new(StubStore::with_objects(vec![
            ("five.png", 5),
            ("notes.txt", 100),
            ("three.jpg", 3),
            ("nine.webp", 9),
        ]));
        let service = service(store.clone());

        let page = service
            .list_images(PageRequest::new(1, 10).unwrap())
            .await
            .unwrap();

        let keys: Vec<_> = page.items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["nine.webp", "five.png", "three.jpg"]);
        assert_eq!(page.items[0].url, "http://store/imgs/nine.webp");
        assert_eq!(page.items[0].size, Some(42));
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(*store.list_limits.lock().unwrap(), vec![MAX_LIST_KEYS]);
    }

    #[tokio::test]
    async fn test_list_second_page() {
        let store = Arc::new(StubStore::with_objects(vec![
            ("a.png", 1),
            ("b.png", 2),
            ("c.png", 3),
        ]));
        let page = service(store)
            .list_images(PageRequest::new(2, 2).unwrap())
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].key, "a.png");
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn test_list_empty_bucket() {
        let page = service(Arc::new(StubStore::default()))
            .list_images(PageRequest::new(1, 10).unwrap())
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_list_store_failure() {
        let store = Arc::new(StubStore {
            fail: true,
            ..Default::default()
        });
        let err = service(store)
            .list_images(PageRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_store_timeout_is_store_unavailable() {
        let store = Arc::new(StubStore {
            stall: true,
            ..Default::default()
        });
        let service = service(store).with_store_timeout(Duration::from_millis(20));

        let err = service.delete_image("a.png").await.unwrap_err();
        match err {
            GatewayError::StoreUnavailable { operation, .. } => {
                assert_eq!(operation, "delete_image")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_rejects_non_image_mime_type() {
        let store = Arc::new(StubStore::default());
        let err = service(store.clone())
            .upload_image(upload("text/plain", Some("cat.png")))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            GatewayError::UnsupportedMediaType {
                mime_type: "text/plain".to_string()
            }
        );
        assert!(store.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_generates_key_and_url() {
        let store = Arc::new(StubStore::default());
        let uploaded = service(store.clone())
            .upload_image(upload("image/png", Some("cat.png")))
            .await
            .unwrap();

        let key = uploaded.key.as_str();
        let (stem, ext) = key.split_at(key.len() - 4);
        assert_eq!(ext, ".png");
        assert!(Uuid::parse_str(stem).is_ok());
        assert_eq!(uploaded.url, format!("http://store/imgs/{key}"));

        let puts = store.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, key);
        assert_eq!(puts[0].2, "image/png");
    }

    #[tokio::test]
    async fn test_upload_defaults_extension_to_jpg() {
        let store = Arc::new(StubStore::default());
        let uploaded = service(store)
            .upload_image(upload("image/jpeg", None))
            .await
            .unwrap();
        assert!(uploaded.key.as_str().ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_upload_keys_are_unique() {
        let service = service(Arc::new(StubStore::default()));
        let first = service.upload_image(upload("image/gif", Some("a.gif"))).await.unwrap();
        let second = service.upload_image(upload("image/gif", Some("a.gif"))).await.unwrap();
        assert_ne!(first.key, second.key);
    }

    #[tokio::test]
    async fn test_delete_decodes_key() {
        let store = Arc::new(StubStore::default());
        let key = service(store.clone())
            .delete_image("2024%2Fmy%20photo.png")
            .await
            .unwrap();

        assert_eq!(key.as_str(), "2024/my photo.png");
        assert_eq!(*store.deletes.lock().unwrap(), vec!["2024/my photo.png"]);
    }

    #[tokio::test]
    async fn test_delete_rejects_malformed_key_before_store_call() {
        let store = Arc::new(StubStore::default());
        let err = service(store.clone()).delete_image("%FF").await.unwrap_err();
        assert!(matches!(err, GatewayError::Validation { .. }));
        assert!(store.deletes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_builder_requires_store_and_config() {
        assert!(ImageServiceBuilder::new().config(config()).build().is_err());
        assert!(ImageServiceBuilder::new()
            .store(Arc::new(StubStore::default()))
            .build()
            .is_err());

        let service = ImageServiceBuilder::new()
            .store(Arc::new(StubStore::default()))
            .config(config())
            .store_timeout(Duration::from_secs(3))
            .build()
            .unwrap();
        assert_eq!(service.store_timeout, Duration::from_secs(3));
        assert_eq!(service.config().bucket, "imgs");
    }
}
