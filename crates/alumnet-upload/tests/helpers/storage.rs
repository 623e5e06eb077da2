//! In-memory object store with scripted failures.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use alumnet_storage::{Storage, StorageBackend, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;

/// What the next `put` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutBehavior {
    Succeed,
    /// Network-style failure, retried by the engine.
    FailTransient,
    /// Store refuses the object, never retried.
    FailPermanent,
    /// Never completes.
    Hang,
}

/// A recorded `put` call.
#[derive(Debug, Clone)]
pub struct PutCall {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub at: Instant,
}

/// Mock storage implementation that stores objects in memory
pub struct MockStorage {
    objects: Mutex<HashMap<String, Bytes>>,
    script: Mutex<VecDeque<PutBehavior>>,
    fallback: PutBehavior,
    put_delay: Duration,
    calls: Mutex<Vec<PutCall>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::with_fallback(PutBehavior::Succeed)
    }

    /// Every unscripted `put` behaves like `fallback`.
    pub fn with_fallback(fallback: PutBehavior) -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            script: Mutex::new(VecDeque::new()),
            fallback,
            put_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Behaviors for the next `put` calls, in order.
    pub fn scripted(behaviors: impl IntoIterator<Item = PutBehavior>) -> Self {
        let storage = Self::new();
        storage.script.lock().unwrap().extend(behaviors);
        storage
    }

    /// Every `put` takes `delay` before resolving.
    pub fn with_put_delay(mut self, delay: Duration) -> Self {
        self.put_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<PutCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn put_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn has_object(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .lock()
            .unwrap()
            .contains_key(&format!("{bucket}/{key}"))
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{bucket}/{key}"))
            .cloned()
    }
}

impl Default for MockStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        self.calls.lock().unwrap().push(PutCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            content_type: content_type.to_string(),
            size_bytes: data.len(),
            at: Instant::now(),
        });
        let behavior = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);

        if !self.put_delay.is_zero() {
            tokio::time::sleep(self.put_delay).await;
        }

        match behavior {
            PutBehavior::Succeed => {
                self.objects
                    .lock()
                    .unwrap()
                    .insert(format!("{bucket}/{key}"), data);
                Ok(key.to_string())
            }
            PutBehavior::FailTransient => {
                Err(StorageError::UploadFailed("connection reset".to_string()))
            }
            PutBehavior::FailPermanent => Err(StorageError::Rejected("access denied".to_string())),
            PutBehavior::Hang => {
                std::future::pending::<()>().await;
                Err(StorageError::UploadFailed("unreachable".to_string()))
            }
        }
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://cdn.example.com/{bucket}/{path}")
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
