use crate::error::KvError;
use crate::store::KeyValueStore;
use once_cell::sync::Lazy;
use spin_sdk::http::{Method, Request, Response};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

pub(crate) use crate::store::InMemoryStore;

/// Backend whose every call fails.
#[derive(Default)]
pub(crate) struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, KvError> {
        Err(KvError("store offline".to_string()))
    }

    fn set(&self, _key: &str, _value: &[u8]) -> Result<(), KvError> {
        Err(KvError("store offline".to_string()))
    }

    fn delete(&self, _key: &str) -> Result<(), KvError> {
        Err(KvError("store offline".to_string()))
    }
}

/// In-memory backend that counts writes.
#[derive(Default)]
pub(crate) struct CountingStore {
    inner: InMemoryStore,
    set_count: AtomicUsize,
}

impl CountingStore {
    pub(crate) fn set_count(&self) -> usize {
        self.set_count.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        self.set_count.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), KvError> {
        self.inner.delete(key)
    }
}

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub(crate) fn lock_env() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub(crate) fn request_with_headers(path: &str, headers: &[(&str, &str)]) -> Request {
    request_with_method_and_headers(Method::Get, path, headers)
}

pub(crate) fn request_with_method_and_headers(
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
) -> Request {
    form_request(method, path, headers, "")
}

pub(crate) fn form_request(
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> Request {
    let mut builder = Request::builder();
    builder.method(method).uri(path);
    for (key, value) in headers {
        builder.header(*key, *value);
    }
    builder.body(body.as_bytes().to_vec());
    builder.build()
}

pub(crate) fn header_value(resp: &Response, name: &str) -> Option<String> {
    resp.headers()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .and_then(|(_, value)| value.as_str().map(str::to_string))
}

pub(crate) fn body_text(resp: &Response) -> String {
    String::from_utf8_lossy(resp.body()).to_string()
}
