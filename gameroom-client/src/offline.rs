use std::collections::HashMap;

/// A cached response body plus enough metadata to serve it back.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub content_type: String,
    pub body: Vec<u8>,
}

/// The Offline Cache collaborator contract. The connection layer only needs
/// put/match/delete; eviction policy and storage are the implementor's
/// business.
pub trait OfflineCache: Send + Sync {
    fn match_key(&self, key: &str) -> Option<CachedResponse>;
    fn put(&mut self, key: &str, response: CachedResponse);
    fn delete(&mut self, key: &str) -> bool;
}

/// In-memory reference implementation. Nothing survives a restart, which is
/// all this system promises anyway.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<String, CachedResponse>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OfflineCache for MemoryCache {
    fn match_key(&self, key: &str) -> Option<CachedResponse> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, response: CachedResponse) {
        self.entries.insert(key.to_string(), response);
    }

    fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }
}
